//! Technology progression
//!
//! Points accrue from scholars and schools; at most one technology unlocks
//! per step, scanning the tree in declaration order, and each unlock
//! applies a one-time benefit.

use crate::core::types::EntityId;
use crate::entity::resource::ResourceKind;
use crate::entity::skills::Profession;
use crate::simulation::world::World;
use serde::{Deserialize, Serialize};

/// Technologies in unlock-scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technology {
    Agriculture,
    Craftsmanship,
    TradeRoutes,
    Education,
    Metallurgy,
    Governance,
    Philosophy,
    Military,
    Engineering,
    Medicine,
    Astronomy,
    Mathematics,
}

/// One entry of the technology tree
#[derive(Debug, Clone, Copy)]
pub struct TechSpec {
    pub tech: Technology,
    pub cost: u32,
    pub prereq: Option<Technology>,
}

/// The fixed technology tree. Scan order is declaration order; the first
/// affordable entry with a satisfied prerequisite unlocks.
pub const TECH_TREE: [TechSpec; 12] = [
    TechSpec { tech: Technology::Agriculture, cost: 50, prereq: None },
    TechSpec { tech: Technology::Craftsmanship, cost: 100, prereq: Some(Technology::Agriculture) },
    TechSpec { tech: Technology::TradeRoutes, cost: 150, prereq: Some(Technology::Craftsmanship) },
    TechSpec { tech: Technology::Education, cost: 200, prereq: Some(Technology::TradeRoutes) },
    TechSpec { tech: Technology::Metallurgy, cost: 250, prereq: Some(Technology::Education) },
    TechSpec { tech: Technology::Governance, cost: 300, prereq: Some(Technology::Metallurgy) },
    TechSpec { tech: Technology::Philosophy, cost: 400, prereq: Some(Technology::Governance) },
    TechSpec { tech: Technology::Military, cost: 450, prereq: Some(Technology::Governance) },
    TechSpec { tech: Technology::Engineering, cost: 500, prereq: Some(Technology::Metallurgy) },
    TechSpec { tech: Technology::Medicine, cost: 550, prereq: Some(Technology::Philosophy) },
    TechSpec { tech: Technology::Astronomy, cost: 600, prereq: Some(Technology::Philosophy) },
    TechSpec { tech: Technology::Mathematics, cost: 650, prereq: Some(Technology::Astronomy) },
];

/// Accrue technology points and unlock at most one technology.
pub fn advance_technology(world: &mut World) {
    let mut gained = 0.0;
    for idx in world.alive_indices() {
        let citizen = &world.citizens[idx];
        if citizen.profession == Some(Profession::Scholar) {
            gained += citizen.skills.learning * 0.01;
        }
    }
    gained += world.resource_count(ResourceKind::School) as f32 * 0.5;
    world.society.technology_points += gained;

    for spec in &TECH_TREE {
        if world.society.has_tech(spec.tech) {
            continue;
        }
        if world.society.technology_points < spec.cost as f32 {
            continue;
        }
        if let Some(prereq) = spec.prereq {
            if !world.society.has_tech(prereq) {
                continue;
            }
        }

        world.society.technologies.insert(spec.tech);
        world.society.technology_points -= spec.cost as f32;
        world.society.technological_level += 1;
        apply_benefit(world, spec.tech);
        tracing::info!(
            tech = ?spec.tech,
            level = world.society.technological_level,
            "technology discovered"
        );
        // One unlock per step, regardless of surplus points
        break;
    }
}

/// One-time benefit applied when a technology unlocks
fn apply_benefit(world: &mut World, tech: Technology) {
    use crate::society::state::TradeGood;

    match tech {
        Technology::Agriculture => {
            // Food spawn multiplier is read from the technology set at
            // spawn time; the stock boost applies here.
            world.society.food_stock = world.society.food_stock.saturating_add(50);
        }
        Technology::Craftsmanship => boost_node_bonus(world, ResourceKind::Workshop, 1.5),
        Technology::TradeRoutes => boost_node_bonus(world, ResourceKind::Market, 1.3),
        Technology::Education => boost_node_bonus(world, ResourceKind::School, 1.5),
        Technology::Metallurgy => world.society.credit_stock(TradeGood::Tools, 30),
        Technology::Governance => establish_leadership(world),
        Technology::Philosophy => world.society.cultural_level += 1,
        Technology::Military => world.society.military_strength += 10,
        Technology::Engineering => world.society.infrastructure_level += 2.0,
        Technology::Medicine => {
            for idx in world.alive_indices() {
                world.citizens[idx].needs.raise_max_health(10);
            }
        }
        Technology::Astronomy => {
            for route in &mut world.society.trade_routes {
                route.profit = (route.profit as f32 * 1.3) as u32;
            }
        }
        Technology::Mathematics => world.society.technology_points += 20.0,
    }
}

fn boost_node_bonus(world: &mut World, kind: ResourceKind, factor: f32) {
    for node in &mut world.resources {
        if node.kind == kind && node.exists {
            node.bonus *= factor;
        }
    }
}

/// Governance unlock: score mature citizens and appoint the top candidates
/// as leaders, respecting the three-leader cap.
fn establish_leadership(world: &mut World) {
    let mut candidates: Vec<(EntityId, usize, f32)> = Vec::new();
    for idx in world.alive_indices() {
        let citizen = &world.citizens[idx];
        if citizen.age <= 100 {
            continue;
        }
        let score = citizen.friend_count() as f32 * 2.0
            + citizen.coins as f32 * 0.1
            + (citizen.skills.learning + citizen.skills.trading) * 0.5
            + citizen.age as f32 * 0.01;
        candidates.push((citizen.id, idx, score));
    }

    // Stable sort keeps arena order on ties, so the outcome is deterministic
    candidates.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    for (id, idx, score) in candidates {
        if world.society.leaders.len() >= 3 {
            break;
        }
        if world.society.leaders.contains(&id) {
            continue;
        }
        world.society.leaders.push(id);
        world.citizens[idx].is_leader = true;
        tracing::info!(citizen = id.0, score, "appointed community leader");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_declares_twelve_techs_in_order() {
        assert_eq!(TECH_TREE.len(), 12);
        assert_eq!(TECH_TREE[0].tech, Technology::Agriculture);
        assert!(TECH_TREE[0].prereq.is_none());
        // Every later entry names a prerequisite that appears earlier
        for (i, spec) in TECH_TREE.iter().enumerate().skip(1) {
            let prereq = spec.prereq.expect("all non-root techs have prereqs");
            let pos = TECH_TREE
                .iter()
                .position(|s| s.tech == prereq)
                .expect("prereq present in tree");
            assert!(pos < i, "prereq of {:?} must precede it", spec.tech);
        }
    }

    #[test]
    fn test_costs_are_ascending() {
        for pair in TECH_TREE.windows(2) {
            assert!(pair[0].cost < pair[1].cost);
        }
    }
}
