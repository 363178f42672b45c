//! Read-only statistics snapshot published once per step

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::types::Tick;
use crate::entity::resource::ResourceKind;
use crate::simulation::world::World;

/// Aggregate view of the world, collected at the end of every step.
///
/// Averages cover living citizens only and are 0 when nobody is alive.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorldStats {
    pub step: Tick,

    // Population
    pub total_citizens: usize,
    pub alive_citizens: usize,
    pub dead_citizens: usize,

    // Need averages over living citizens
    pub avg_hunger: f32,
    pub avg_energy: f32,
    pub avg_health: f32,
    pub avg_social: f32,
    pub avg_coins: f32,
    pub avg_friendship: f32,

    // Building counts (existing nodes)
    pub food_nodes: usize,
    pub house_nodes: usize,
    pub job_nodes: usize,
    pub market_nodes: usize,
    pub workshop_nodes: usize,
    pub temple_nodes: usize,
    pub school_nodes: usize,

    // Social structure
    pub interactions: usize,
    pub families: usize,
    pub children: usize,

    // Societal summary
    pub technologies: usize,
    pub technological_level: u32,
    pub leaders: usize,
    pub art_works: u32,
    pub cultural_level: u32,
    pub festivals_held: u32,
    pub active_conflicts: usize,
    pub conflicts_resolved: u32,
    pub scientific_discoveries: u32,
    pub trade_volume: u32,
}

impl WorldStats {
    pub fn collect(world: &World) -> Self {
        let alive: Vec<_> = world
            .citizens
            .iter()
            .filter(|c| c.alive)
            .collect();
        let n = alive.len();

        let avg = |sum: f32| if n == 0 { 0.0 } else { sum / n as f32 };

        let mut friendship_sum = 0.0;
        let mut friendship_count = 0usize;
        for citizen in &alive {
            for score in citizen.friendships.values() {
                friendship_sum += score;
                friendship_count += 1;
            }
        }

        // A citizen counts as interacting when it shares a cell with
        // another living citizen.
        let mut interactions = 0;
        for citizen in &alive {
            let Some(pos) = citizen.pos else { continue };
            let has_company = world.grid.contents_at(pos).iter().any(|&id| {
                id != citizen.id
                    && world
                        .citizen(id)
                        .map_or(false, |other| other.alive)
            });
            if has_company {
                interactions += 1;
            }
        }

        let families: BTreeSet<_> = alive.iter().filter_map(|c| c.family).collect();
        let children = alive.iter().filter(|c| c.age < 100).count();

        Self {
            step: world.steps(),
            total_citizens: world.citizens.len(),
            alive_citizens: n,
            dead_citizens: world.citizens.len() - n,
            avg_hunger: avg(alive.iter().map(|c| c.needs.hunger as f32).sum()),
            avg_energy: avg(alive.iter().map(|c| c.needs.energy as f32).sum()),
            avg_health: avg(alive.iter().map(|c| c.needs.health as f32).sum()),
            avg_social: avg(alive.iter().map(|c| c.needs.social as f32).sum()),
            avg_coins: avg(alive.iter().map(|c| c.coins as f32).sum()),
            avg_friendship: if friendship_count == 0 {
                0.0
            } else {
                friendship_sum / friendship_count as f32
            },
            food_nodes: world.resource_count(ResourceKind::Food),
            house_nodes: world.resource_count(ResourceKind::House),
            job_nodes: world.resource_count(ResourceKind::Job),
            market_nodes: world.resource_count(ResourceKind::Market),
            workshop_nodes: world.resource_count(ResourceKind::Workshop),
            temple_nodes: world.resource_count(ResourceKind::Temple),
            school_nodes: world.resource_count(ResourceKind::School),
            interactions,
            families: families.len(),
            children,
            technologies: world.society.technologies.len(),
            technological_level: world.society.technological_level,
            leaders: world.society.leaders.len(),
            art_works: world.society.art_works,
            cultural_level: world.society.cultural_level,
            festivals_held: world.society.festivals_held,
            active_conflicts: world.society.conflicts.len(),
            conflicts_resolved: world.society.conflicts_resolved,
            scientific_discoveries: world.society.scientific_discoveries,
            trade_volume: world.society.trade_volume,
        }
    }
}
