//! Culture, conflict, infrastructure, and research progression
//!
//! Independent probabilistic accrual/decay processes gated by population
//! size, unlocked technologies, and profession counts.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::GridPos;
use crate::entity::citizen::ResearchField;
use crate::entity::skills::Profession;
use crate::society::state::{
    CommunityAlliance, Conflict, ConflictSeverity, InnovationBenefit, Innovation, ResearchProject,
    TradeGood, TradeRoute,
};
use crate::society::technology::Technology;
use crate::simulation::world::World;

/// Pool of names for newly founded philosophical schools
const SCHOOL_NAMES: [&str; 5] = ["Stoic", "Empirical", "Rational", "Mystical", "Practical"];

/// Festivals recur on this step period (population permitting)
const FESTIVAL_PERIOD: u64 = 100;

fn profession_count(world: &World, profession: Profession) -> usize {
    world
        .alive_indices()
        .into_iter()
        .filter(|&i| world.citizens[i].profession == Some(profession))
        .count()
}

/// Art, philosophy, monuments, and festivals.
pub fn advance_culture(world: &mut World) {
    let artists = profession_count(world, Profession::Merchant);
    if artists > 2 && world.rng.gen::<f32>() < 0.05 {
        world.society.art_works += 1;
    }

    let philosophers = profession_count(world, Profession::Scholar);
    if philosophers > 3
        && world.society.has_tech(Technology::Philosophy)
        && world.rng.gen::<f32>() < 0.03
    {
        let name = *SCHOOL_NAMES.choose(&mut world.rng).expect("non-empty");
        world.society.philosophical_schools.push(name);
        tracing::info!(school = name, "philosophical school founded");
    }

    if world.society.cultural_level > 3 && world.rng.gen::<f32>() < 0.01 {
        world.society.monuments += 1;
    }

    let alive = world.alive_indices();
    if world.steps() % FESTIVAL_PERIOD == 0 && alive.len() > 20 {
        world.society.festivals_held += 1;
        tracing::info!(count = world.society.festivals_held, "festival celebrated");
        for idx in alive {
            world.citizens[idx].needs.relieve_social(10);
            world.citizens[idx].needs.heal(5);
        }
    }
}

/// Conflict spawning, attrition, and resolution; community alliances.
pub fn manage_conflicts(world: &mut World) {
    let alive = world.alive_indices();

    // Food scarcity breeds disputes once the population is large enough
    if world.society.food_stock < 30 && alive.len() > 15 && world.rng.gen::<f32>() < 0.02 {
        let severity = *ConflictSeverity::ALL.choose(&mut world.rng).expect("non-empty");
        let remaining = world.rng.gen_range(5..=20);
        world.society.conflicts.push(Conflict { severity, remaining });
        tracing::info!(?severity, "resource conflict erupted");
    }

    let mut i = 0;
    while i < world.society.conflicts.len() {
        world.society.conflicts[i].remaining =
            world.society.conflicts[i].remaining.saturating_sub(1);

        // Active conflicts wear on the population
        for &idx in alive.iter().take(10) {
            world.citizens[idx].needs.damage(2);
            world.citizens[idx].needs.add_social(3);
        }

        let military = world.society.has_tech(Technology::Military);
        let resolved_early = military && world.rng.gen::<f32>() < 0.3;
        if resolved_early || world.society.conflicts[i].remaining == 0 {
            world.society.conflicts.remove(i);
            world.society.conflicts_resolved += 1;
            tracing::info!(early = resolved_early, "conflict resolved");
        } else {
            i += 1;
        }
    }

    if world.communities.len() > 1 && world.rng.gen::<f32>() < 0.01 {
        let ids: Vec<_> = world.communities.iter().map(|c| c.id).collect();
        let picked: Vec<_> = ids.choose_multiple(&mut world.rng, 2).copied().collect();
        let strength = world.rng.gen_range(1..=10);
        world.society.community_alliances.push(CommunityAlliance {
            communities: (picked[0], picked[1]),
            strength,
        });
    }
}

/// Infrastructure accrual, road building, and external trade routes.
pub fn develop_infrastructure(world: &mut World) {
    if world.society.has_tech(Technology::Engineering) {
        world.society.infrastructure_level =
            (world.society.infrastructure_level + 0.01).min(10.0);

        if world.rng.gen::<f32>() < 0.02 {
            let (w, h) = (world.grid.width(), world.grid.height());
            let a = GridPos::new(world.rng.gen_range(0..w), world.rng.gen_range(0..h));
            let b = GridPos::new(world.rng.gen_range(0..w), world.rng.gen_range(0..h));
            world.society.roads.push((a, b));
        }
    }

    if world.society.has_tech(Technology::TradeRoutes) && world.rng.gen::<f32>() < 0.03 {
        let origin = if world.communities.is_empty() {
            None
        } else {
            let ids: Vec<_> = world.communities.iter().map(|c| c.id).collect();
            Some(*ids.choose(&mut world.rng).expect("non-empty"))
        };
        let goods = *TradeGood::ALL.choose(&mut world.rng).expect("non-empty");
        let profit = world.rng.gen_range(50..=200);
        world.society.credit_stock(goods, profit / 10);
        world.society.trade_routes.push(TradeRoute { origin, goods, profit });
        tracing::info!(?goods, profit, "trade route established");
    }
}

/// Collective research projects and innovations.
pub fn conduct_research(world: &mut World) {
    let scholars = profession_count(world, Profession::Scholar);

    if world.society.has_tech(Technology::Mathematics)
        && scholars > 2
        && world.rng.gen::<f32>() < 0.02
    {
        let topic = *ResearchField::ALL.choose(&mut world.rng).expect("non-empty");
        let required = world.rng.gen_range(50..=150);
        world.society.research_projects.push(ResearchProject {
            topic,
            progress: 0,
            required,
        });
        tracing::info!(?topic, "research project started");
    }

    let mut completed = Vec::new();
    let mut i = 0;
    while i < world.society.research_projects.len() {
        world.society.research_projects[i].progress += scholars as u32 * 2;
        let project = &world.society.research_projects[i];
        if project.progress >= project.required {
            let project = world.society.research_projects.remove(i);
            let benefit = *InnovationBenefit::ALL.choose(&mut world.rng).expect("non-empty");
            completed.push(Innovation { topic: project.topic, benefit });
        } else {
            i += 1;
        }
    }

    for innovation in completed {
        tracing::info!(topic = ?innovation.topic, benefit = ?innovation.benefit, "breakthrough");
        match innovation.benefit {
            InnovationBenefit::Health => {
                for idx in world.alive_indices() {
                    world.citizens[idx].needs.raise_max_health(5);
                }
            }
            InnovationBenefit::Efficiency => world.society.credit_stock(TradeGood::Tools, 20),
            InnovationBenefit::Production => world.society.credit_stock(TradeGood::Food, 30),
            InnovationBenefit::Happiness => {}
        }
        world.society.scientific_discoveries += 1;
        world.society.innovations.push(innovation);
    }
}
