//! Season cycle and weather
//!
//! The season advances on a fixed 50-step cycle; weather re-rolls
//! stochastically each step from a season-weighted distribution and
//! applies uniform per-citizen deltas.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::simulation::world::World;

/// Steps per season before the cycle advances
pub const SEASON_LENGTH: u32 = 50;

/// Chance per step that the weather re-rolls
const WEATHER_REROLL_CHANCE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn next(&self) -> Season {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    /// Weights over [normal, rain, drought, storm] for this season
    fn weather_weights(&self) -> [f32; 4] {
        match self {
            Season::Spring => [0.6, 0.3, 0.05, 0.05],
            Season::Summer => [0.5, 0.2, 0.25, 0.05],
            Season::Autumn => [0.7, 0.2, 0.05, 0.05],
            Season::Winter => [0.6, 0.1, 0.1, 0.2],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Normal,
    Rain,
    Drought,
    Storm,
}

const WEATHER_OPTIONS: [Weather; 4] = [
    Weather::Normal,
    Weather::Rain,
    Weather::Drought,
    Weather::Storm,
];

impl Weather {
    /// Multiplier applied to the food spawn chance
    pub fn food_spawn_multiplier(&self) -> f32 {
        match self {
            Weather::Normal => 1.0,
            Weather::Rain => 1.5,
            Weather::Drought => 0.3,
            Weather::Storm => 0.1,
        }
    }
}

/// Advance the season cycle, maybe re-roll the weather, and apply weather
/// effects to every living citizen.
pub fn update_weather_and_seasons(world: &mut World) {
    world.society.season_cycle += 1;
    if world.society.season_cycle >= SEASON_LENGTH {
        world.society.season_cycle = 0;
        world.society.season = world.society.season.next();
        tracing::info!(season = ?world.society.season, "season changed");
    }

    if world.rng.gen::<f32>() < WEATHER_REROLL_CHANCE {
        let weights = world.society.season.weather_weights();
        let dist = WeightedIndex::new(weights).expect("static weights are valid");
        world.society.weather = WEATHER_OPTIONS[dist.sample(&mut world.rng)];
    }

    apply_weather_effects(world);
}

/// Uniform per-citizen deltas for the current weather
fn apply_weather_effects(world: &mut World) {
    let weather = world.society.weather;
    for idx in world.alive_indices() {
        match weather {
            Weather::Storm => {
                world.citizens[idx].needs.drain_energy(2);
                if world.rng.gen::<f32>() < 0.05 {
                    world.citizens[idx].needs.damage(5);
                }
            }
            Weather::Drought => {
                world.citizens[idx].needs.add_hunger(1);
            }
            Weather::Rain => {
                if world.rng.gen::<f32>() < 0.3 {
                    world.citizens[idx].needs.heal(1);
                    world.citizens[idx].needs.relieve_social(2);
                }
            }
            Weather::Normal => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_cycle_order() {
        assert_eq!(Season::Spring.next(), Season::Summer);
        assert_eq!(Season::Summer.next(), Season::Autumn);
        assert_eq!(Season::Autumn.next(), Season::Winter);
        assert_eq!(Season::Winter.next(), Season::Spring);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for season in [Season::Spring, Season::Summer, Season::Autumn, Season::Winter] {
            let sum: f32 = season.weather_weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_storm_suppresses_food_spawn() {
        assert!(Weather::Storm.food_spawn_multiplier() < Weather::Drought.food_spawn_multiplier());
        assert!(Weather::Rain.food_spawn_multiplier() > Weather::Normal.food_spawn_multiplier());
    }
}
