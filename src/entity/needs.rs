//! Bounded needs that drive citizen behavior
//!
//! Every mutation clamps back into range, so a needs value can never
//! escape its bounds no matter which subsystem touched it.

use serde::{Deserialize, Serialize};

/// Upper bound shared by hunger, energy, and social need
pub const NEED_MAX: i32 = 100;

/// Base health ceiling; medicine and innovations may raise it up to 120
pub const BASE_MAX_HEALTH: i32 = 100;

/// Hard cap on the health ceiling regardless of technology
pub const MAX_HEALTH_CAP: i32 = 120;

/// Per-citizen bounded needs
///
/// Hunger and social pressure build over time and are relieved by
/// interaction; energy drains and is restored by rest. Health is the
/// survival stat: it only moves when the other needs reach danger levels
/// or an external effect (weather, conflict, temple) applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Needs {
    /// 0 = fed, 100 = starving
    pub hunger: i32,
    /// 0 = exhausted, 100 = fully rested
    pub energy: i32,
    /// 0 = socially satisfied, 100 = lonely
    pub social: i32,
    /// 0 = dead, `max_health` = perfect condition
    pub health: i32,
    /// Health ceiling, raised by medicine up to [`MAX_HEALTH_CAP`]
    pub max_health: i32,
}

impl Needs {
    pub fn new(hunger: i32, energy: i32, social: i32) -> Self {
        Self {
            hunger: hunger.clamp(0, NEED_MAX),
            energy: energy.clamp(0, NEED_MAX),
            social: social.clamp(0, NEED_MAX),
            health: BASE_MAX_HEALTH,
            max_health: BASE_MAX_HEALTH,
        }
    }

    pub fn add_hunger(&mut self, amount: i32) {
        self.hunger = (self.hunger + amount).clamp(0, NEED_MAX);
    }

    pub fn eat(&mut self, amount: i32) {
        self.hunger = (self.hunger - amount).clamp(0, NEED_MAX);
    }

    pub fn drain_energy(&mut self, amount: i32) {
        self.energy = (self.energy - amount).clamp(0, NEED_MAX);
    }

    pub fn restore_energy(&mut self, amount: i32) {
        self.energy = (self.energy + amount).clamp(0, NEED_MAX);
    }

    pub fn add_social(&mut self, amount: i32) {
        self.social = (self.social + amount).clamp(0, NEED_MAX);
    }

    pub fn relieve_social(&mut self, amount: i32) {
        self.social = (self.social - amount).clamp(0, NEED_MAX);
    }

    pub fn damage(&mut self, amount: i32) {
        self.health = (self.health - amount).clamp(0, self.max_health);
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).clamp(0, self.max_health);
    }

    /// Raise the health ceiling, capped at [`MAX_HEALTH_CAP`]
    pub fn raise_max_health(&mut self, amount: i32) {
        self.max_health = (self.max_health + amount).min(MAX_HEALTH_CAP);
    }
}
