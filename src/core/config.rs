//! World configuration with documented constants
//!
//! Construction parameters are validated eagerly, before any step runs;
//! everything inside `step()` is infallible by design of the model.

use crate::core::error::{CivitasError, Result};
use serde::{Deserialize, Serialize};

/// Construction parameters for a [`World`](crate::simulation::World)
///
/// The defaults reproduce the reference city: a 20x20 grid with 50
/// citizens and enough buildings for a self-sustaining settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Grid width in cells (must be positive)
    pub width: i32,
    /// Grid height in cells (must be positive)
    pub height: i32,
    /// Number of citizens placed at initialization
    pub citizens: u32,
    /// Initial food nodes scattered on the grid
    pub food: u32,
    /// Houses (energy recovery)
    pub houses: u32,
    /// Jobs (coin income)
    pub jobs: u32,
    /// Markets (trading skill)
    pub markets: u32,
    /// Workshops (crafting skill)
    pub workshops: u32,
    /// Temples (social relief)
    pub temples: u32,
    /// Schools (learning skill, technology points)
    pub schools: u32,
    /// Seed for the deterministic random source
    ///
    /// Identical seed and configuration produce identical runs.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            citizens: 50,
            food: 60,
            houses: 20,
            jobs: 25,
            markets: 5,
            workshops: 4,
            temples: 3,
            schools: 2,
            seed: 12345,
        }
    }
}

impl WorldConfig {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Validate configuration before world construction
    ///
    /// Rejects non-positive grid dimensions. Entity counts are unsigned and
    /// may be zero; a zero-citizen world is legal and simply stays inert.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(CivitasError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}
