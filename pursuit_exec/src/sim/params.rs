//! Simulation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::SimError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the simulation loop
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SimParams {
    /// Linear speed of the robot.
    ///
    /// Units: field units/second
    pub speed: f64,

    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Maximum number of cycles to run before giving up, zero for no limit.
    pub max_ticks: u64,

    /// If true cycles are paced in real time, otherwise the simulation runs as fast as possible
    /// with a fixed step of `cycle_period_s`.
    pub real_time: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            speed: 180.0,
            cycle_period_s: 1.0 / 60.0,
            max_ticks: 100_000,
            real_time: false,
        }
    }
}

impl SimParams {
    /// Check that the parameters describe a runnable simulation.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(SimError::InvalidParams(format!(
                "speed must be positive, found {}",
                self.speed
            )));
        }

        if !(self.cycle_period_s.is_finite() && self.cycle_period_s > 0.0) {
            return Err(SimError::InvalidParams(format!(
                "cycle_period_s must be positive, found {}",
                self.cycle_period_s
            )));
        }

        Ok(())
    }
}
