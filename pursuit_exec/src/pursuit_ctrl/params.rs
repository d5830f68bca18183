//! Pursuit control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::PursuitCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for pursuit control
///
/// All distances are in field units.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Distance along the path, ahead of the closest point, at which the target is placed.
    pub pursuit_dist: f64,

    /// If the target is closer than this to the robot and lies on a later segment the controller
    /// skips forward to that segment. Must be less than `pursuit_dist`.
    pub skip_dist: f64,

    /// The tightest turn the vehicle can make. Curvature demands are limited to
    /// `1/min_turn_radius`.
    pub min_turn_radius: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            pursuit_dist: 40.0,
            skip_dist: 20.0,
            min_turn_radius: 20.0,
        }
    }
}

impl Params {
    /// Check that the parameters describe a usable controller.
    pub fn validate(&self) -> Result<(), PursuitCtrlError> {
        if !(self.pursuit_dist > 0.0) {
            return Err(PursuitCtrlError::InvalidParams(format!(
                "pursuit_dist must be positive, found {}",
                self.pursuit_dist
            )));
        }

        if !(self.skip_dist >= 0.0 && self.skip_dist < self.pursuit_dist) {
            return Err(PursuitCtrlError::InvalidParams(format!(
                "skip_dist must be in [0, pursuit_dist), found {} (pursuit_dist {})",
                self.skip_dist, self.pursuit_dist
            )));
        }

        if !(self.min_turn_radius > 0.0) {
            return Err(PursuitCtrlError::InvalidParams(format!(
                "min_turn_radius must be positive, found {}",
                self.min_turn_radius
            )));
        }

        Ok(())
    }

    /// The largest curvature magnitude the controller will demand.
    pub fn max_curvature(&self) -> f64 {
        1.0 / self.min_turn_radius
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Params::default().validate().is_ok());

        let bad = [
            Params {
                pursuit_dist: 0.0,
                ..Params::default()
            },
            Params {
                skip_dist: 40.0,
                ..Params::default()
            },
            Params {
                skip_dist: -1.0,
                ..Params::default()
            },
            Params {
                min_turn_radius: 0.0,
                ..Params::default()
            },
            Params {
                pursuit_dist: std::f64::NAN,
                ..Params::default()
            },
        ];

        for p in bad.iter() {
            assert!(matches!(
                p.validate(),
                Err(PursuitCtrlError::InvalidParams(_))
            ));
        }
    }

    #[test]
    fn test_from_toml() {
        let p: Params = util::params::from_str(
            "pursuit_dist = 30.0\nskip_dist = 10.0\nmin_turn_radius = 15.0\n",
        )
        .unwrap();

        assert_eq!(
            p,
            Params {
                pursuit_dist: 30.0,
                skip_dist: 10.0,
                min_turn_radius: 15.0
            }
        );
    }
}
