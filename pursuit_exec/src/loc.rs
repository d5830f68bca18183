//! # Localisation module
//!
//! The simulated robot is a point with a heading, so its pose is simply a 2D position and an
//! angle in the field frame.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and heading in the field frame) of the robot.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Pose {
    /// The position in the field frame
    pub position: Vector2<f64>,

    /// Heading of the robot, the angle to the +ve field X axis.
    ///
    /// This is not wrapped, it accumulates as the robot turns.
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x: f64, y: f64, heading_rad: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            heading_rad,
        }
    }

    /// Unit vector pointing in the direction the robot is facing.
    pub fn forward(&self) -> Vector2<f64> {
        Vector2::new(self.heading_rad.cos(), self.heading_rad.sin())
    }

    /// Heading wrapped into (-pi, pi].
    pub fn get_heading(&self) -> f64 {
        util::maths::wrap_pi(self.heading_rad)
    }
}
