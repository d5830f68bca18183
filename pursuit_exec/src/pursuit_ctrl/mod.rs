//! # Pursuit control module
//!
//! Pursuit control keeps the robot on the sketched path using the pure pursuit law.
//!
//! The path is made up of a number of straight segments joining the (simplified) waypoints. Each
//! cycle the controller:
//!
//! 1. Projects the robot onto the path, starting from the segment it was last on. Progress along
//!    the path only ever moves forwards. If the robot has passed the end of every remaining
//!    segment the path is complete.
//! 2. Walks forwards along the path from that closest point by the pursuit distance to find the
//!    target point.
//! 3. If the target is closer to the robot than the skip distance and lies on a later segment,
//!    which happens around sharp corners, the controller jumps to that segment and searches
//!    again.
//! 4. Computes the curvature of the arc tangent to the robot's heading which passes through the
//!    target, `2 sin(alpha) / L`.
//! 5. Limits that curvature to the minimum turn radius of the vehicle, flagging when it does so.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::Params;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum PursuitCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Attempted to start a run on a path with no segments, i.e. fewer than two waypoints.
    #[error("Attempted to start following an empty path")]
    EmptyPath,

    /// Attempted to step the controller before a run was started.
    #[error("No path has been started")]
    NotStarted,
}
