//! # Pursuit library.
//!
//! This library provides the pieces of the sketched path follower: path simplification and
//! segmentation, the pure pursuit controller, and a kinematic simulation to run it against.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Instructions - describes a path as drive and turn steps
pub mod instructions;

/// Kinematics - moves a pose along an arc of given curvature
pub mod kinematics;

/// Localisation - the pose of the robot in the world
pub mod loc;

/// Path - waypoints, simplification and segments
pub mod path;

/// Pursuit control module - keeps the robot on the given path
pub mod pursuit_ctrl;

/// Simulation - runs pursuit control against a simulated robot
pub mod sim;
