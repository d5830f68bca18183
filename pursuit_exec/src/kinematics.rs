//! # Kinematics
//!
//! Unicycle model used to move the simulated robot along the commanded arc.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::loc::Pose;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Advance the pose by driving at `speed` with the given `curvature` for `dt` seconds.
///
/// This is a first order integration: the heading is updated first, and the position is then
/// advanced along the *new* heading. Neither speed nor dt are limited, callers must supply a
/// non-negative `dt`.
pub fn integrate(pose: &Pose, speed: f64, curvature: f64, dt: f64) -> Pose {
    let drive_dist = speed * dt;

    let heading_rad = pose.heading_rad + drive_dist * curvature;

    let mut new_pose = Pose {
        position: pose.position,
        heading_rad,
    };
    new_pose.position += drive_dist * new_pose.forward();

    new_pose
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_integrate_straight() {
        let pose = Pose::new(1.0, 2.0, 0.0);
        let new_pose = integrate(&pose, 10.0, 0.0, 0.5);

        assert_eq!(new_pose, Pose::new(6.0, 2.0, 0.0));
    }

    #[test]
    fn test_integrate_heading_first() {
        // A quarter turn in a single step, the whole step is driven along the new heading
        let pose = Pose::new(0.0, 0.0, 0.0);
        let new_pose = integrate(&pose, 1.0, FRAC_PI_2, 1.0);

        assert_eq!(new_pose.heading_rad, FRAC_PI_2);
        assert!(new_pose.position[0].abs() < 1e-12);
        assert!((new_pose.position[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_circle() {
        // Many small steps around a circle of radius 10 returns close to the start
        let radius = 10.0;
        let speed = 5.0;
        let steps = 10_000;
        let dt = 2.0 * PI * radius / speed / steps as f64;

        let mut pose = Pose::new(0.0, 0.0, 0.0);
        for _ in 0..steps {
            pose = integrate(&pose, speed, 1.0 / radius, dt);
        }

        assert!((pose.heading_rad - 2.0 * PI).abs() < 1e-9);
        assert!(pose.position.norm() < 0.05);
    }

    #[test]
    fn test_integrate_zero_dt() {
        let pose = Pose::new(3.0, -4.0, 1.0);
        assert_eq!(integrate(&pose, 100.0, 0.5, 0.0), pose);
    }
}
