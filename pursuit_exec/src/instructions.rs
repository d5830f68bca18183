//! # Instructions
//!
//! Describes a path as a list of drive and turn-on-the-spot instructions, for display alongside the
//! pursuit run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::fmt;

use crate::path::Segment;
use util::maths::get_ang_dist;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum Instruction {
    /// Drive straight ahead by the given distance
    Drive { distance: f64 },

    /// Turn on the spot by the given angle, positive to the left, in (-pi, pi]
    Turn { angle_rad: f64 },
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the instruction list for the given segments.
///
/// The first segment gives a single drive, every following segment a turn onto it then a drive
/// along it. No segments gives no instructions.
pub fn instructions(segments: &[Segment]) -> Vec<Instruction> {
    let mut instrs = Vec::with_capacity(segments.len() * 2);

    for (i, seg) in segments.iter().enumerate() {
        if i > 0 {
            instrs.push(Instruction::Turn {
                angle_rad: get_ang_dist(segments[i - 1].angle_rad, seg.angle_rad),
            });
        }

        instrs.push(Instruction::Drive {
            distance: seg.length,
        });
    }

    instrs
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Drive { distance } => write!(f, "Drive {:.2}", distance),
            Instruction::Turn { angle_rad } => {
                let dir = if *angle_rad >= 0.0 { "left" } else { "right" };
                write!(f, "Turn {} {:.1} deg", dir, angle_rad.abs().to_degrees())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::path::build_segments;
    use nalgebra::Vector2;
    use std::f64::consts::FRAC_PI_2;

    fn segs(points: &[(f64, f64)]) -> Vec<Segment> {
        let points: Vec<_> = points.iter().map(|p| Vector2::new(p.0, p.1)).collect();
        build_segments(&points).unwrap()
    }

    fn turn_angle(instr: Instruction) -> f64 {
        match instr {
            Instruction::Turn { angle_rad } => angle_rad,
            Instruction::Drive { .. } => panic!("Expected a turn"),
        }
    }

    #[test]
    fn test_instructions() {
        assert!(instructions(&[]).is_empty());

        let instrs = instructions(&segs(&[(0.0, 0.0), (30.0, 0.0), (30.0, 20.0), (60.0, 20.0)]));
        assert_eq!(instrs.len(), 5);
        assert_eq!(instrs[0], Instruction::Drive { distance: 30.0 });
        assert!((turn_angle(instrs[1]) - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(instrs[2], Instruction::Drive { distance: 20.0 });
        assert!((turn_angle(instrs[3]) + FRAC_PI_2).abs() < 1e-12);
        assert_eq!(instrs[4], Instruction::Drive { distance: 30.0 });
    }

    #[test]
    fn test_turn_is_shortest() {
        // Heading 170 deg then -170 deg is a 20 deg left turn, not 340 right
        let a = 170f64.to_radians();
        let b = -170f64.to_radians();
        let instrs = instructions(&segs(&[
            (0.0, 0.0),
            (10.0 * a.cos(), 10.0 * a.sin()),
            (10.0 * a.cos() + 10.0 * b.cos(), 10.0 * a.sin() + 10.0 * b.sin()),
        ]));

        assert!((turn_angle(instrs[1]) - 20f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", Instruction::Drive { distance: 12.346 }),
            "Drive 12.35"
        );
        assert_eq!(
            format!(
                "{}",
                Instruction::Turn {
                    angle_rad: -FRAC_PI_2
                }
            ),
            "Turn right 90.0 deg"
        );
    }
}
