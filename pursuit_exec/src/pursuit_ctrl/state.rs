//! Pursuit control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::{Params, PursuitCtrlError};
use crate::{
    loc::Pose,
    path::{Segment, Waypoint},
};
use util::maths::get_ang_dist;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct PursuitCtrl {
    params: Params,

    /// Executing mode
    mode: PursuitCtrlMode,

    /// The segments of the path being followed. Fixed for the duration of a run.
    segments: Vec<Segment>,

    /// Index of the segment containing the robot's closest point on the path. Never decreases
    /// during a run.
    seg_index: usize,

    report: StatusReport,
}

/// The steering solution for one cycle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PursuitResult {
    /// The point on the path closest to the robot
    pub closest_point: Waypoint,

    /// The point on the path the robot is steering towards
    pub target: Waypoint,

    /// Index of the segment containing the closest point
    pub seg_index: usize,

    /// Index of the segment containing the target
    pub target_seg_index: usize,

    /// Signed curvature (1/radius) of the arc to the target, positive turns left. Zero is
    /// straight ahead.
    pub curvature: f64,

    /// True if the curvature was limited to the minimum turn radius. The vehicle cannot follow
    /// the path exactly here.
    pub clamped: bool,
}

/// Output of a controller step.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum PursuitOutput {
    /// The path is still being followed.
    Tracking(PursuitResult),

    /// The robot has passed the end of the path.
    Complete,
}

/// The status report containing monitoring quantities for the current cycle.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Distance from the robot to its closest point on the path
    pub cross_track_dist: f64,

    /// Straight line distance from the robot to the target
    pub lookahead_dist: f64,

    /// Angle from the robot's heading to the target, in (-pi, pi]
    pub alpha_rad: f64,

    /// Number of times the controller skipped ahead this cycle
    pub num_skips: usize,

    /// If true the curvature demand was limited
    pub curvature_clamped: bool,

    /// If true the end of the path has been reached
    pub path_complete: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The possible modes of execution of PursuitCtrl.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PursuitCtrlMode {
    /// No path has been started.
    Off,

    /// Following the path.
    Tracking,

    /// The path has been completed, every further step reports completion.
    Done,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PursuitCtrl {
    /// Create a new controller with the given parameters.
    pub fn new(params: Params) -> Result<Self, PursuitCtrlError> {
        params.validate()?;

        Ok(Self {
            params,
            mode: PursuitCtrlMode::Off,
            segments: Vec::new(),
            seg_index: 0,
            report: StatusReport::default(),
        })
    }

    /// Initialise the PursuitCtrl module.
    ///
    /// Expected init data is a path to the parameter file.
    pub fn init(params_path: &str) -> Result<Self, PursuitCtrlError> {
        let params: Params =
            util::params::load(params_path).map_err(PursuitCtrlError::ParamLoadError)?;

        Self::new(params)
    }

    /// Begin following the path made of the given segments.
    ///
    /// Any run already in progress is replaced. If there are no segments an error is returned and
    /// the controller is left untouched.
    pub fn start(
        &mut self,
        segments: Vec<Segment>,
        initial_pose: &Pose,
    ) -> Result<(), PursuitCtrlError> {
        if segments.is_empty() {
            return Err(PursuitCtrlError::EmptyPath);
        }

        info!(
            "Starting pursuit of a {} segment path, {:.3} from the robot",
            segments.len(),
            (segments[0].start - initial_pose.position).norm()
        );

        self.segments = segments;
        self.seg_index = 0;
        self.report = StatusReport::default();
        self.mode = PursuitCtrlMode::Tracking;

        Ok(())
    }

    /// Abort the current run, returning the controller to `Off`.
    pub fn abort(&mut self) {
        if self.mode != PursuitCtrlMode::Off {
            info!("Pursuit aborted on segment {}", self.seg_index);
        }

        self.segments.clear();
        self.seg_index = 0;
        self.mode = PursuitCtrlMode::Off;
    }

    /// Process pursuit control for the robot's current pose.
    ///
    /// Once the path is complete this keeps returning [`PursuitOutput::Complete`] without
    /// changing any state.
    pub fn step(&mut self, pose: &Pose) -> Result<PursuitOutput, PursuitCtrlError> {
        match self.mode {
            PursuitCtrlMode::Off => Err(PursuitCtrlError::NotStarted),
            PursuitCtrlMode::Done => Ok(PursuitOutput::Complete),
            PursuitCtrlMode::Tracking => Ok(self.mode_tracking(pose)),
        }
    }

    pub fn mode(&self) -> PursuitCtrlMode {
        self.mode
    }

    pub fn is_done(&self) -> bool {
        self.mode == PursuitCtrlMode::Done
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The segments of the current run.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Index of the segment the robot is currently on.
    pub fn seg_index(&self) -> usize {
        self.seg_index
    }

    /// The status report from the latest step.
    pub fn report(&self) -> StatusReport {
        self.report
    }
}

impl PursuitCtrl {
    /// Mode tracking.
    fn mode_tracking(&mut self, pose: &Pose) -> PursuitOutput {
        self.report = StatusReport::default();

        let position = pose.position;

        // ---- TARGET SEARCH ----

        // Each pass either finds the target or skips to a later segment, so there are at most as
        // many passes as there are segments.
        let (closest_point, target, target_seg_index) = loop {
            let (closest_point, fraction) = match self.find_closest(&position) {
                Some(c) => c,
                None => {
                    info!("End of path reached");
                    self.mode = PursuitCtrlMode::Done;
                    self.report.path_complete = true;
                    return PursuitOutput::Complete;
                }
            };

            let (target, target_seg_index) = self.find_target(fraction);

            if (target - position).norm() < self.params.skip_dist
                && target_seg_index > self.seg_index
            {
                debug!(
                    "Target within skip distance, skipping from segment {} to {}",
                    self.seg_index, target_seg_index
                );
                self.seg_index = target_seg_index;
                self.report.num_skips += 1;
                continue;
            }

            break (closest_point, target, target_seg_index);
        };

        // ---- CURVATURE ----

        let to_target = target - position;
        let lookahead_dist = to_target.norm();

        let (alpha_rad, mut curvature) = if lookahead_dist < std::f64::EPSILON {
            (0.0, 0.0)
        } else {
            let alpha_rad = get_ang_dist(pose.heading_rad, to_target[1].atan2(to_target[0]));
            (alpha_rad, 2.0 * alpha_rad.sin() / lookahead_dist)
        };

        // The arc through the target sweeps 2*alpha, more than half a circle means the target is
        // behind the robot.
        let max_curvature = self.params.max_curvature();
        let clamped =
            2.0 * alpha_rad.abs() > std::f64::consts::PI || curvature.abs() > max_curvature;

        if clamped {
            let sign = if curvature != 0.0 {
                curvature.signum()
            } else {
                alpha_rad.signum()
            };

            debug!(
                "Curvature demand {:.5} limited to {:.5} (alpha {:.3} rad)",
                curvature,
                sign * max_curvature,
                alpha_rad
            );

            curvature = sign * max_curvature;
        }

        self.report.cross_track_dist = (closest_point - position).norm();
        self.report.lookahead_dist = lookahead_dist;
        self.report.alpha_rad = alpha_rad;
        self.report.curvature_clamped = clamped;

        trace!(
            "Segment {}, closest ({:.3}, {:.3}), target ({:.3}, {:.3}) on {}, curvature {:.5}",
            self.seg_index,
            closest_point[0],
            closest_point[1],
            target[0],
            target[1],
            target_seg_index,
            curvature
        );

        PursuitOutput::Tracking(PursuitResult {
            closest_point,
            target,
            seg_index: self.seg_index,
            target_seg_index,
            curvature,
            clamped,
        })
    }

    /// Find the closest point on the path to the given position, searching forwards from the
    /// current segment.
    ///
    /// The current segment is advanced to the first segment the position has not passed the end
    /// of. Returns the closest point and its fraction along that segment, or `None` if the
    /// position is beyond the end of every remaining segment.
    fn find_closest(&mut self, position: &Vector2<f64>) -> Option<(Waypoint, f64)> {
        for (i, seg) in self.segments.iter().enumerate().skip(self.seg_index) {
            let fraction = seg.projection(position);

            if fraction < 1.0 {
                let fraction = fraction.max(0.0);
                self.seg_index = i;
                return Some((seg.point_at(fraction), fraction));
            }
        }

        None
    }

    /// Find the point `pursuit_dist` ahead of the closest point, measured along the path.
    ///
    /// `fraction` is the position of the closest point along the current segment. If the rest of
    /// the path is shorter than the pursuit distance the end of the path is returned. Also
    /// returns the index of the segment containing the target.
    fn find_target(&self, fraction: f64) -> (Waypoint, usize) {
        let mut remaining = self.params.pursuit_dist;
        let mut fraction = fraction;

        for (i, seg) in self.segments.iter().enumerate().skip(self.seg_index) {
            let available = (1.0 - fraction) * seg.length;

            if remaining <= available {
                return (seg.point_at(fraction) + remaining * seg.direction, i);
            }

            remaining -= available;
            fraction = 0.0;
        }

        // Not empty while tracking
        let last = self.segments.len() - 1;
        (self.segments[last].end, last)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
