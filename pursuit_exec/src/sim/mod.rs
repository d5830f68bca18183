//! # Simulation module
//!
//! Runs the control loop for a simulated robot: each cycle the pursuit controller is stepped with
//! the current pose and the resulting curvature is integrated over the cycle's elapsed time.
//! The loop stops when the controller reports the path is complete.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod clock;
pub mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;

// Internal
pub use clock::*;
pub use params::SimParams;

use crate::{
    kinematics::integrate,
    loc::Pose,
    path::Segment,
    pursuit_ctrl::{PursuitCtrl, PursuitCtrlError, PursuitOutput, StatusReport},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A simulated robot following a path.
pub struct Sim {
    params: SimParams,

    ctrl: PursuitCtrl,

    pose: Pose,

    /// Number of cycles executed in the current run
    num_ticks: u64,

    /// Simulated time elapsed in the current run
    sim_time_s: f64,
}

/// The result of a single cycle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TickOutput {
    /// Cycle number, starting at 1
    pub tick: u64,

    /// Simulated time at the end of the cycle
    pub time_s: f64,

    /// Time step used for the cycle
    pub dt: f64,

    /// Pose at the end of the cycle
    pub pose: Pose,

    /// Controller output for the cycle
    pub output: PursuitOutput,

    /// Controller monitoring quantities for the cycle
    pub report: StatusReport,
}

/// Flattened form of a [`TickOutput`] suitable for CSV archiving.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TickRecord {
    pub tick: u64,
    pub time_s: f64,
    pub x: f64,
    pub y: f64,
    pub heading_rad: f64,
    pub seg_index: Option<usize>,
    pub target_x: Option<f64>,
    pub target_y: Option<f64>,
    pub curvature: Option<f64>,
    pub clamped: bool,
    pub cross_track_dist: f64,
    pub lookahead_dist: f64,
    pub alpha_rad: f64,
    pub num_skips: usize,
    pub complete: bool,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    /// Number of cycles, including the one which reported completion
    pub num_ticks: u64,

    /// Total simulated time
    pub sim_time_s: f64,

    /// Number of cycles in which the curvature demand was limited
    pub num_clamped: u64,

    /// Pose at the start of every cycle, followed by the final pose
    pub trajectory: Vec<Pose>,

    pub final_pose: Pose,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Pursuit control error: {0}")]
    CtrlError(PursuitCtrlError),

    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// The time step was negative, infinite or NaN.
    #[error("Invalid time step ({0} s) supplied")]
    InvalidDt(f64),

    #[error("The path was not completed within {0} cycles")]
    TickLimitExceeded(u64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Sim {
    pub fn new(ctrl: PursuitCtrl, params: SimParams) -> Result<Self, SimError> {
        params.validate()?;

        Ok(Self {
            params,
            ctrl,
            pose: Pose::default(),
            num_ticks: 0,
            sim_time_s: 0.0,
        })
    }

    /// Initialise the simulation from the controller and simulation parameter files.
    pub fn init(ctrl_params_path: &str, sim_params_path: &str) -> Result<Self, SimError> {
        let ctrl = PursuitCtrl::init(ctrl_params_path).map_err(SimError::CtrlError)?;
        let params: SimParams =
            util::params::load(sim_params_path).map_err(SimError::ParamLoadError)?;

        Self::new(ctrl, params)
    }

    /// Override the linear speed of the robot.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), SimError> {
        SimParams { speed, ..self.params.clone() }.validate()?;
        self.params.speed = speed;

        Ok(())
    }

    /// Start a new run along the given segments from the given pose.
    pub fn start(&mut self, segments: Vec<Segment>, initial_pose: Pose) -> Result<(), SimError> {
        self.ctrl
            .start(segments, &initial_pose)
            .map_err(SimError::CtrlError)?;

        self.pose = initial_pose;
        self.num_ticks = 0;
        self.sim_time_s = 0.0;

        Ok(())
    }

    /// Execute a single cycle lasting `dt` seconds.
    ///
    /// The controller is stepped with the current pose and the robot then drives along the
    /// demanded curvature. Once the path is complete the pose no longer changes.
    pub fn tick(&mut self, dt: f64) -> Result<TickOutput, SimError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(SimError::InvalidDt(dt));
        }

        let output = self.ctrl.step(&self.pose).map_err(SimError::CtrlError)?;

        if let PursuitOutput::Tracking(ref res) = output {
            self.pose = integrate(&self.pose, self.params.speed, res.curvature, dt);
        }

        self.num_ticks += 1;
        self.sim_time_s += dt;

        Ok(TickOutput {
            tick: self.num_ticks,
            time_s: self.sim_time_s,
            dt,
            pose: self.pose,
            output,
            report: self.ctrl.report(),
        })
    }

    /// Run cycles until the path is complete, taking time steps from `clock`.
    ///
    /// `on_tick` is called with the output of every cycle.
    pub fn run<F>(&mut self, clock: &mut dyn Clock, mut on_tick: F) -> Result<SimReport, SimError>
    where
        F: FnMut(&TickOutput),
    {
        let mut trajectory = vec![self.pose];
        let mut num_clamped = 0;

        info!("Beginning simulation loop");

        loop {
            if self.params.max_ticks != 0 && self.num_ticks >= self.params.max_ticks {
                return Err(SimError::TickLimitExceeded(self.params.max_ticks));
            }

            let out = self.tick(clock.tick())?;
            on_tick(&out);

            match out.output {
                PursuitOutput::Tracking(res) => {
                    if res.clamped {
                        num_clamped += 1;
                    }
                    trajectory.push(out.pose);
                }
                PursuitOutput::Complete => break,
            }
        }

        info!(
            "Path complete after {} cycles ({:.3} s), {} clamped",
            self.num_ticks, self.sim_time_s, num_clamped
        );
        debug!("Final pose: {:?}", self.pose);

        Ok(SimReport {
            num_ticks: self.num_ticks,
            sim_time_s: self.sim_time_s,
            num_clamped,
            trajectory,
            final_pose: self.pose,
        })
    }

    /// Current pose of the simulated robot.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn ctrl(&self) -> &PursuitCtrl {
        &self.ctrl
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn is_complete(&self) -> bool {
        self.ctrl.is_done()
    }
}

impl TickOutput {
    pub fn record(&self) -> TickRecord {
        let res = match self.output {
            PursuitOutput::Tracking(r) => Some(r),
            PursuitOutput::Complete => None,
        };

        TickRecord {
            tick: self.tick,
            time_s: self.time_s,
            x: self.pose.position[0],
            y: self.pose.position[1],
            heading_rad: self.pose.heading_rad,
            seg_index: res.map(|r| r.seg_index),
            target_x: res.map(|r| r.target[0]),
            target_y: res.map(|r| r.target[1]),
            curvature: res.map(|r| r.curvature),
            clamped: res.map(|r| r.clamped).unwrap_or(false),
            cross_track_dist: self.report.cross_track_dist,
            lookahead_dist: self.report.lookahead_dist,
            alpha_rad: self.report.alpha_rad,
            num_skips: self.report.num_skips,
            complete: res.is_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
