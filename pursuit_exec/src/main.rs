//! Pursuit simulation executable entry point.
//!
//! # Architecture
//!
//! The execution consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Load the sketched path and reduce it:
//!         - Remove coincident points
//!         - Simplify
//!         - Build segments
//!     - Simulation loop, until the end of the path is reached:
//!         - Pursuit control processing
//!         - Kinematic integration
//!         - Archiving
//!     - Save the simplified path and the run summary

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::{fs, path::PathBuf};
use structopt::StructOpt;

// Internal
use pursuit_lib::{
    instructions::instructions,
    loc::Pose,
    path::Path,
    pursuit_ctrl::Params,
    sim::{Clock, FixedStepClock, Sim, SimParams, SimReport, WallClock},
};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Points closer together than this are treated as the same point.
const MIN_POINT_SEP: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Follow a sketched path with pure pursuit control on a simulated robot.
#[derive(Debug, StructOpt)]
#[structopt(name = "pursuit_sim")]
struct Opts {
    /// JSON file containing the path, as `{"points": [[x, y], ...]}`
    #[structopt(parse(from_os_str))]
    path_file: PathBuf,

    /// Simplification tolerance, in field units
    #[structopt(short, long, default_value = "5.0")]
    tolerance: f64,

    /// Use the radial distance pre-pass when simplifying
    #[structopt(long)]
    fast: bool,

    /// Override the robot speed from the simulation parameters
    #[structopt(short, long)]
    speed: Option<f64>,
}

/// Summary of the run saved into the session.
#[derive(Serialize)]
struct RunSummary<'a> {
    path_file: &'a PathBuf,
    num_raw_points: usize,
    num_points: usize,
    path_length: Option<f64>,
    ctrl_params: &'a Params,
    sim_params: &'a SimParams,
    report: &'a SimReport,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("pursuit_sim", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Pursuit Simulation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- INITIALISE SIMULATION ----

    let mut sim =
        Sim::init("pursuit_ctrl.toml", "sim.toml").wrap_err("Failed to initialise the Sim")?;

    if let Some(speed) = opts.speed {
        sim.set_speed(speed).wrap_err("Invalid speed override")?;
    }

    info!("Sim init complete");

    // ---- LOAD PATH ----

    info!("Loading path from {:?}", opts.path_file);

    let path_str = fs::read_to_string(&opts.path_file)
        .wrap_err_with(|| format!("Failed to read {:?}", opts.path_file))?;
    let mut raw_path: Path =
        serde_json::from_str(&path_str).wrap_err("Failed to parse the path file")?;
    let num_raw_points = raw_path.get_num_points();

    raw_path.remove_coincident(MIN_POINT_SEP);

    let path = raw_path.simplify(opts.tolerance, !opts.fast);
    let segments = path.segments().wrap_err("Simplified path is invalid")?;

    if segments.is_empty() {
        return Err(eyre!(
            "The path must contain at least two distinct points, found {}",
            path.get_num_points()
        ));
    }

    info!(
        "Path simplified from {} to {} points, {:.2} long",
        num_raw_points,
        path.get_num_points(),
        path.length().unwrap_or(0.0)
    );

    info!("Instructions:");
    for instr in instructions(&segments) {
        info!("    {}", instr);
    }

    // Start at the beginning of the path facing along the first segment
    let initial_pose = Pose::new(
        segments[0].start[0],
        segments[0].start[1],
        segments[0].angle_rad,
    );

    // ---- START RUN ----

    sim.start(segments, initial_pose)
        .wrap_err("Failed to start the simulation")?;

    let mut archiver =
        Archiver::from_path(&session, "sim/ticks.csv").wrap_err("Failed to create the archive")?;

    let cycle_period_s = sim.params().cycle_period_s;
    let mut clock: Box<dyn Clock> = if sim.params().real_time {
        Box::new(WallClock::new(cycle_period_s))
    } else {
        Box::new(FixedStepClock::new(cycle_period_s))
    };

    // ---- MAIN LOOP ----

    let report = sim
        .run(clock.as_mut(), |out| {
            if let Err(e) = archiver.serialise(out.record()) {
                warn!("Could not archive tick {}: {}", out.tick, e);
            }
        })
        .wrap_err("Simulation failed")?;

    // ---- SAVE ----

    session
        .save("path.json", &path)
        .wrap_err("Failed to save the simplified path")?;
    session
        .save(
            "summary.json",
            &RunSummary {
                path_file: &opts.path_file,
                num_raw_points,
                num_points: path.get_num_points(),
                path_length: path.length(),
                ctrl_params: sim.ctrl().params(),
                sim_params: sim.params(),
                report: &report,
            },
        )
        .wrap_err("Failed to save the run summary")?;

    info!(
        "Run complete: {} cycles, {:.2} s simulated, {} clamped, final pose ({:.2}, {:.2}, {:.1} deg)",
        report.num_ticks,
        report.sim_time_s,
        report.num_clamped,
        report.final_pose.position[0],
        report.final_pose.position[1],
        report.final_pose.get_heading().to_degrees()
    );

    Ok(())
}
