//! Time sources for the simulation loop

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use std::thread;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of simulation time.
pub trait Clock {
    /// Wait for the next cycle and return the number of seconds elapsed since the previous call.
    fn tick(&mut self) -> f64;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A virtual clock which advances by the same step every cycle, without waiting.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    step_s: f64,
}

/// A real time clock which paces cycles to the target period.
#[derive(Debug, Clone)]
pub struct WallClock {
    period: Duration,
    prev_instant: Option<Instant>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FixedStepClock {
    pub fn new(step_s: f64) -> Self {
        Self { step_s }
    }
}

impl Clock for FixedStepClock {
    fn tick(&mut self) -> f64 {
        self.step_s
    }
}

impl WallClock {
    pub fn new(period_s: f64) -> Self {
        Self {
            period: Duration::from_secs_f64(period_s.max(0.0)),
            prev_instant: None,
        }
    }
}

impl Clock for WallClock {
    /// The first call returns zero and starts timing. Later calls sleep for whatever remains of
    /// the period since the previous call, warning if the cycle overran.
    fn tick(&mut self) -> f64 {
        let prev = match self.prev_instant {
            Some(p) => p,
            None => {
                self.prev_instant = Some(Instant::now());
                return 0.0;
            }
        };

        let cycle_dur = Instant::now() - prev;

        match self.period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - self.period.as_secs_f64()
            ),
        }

        let now = Instant::now();
        self.prev_instant = Some(now);

        (now - prev).as_secs_f64()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fixed_step_clock() {
        let mut clock = FixedStepClock::new(0.25);
        assert_eq!(clock.tick(), 0.25);
        assert_eq!(clock.tick(), 0.25);
    }

    #[test]
    fn test_wall_clock_paces_cycles() {
        let mut clock = WallClock::new(0.01);
        assert_eq!(clock.tick(), 0.0);

        let dt = clock.tick();
        assert!(dt >= 0.01);
    }
}
