//! Hard homing against an end-of-travel limit switch.
//!
//! [`Motor::go_home_hard`] drives the motor into a limit switch, backs off
//! slowly until the switch releases and then zeroes the position there. The
//! procedure is set up through [`Homing`]:
//!
//! ```no_run
//! # use parker_oem750x::{CancelToken, Direction, Driver, Edge, Homing, SerialSettings, SerialTransport};
//! use std::time::Duration;
//!
//! let transport = SerialTransport::new(SerialSettings::new("/dev/ttyUSB0"));
//! let driver = Driver::new(Box::new(transport));
//! driver.connect().unwrap();
//! let m1 = driver.motor(1).unwrap();
//!
//! let cancel = CancelToken::new();
//! let homing = Homing::new(Direction::Backward, 1.0, Edge::CCW)
//!     .unwrap()
//!     .timeout(Duration::from_secs(60))
//!     .cancel_token(cancel.clone());
//! let report = m1.go_home_hard(&homing).unwrap();
//! println!("homed in {}", report.finished_at - report.started_at);
//! ```


use super::{
    cmd::{
        payload::{Direction, Edge},
        Address, Command, Operation, Value,
    },
    motor::{DResult, Motor},
    DriverError,
};
use crate::util::ensure;
use chrono::{DateTime, Local};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};
use tracing::{info, instrument};

// velocity used to back off the switch
const RETRACT_VELOCITY: f64 = 0.01;

/// Cancels a running [`Motor::go_home_hard`] from another thread
///
/// Cancellation is checked before every poll of the limit switches. The motor
/// is not stopped, that's up to whoever cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

//

/// Parameters of [`Motor::go_home_hard`]
#[derive(Debug, Clone)]
pub struct Homing {
    direction: Direction,
    velocity: f64,
    limit: Edge,
    poll_interval: Duration,
    release_interval: Duration,
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl Homing {
    /// Homes in `direction` with `velocity` (in rps) until `limit` triggers
    ///
    /// The limit switch is polled every 100 ms while approaching and
    /// continuously while backing off. There is no timeout and no way to
    /// cancel by default.
    ///
    /// # Errors
    /// [`DriverError::InvalidArgument`] if `direction` is
    /// [`Toggle`][Direction::Toggle], `velocity` isn't within 0.01 to 50 or
    /// `limit` isn't the switch lying in `direction` (CW going forward, CCW
    /// going backward).
    pub fn new(direction: Direction, velocity: f64, limit: Edge) -> Result<Self, DriverError> {
        // same bounds as GH, which also rejects Toggle
        Command::new(
            Address::All,
            Operation::GoHome,
            Some(Value::Homing(direction, velocity)),
        )?;
        let edge = direction.edge().ok_or(DriverError::InvalidArgument {
            what: "homing direction",
            value: format!("{:?}", direction),
        })?;
        ensure!(
            edge == limit,
            DriverError::InvalidArgument {
                what: "limit switch",
                value: format!("{} when homing {:?}", limit, direction),
            }
        );
        Ok(Self {
            direction,
            velocity,
            limit,
            poll_interval: Duration::from_millis(100),
            release_interval: Duration::ZERO,
            timeout: None,
            cancel: None,
        })
    }

    /// Time between two polls while approaching the switch
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Time between two polls while backing off the switch
    pub fn release_interval(mut self, interval: Duration) -> Self {
        self.release_interval = interval;
        self
    }

    /// Maximum time the whole procedure may take. Only checked between polls,
    /// so the actual time can be longer by one round trip.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn limit(&self) -> Edge {
        self.limit
    }
}

/// Returned by a successful [`Motor::go_home_hard`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomingReport {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    /// Polls until the switch triggered
    pub approach_polls: u32,
    /// Polls until the switch released again
    pub release_polls: u32,
}

//

struct Poller<'a> {
    interval: Duration,
    deadline: Option<(Instant, Duration)>,
    cancel: Option<&'a CancelToken>,
}

impl Poller<'_> {
    // calls probe until it returns true, returns how often it was called
    fn until(&self, mut probe: impl FnMut() -> DResult<bool>) -> DResult<u32> {
        let mut polls = 0;
        loop {
            if let Some(cancel) = self.cancel {
                ensure!(!cancel.is_cancelled(), DriverError::Cancelled);
            }
            if let Some((deadline, timeout)) = self.deadline {
                ensure!(Instant::now() < deadline, DriverError::TimedOut(timeout));
            }
            polls += 1;
            if probe()? {
                return Ok(polls);
            }
            if !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
        }
    }
}

impl Motor {
    /// Homes the motor against a limit switch and zeroes its position there
    ///
    /// Stops the motor, then moves it in continuous mode with the given
    /// direction and velocity until the limit switch triggers. Afterwards it
    /// reverses at 0.01 rps until the switch releases again, stops, switches
    /// to absolute positioning and normal mode and sets the position to zero.
    ///
    /// # Errors
    /// The first error of any step ends the procedure, including
    /// [`DriverError::Cancelled`] and [`DriverError::TimedOut`]. Nothing is
    /// undone in that case, the motor may still be moving and has to be
    /// stopped or homed again.
    #[instrument(
        skip(self, homing),
        fields(channel = self.channel(), direction = ?homing.direction, limit = %homing.limit),
        err
    )]
    pub fn go_home_hard(&self, homing: &Homing) -> DResult<HomingReport> {
        let started_at = Local::now();
        let deadline = homing.timeout.map(|t| (Instant::now() + t, t));
        let poller = |interval| Poller {
            interval,
            deadline,
            cancel: homing.cancel.as_ref(),
        };
        let limit = homing.limit;

        info!("stopping");
        self.stop()?;

        info!(velocity = homing.velocity, "moving towards limit");
        self.set_target_velocity(homing.velocity)?;
        self.set_direction(homing.direction)?;
        self.set_continuous_mode()?;
        self.go()?;

        let approach_polls = poller(homing.poll_interval)
            .until(|| Ok(self.get_limits_status()?.is_asserted(limit)))?;
        info!(polls = approach_polls, "limit reached, backing off");

        self.set_target_velocity(RETRACT_VELOCITY)?;
        self.set_direction(Direction::Toggle)?;
        self.go()?;

        let release_polls = poller(homing.release_interval)
            .until(|| Ok(!self.get_limits_status()?.is_asserted(limit)))?;
        info!(polls = release_polls, "limit released, zeroing");

        self.stop()?;
        self.set_absolute_mode()?;
        self.set_normal_mode()?;
        self.set_zero_position()?;

        let finished_at = Local::now();
        info!(
            took_ms = (finished_at - started_at).num_milliseconds(),
            "homed"
        );
        Ok(HomingReport {
            started_at,
            finished_at,
            approach_polls,
            release_polls,
        })
    }
}
