
pub mod cmd;
pub mod homing;
mod map;
pub mod motor;
mod parse;
pub mod transport;

pub use self::parse::ParseError;

use self::{
    cmd::{frame, Command},
    motor::{AllMotor, Motor},
    transport::Transport,
};
use crate::util::ensure;
use parking_lot::Mutex;
use std::{fmt::Debug, io, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{debug, trace, warn};

// unfortunately, due to rustfmt not having the blank_lines_upper_bound feature
// stable yet, we gotta put comments in between the different sections. otherwise
// its just too much

//

/// Errors returned by any part of the driver
///
/// None of them are handled inside the driver, every error ends the call that
/// caused it. After an error from anything that moves the motor, the state of
/// the drive is unknown and it should be stopped or homed again.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Thrown if anything is sent while the transport isn't open
    #[error("driver isn't connected")]
    NotConnected,
    /// Thrown if an argument is out of the range or set of values the drive
    /// accepts. Nothing is sent in that case.
    #[error("invalid value for {what}: {value}")]
    InvalidArgument { what: &'static str, value: String },
    /// Thrown if the drive didn't echo back exactly what was sent
    #[error("echo didn't match, sent {sent:?} but received {received:?}")]
    EchoMismatch { sent: String, received: String },
    /// Wrapper around whatever the [`Transport`] returned
    #[error(transparent)]
    Transport(#[from] io::Error),
    /// Thrown if a reply couldn't be parsed
    #[error(transparent)]
    Parsing(#[from] ParseError),
    /// Thrown if a status character isn't part of the corresponding table
    #[error("unknown status code {0:?}")]
    UnknownStatusCode(char),
    /// Thrown by [`Motor::go_home_hard`] if its
    /// [`CancelToken`][homing::CancelToken] was cancelled
    #[error("cancelled")]
    Cancelled,
    /// Thrown by [`Motor::go_home_hard`] if it took longer than its timeout
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

//

// the mutex guards every single exchange with the drive. the protocol is half
// duplex, so a second command may only go out once the first one got its echo
// and, if it's a query, its reply
pub(crate) struct InnerDriver {
    transport: Mutex<Box<dyn Transport>>,
}

impl InnerDriver {
    // sends cmd and checks the echo, the transport has to be locked already
    fn send(transport: &mut dyn Transport, cmd: &Command) -> Result<(), DriverError> {
        // checked before anything touches the transport
        ensure!(transport.is_open(), DriverError::NotConnected);
        let bytes = cmd.to_bytes();
        trace!(cmd = %cmd, "writing");
        transport.write_bytes(&bytes)?;
        let echo = transport.read_until(map::DELIMITER)?;
        if echo != bytes {
            let received = echo.strip_suffix(&[map::DELIMITER]).unwrap_or(&echo);
            let received = String::from_utf8_lossy(received).into_owned();
            warn!(cmd = %cmd, received = %received, "echo mismatch");
            return Err(DriverError::EchoMismatch {
                sent: cmd.to_string(),
                received,
            });
        }
        Ok(())
    }

    pub fn write(&self, cmd: &Command) -> Result<(), DriverError> {
        let mut transport = self.transport.lock();
        Self::send(&mut **transport, cmd)
    }

    pub fn request(&self, cmd: &Command) -> Result<String, DriverError> {
        let mut transport = self.transport.lock();
        if let Err(e) = Self::send(&mut **transport, cmd) {
            // the drive still sends a reply after a bad echo. read it so it
            // isn't taken as the echo of the next command
            if matches!(e, DriverError::EchoMismatch { .. }) {
                if let Ok(stale) = transport.read_until(map::DELIMITER) {
                    debug!(cmd = %cmd, reply = %frame::clean(&stale), "dropped reply");
                }
            }
            return Err(e);
        }
        let reply = frame::clean(&transport.read_until(map::DELIMITER)?);
        trace!(cmd = %cmd, reply = %reply, "received reply");
        Ok(reply)
    }
}

impl Debug for InnerDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InnerDriver {{ transport: _ }}")
    }
}

//

/// Represents a single connection to an OEM750X drive
///
/// The driver itself doesn't really do much, to actually move something a
/// [`Motor`] is needed, which can be obtained by calling [`motor`][Driver::motor].
/// Commands to all channels at once go through [`AllMotor`].
///
/// The driver is cheap to clone and can be shared between threads. Every
/// exchange with the drive, writes as well as queries, holds an exclusive lock
/// on the transport for its whole duration, so commands from different threads
/// never interleave on the wire.
#[derive(Debug, Clone)]
pub struct Driver {
    inner: Arc<InnerDriver>,
}

impl Driver {
    /// Returns a new driver talking over `transport`. The transport isn't
    /// opened here, see [`connect`][Driver::connect].
    ///
    /// # Examples
    /// ```no_run
    /// # use parker_oem750x::{Driver, SerialSettings, SerialTransport};
    /// let transport = SerialTransport::new(SerialSettings::new("/dev/ttyUSB0"));
    /// let driver = Driver::new(Box::new(transport));
    /// driver.connect().unwrap();
    /// ```
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(InnerDriver {
                transport: Mutex::new(transport),
            }),
        }
    }

    /// Opens the transport
    pub fn connect(&self) -> Result<(), DriverError> {
        self.inner.transport.lock().open()?;
        debug!("connected");
        Ok(())
    }

    /// Closes the transport. Handles obtained from this driver stay valid but
    /// return [`DriverError::NotConnected`] until it's connected again.
    pub fn disconnect(&self) -> Result<(), DriverError> {
        self.inner.transport.lock().close()?;
        debug!("disconnected");
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.inner.transport.lock().is_open()
    }

    /// Returns a handle to the given channel
    ///
    /// # Errors
    /// [`DriverError::InvalidArgument`] if `channel` is 0.
    pub fn motor(&self, channel: u8) -> Result<Motor, DriverError> {
        ensure!(
            channel >= 1,
            DriverError::InvalidArgument {
                what: "channel",
                value: channel.to_string(),
            }
        );
        Ok(Motor::new(Arc::clone(&self.inner), channel))
    }

    /// Returns a handle sending commands to all channels at once
    pub fn all_motor(&self) -> AllMotor {
        AllMotor::new(Arc::clone(&self.inner))
    }

    /// Sends `cmd` and verifies its echo
    pub fn write(&self, cmd: &Command) -> Result<(), DriverError> {
        self.inner.write(cmd)
    }

    /// Sends `cmd`, verifies its echo and returns the reply without carriage
    /// returns and NUL bytes
    ///
    /// If the echo doesn't match, the reply is still read and dropped before
    /// [`DriverError::EchoMismatch`] is returned, so the next exchange starts
    /// clean. Waiting for that reply can take up to the transport's timeout.
    pub fn request(&self, cmd: &Command) -> Result<String, DriverError> {
        self.inner.request(cmd)
    }
}
