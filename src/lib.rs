//! Rust driver for Parker OEM750X stepper drives, talking the ASCII command
//! protocol over RS232.
//!
//! For more information on the commands see the OEM750X user guide.
//!
//! # Usage
//! Each connection to a drive gets its own [`Driver`], which needs a
//! [`Transport`] to talk over, usually a [`SerialTransport`]. A [`Motor`] for
//! each channel can then be obtained by calling [`Driver::motor`]. A motor has
//! all the functions found in the manual, more or less named the same. Every
//! function sends its command, waits for the drive to echo it and, if it's a
//! getter, waits for the reply and parses it.
//!
//! The driver and motors can be cloned and shared between threads, every
//! exchange with the drive is done under a lock so they never interleave.
//!
//! The driver logs through [`tracing`], install a subscriber to see what goes
//! over the wire.
//!
//! # Examples
//! ```no_run
//! # use parker_oem750x::{Driver, DisableSwitch, SerialSettings, SerialTransport};
//! use std::time::Duration;
//!
//! let settings = SerialSettings::new("/dev/ttyUSB0").timeout(Duration::from_secs(2));
//! let driver = Driver::new(Box::new(SerialTransport::new(settings)));
//! driver.connect().unwrap();
//! let m1 = driver.motor(1).unwrap();
//!
//! m1.set_normal_mode().unwrap();
//! m1.set_disable_switch(DisableSwitch::DisableBoth).unwrap();
//! m1.set_target_velocity(0.5).unwrap();
//! m1.set_target_acceleration(0.5).unwrap();
//! m1.set_resolution(50000).unwrap();
//! m1.set_target_distance(50000).unwrap();
//! m1.go().unwrap();
//!
//! let position = m1.get_absolute_position().unwrap();
//! let limits = m1.get_limits_status().unwrap();
//! println!("at {} with limits {}", position, limits);
//! ```
//!

mod driver;
pub(crate) mod util;

pub use driver::{
    cmd::{
        frame::Reply,
        payload::*,
        Address, Argument, Command, Decode, Entry, Operation, Value,
    },
    homing::{CancelToken, Homing, HomingReport},
    motor::{AllMotor, Motor},
    transport::{SerialSettings, SerialTransport, StreamTransport, Transport},
    Driver, DriverError, ParseError,
};
