//! Handles to the channels of a drive.
//!
//! A [`Motor`] talks to a single channel, an [`AllMotor`] to all of them at
//! once. Both are only thin wrappers around the driver, they hold no state
//! apart from their address and can be cloned and sent to other threads
//! freely.

pub mod all;
pub mod single;

pub use self::{all::AllMotor, single::Motor};

use super::DriverError;

pub(crate) type DResult<T> = Result<T, DriverError>;

// generates the functions Motor and AllMotor have in common.
// $write is the function used to send a command, it has to have the signature
// fn(&Self, Operation, Option<Value>) -> DResult<()>. Operation, Value,
// Direction and DResult have to be in scope where it's called
macro_rules! motor_common_functions {
    ($write:path) => {
        /// Starts the move set up before
        pub fn go(&self) -> DResult<()> {
            $write(self, Operation::Go, None)
        }

        /// Stops the move, decelerating with the set acceleration
        pub fn stop(&self) -> DResult<()> {
            $write(self, Operation::Stop, None)
        }

        /// Moves in `direction` with `speed` (in rps) until the home switch is
        /// found
        ///
        /// # Errors
        /// [`DriverError::InvalidArgument`][crate::DriverError::InvalidArgument]
        /// if `direction` is [`Toggle`][Direction::Toggle] or `speed` isn't
        /// within 0.01 to 50.
        pub fn go_home(&self, direction: Direction, speed: f64) -> DResult<()> {
            $write(self, Operation::GoHome, Some(Value::Homing(direction, speed)))
        }
    };
}

pub(crate) use motor_common_functions;
