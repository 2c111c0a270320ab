use super::{
    super::{
        cmd::{
            frame::{self, Reply},
            payload::{
                ClosedLoopStatus, Direction, DisableSwitch, IndexerMode, IndexerStatus,
                LimitsStatus, MovementMode, Polarity, StatusRegister, SwitchState,
            },
            Address, Command, Decode, Operation, Value,
        },
        parse::{parse_float, parse_integer, parse_unsigned},
        InnerDriver,
    },
    motor_common_functions, DResult,
};
use std::sync::Arc;

// generates a function sending an operation without argument
macro_rules! action {
    ($(#[$meta:meta])* $name:ident, $op:ident) => {
        $(#[$meta])*
        pub fn $name(&self) -> DResult<()> {
            self.write(Operation::$op, None)
        }
    };
}

// generates a setter for one of the setting enums
macro_rules! code_setter {
    ($(#[$meta:meta])* $name:ident, $op:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(&self, value: $ty) -> DResult<()> {
            self.write(Operation::$op, Some(Value::Code(value as u8)))
        }
    };
}

/// Controls a single channel of the drive
///
/// Every function sends one command (or two for [`go_home_hard`][Motor::go_home_hard]
/// and the status getters, see there) and waits for the drive to echo it. Getters
/// then also wait for the reply and parse it.
///
/// # Errors
/// If a value doesn't match the range the drive accepts,
/// [`DriverError::InvalidArgument`][super::super::DriverError::InvalidArgument]
/// is returned and nothing is sent. Otherwise every error of
/// [`Driver::write`][super::super::Driver::write] and
/// [`Driver::request`][super::super::Driver::request] is possible, getters can
/// also return parsing errors.
///
/// # Examples
/// ```no_run
/// # use parker_oem750x::{Driver, DisableSwitch, SerialSettings, SerialTransport};
/// let transport = SerialTransport::new(SerialSettings::new("/dev/ttyUSB0"));
/// let driver = Driver::new(Box::new(transport));
/// driver.connect().unwrap();
///
/// let m1 = driver.motor(1).unwrap();
/// m1.set_normal_mode().unwrap();
/// m1.set_disable_switch(DisableSwitch::DisableBoth).unwrap();
/// m1.set_target_velocity(0.5).unwrap();
/// m1.set_target_acceleration(0.5).unwrap();
/// m1.set_resolution(50000).unwrap();
/// m1.set_target_distance(50000).unwrap();
/// m1.go().unwrap();
///
/// println!("at {}", m1.get_absolute_position().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Motor {
    driver: Arc<InnerDriver>,
    channel: u8,
}

impl Motor {
    pub(in super::super) fn new(driver: Arc<InnerDriver>, channel: u8) -> Self {
        Self { driver, channel }
    }

    fn write(&self, operation: Operation, value: Option<Value>) -> DResult<()> {
        let cmd = Command::new(Address::Single(self.channel), operation, value)?;
        self.driver.write(&cmd)
    }

    // queries operation and hands the reply to parse. replies decoded by value
    // are unwrapped from their envelope first, everything else is passed as is
    fn read<T>(&self, operation: Operation, parse: impl FnOnce(&str) -> DResult<T>) -> DResult<T> {
        let cmd = Command::query(Address::Single(self.channel), operation)?;
        let reply = self.driver.request(&cmd)?;
        match operation.entry().query {
            Some(Decode::Value) => parse(Reply::parse(&reply)?.value),
            _ => parse(&reply),
        }
    }

    /// Returns the channel this motor sends to
    pub fn channel(&self) -> u8 {
        self.channel
    }

    motor_common_functions!(Motor::write);

    action!(
        /// Switches to step mode, moves go the set distance (`MN`)
        set_normal_mode,
        NormalMode
    );
    action!(
        /// Switches to continuous mode, moves go on until stopped (`MC`)
        set_continuous_mode,
        ContinuousMode
    );
    action!(set_absolute_mode, AbsoluteMode);
    action!(set_incremental_mode, IncrementalMode);
    action!(
        /// Sets the absolute position counter to zero
        set_zero_position,
        ZeroPosition
    );
    action!(
        /// Stops immediately, without deceleration
        kill,
        Kill
    );
    action!(reset, Reset);

    /// Resets the communication of the drive (`%`) and returns whatever it
    /// replied
    pub fn reset_communication(&self) -> DResult<String> {
        self.read(Operation::ResetCommunication, |r| Ok(r.to_owned()))
    }

    /// Returns the part number and firmware revision (`RV`) as sent by the
    /// drive
    pub fn get_part_number(&self) -> DResult<String> {
        self.read(Operation::PartNumber, |r| Ok(r.to_owned()))
    }

    //

    /// Sets the velocity in rps, must be within 0.001 to 50. Sent with two
    /// decimals.
    pub fn set_target_velocity(&self, velocity: f64) -> DResult<()> {
        self.write(Operation::Velocity, Some(Value::Decimal(velocity)))
    }

    pub fn get_target_velocity(&self) -> DResult<f64> {
        self.read(Operation::Velocity, |v| Ok(parse_float(v)?))
    }

    /// Sets the acceleration in rps², must be within 0.01 to 999. Sent with
    /// two decimals.
    pub fn set_target_acceleration(&self, acceleration: f64) -> DResult<()> {
        self.write(Operation::Acceleration, Some(Value::Decimal(acceleration)))
    }

    pub fn get_target_acceleration(&self) -> DResult<f64> {
        self.read(Operation::Acceleration, |v| Ok(parse_float(v)?))
    }

    /// Sets the distance in steps, must be within ±2147483648
    pub fn set_target_distance(&self, distance: i64) -> DResult<()> {
        self.write(Operation::Distance, Some(Value::Integer(distance)))
    }

    pub fn get_target_distance(&self) -> DResult<i64> {
        self.read(Operation::Distance, |v| Ok(parse_integer(v)?))
    }

    /// Sets the motor resolution in steps per revolution, must be within 200
    /// to 50800
    pub fn set_resolution(&self, resolution: u32) -> DResult<()> {
        self.write(Operation::Resolution, Some(Value::Integer(resolution.into())))
    }

    pub fn get_resolution(&self) -> DResult<u32> {
        self.read(Operation::Resolution, |v| Ok(parse_unsigned(v)?))
    }

    //

    code_setter!(set_indexer_movement_mode, MovementMode, MovementMode);
    code_setter!(set_end_limits_state, EndLimitsState, SwitchState);
    code_setter!(set_indexer_mode, IndexerMode, IndexerMode);
    code_setter!(set_polarity, Polarity, Polarity);
    code_setter!(
        /// Sets which end-of-travel limit switches are ignored
        set_disable_switch,
        DisableSwitch,
        DisableSwitch
    );

    pub fn set_error_checking(&self, enabled: bool) -> DResult<()> {
        self.write(Operation::ErrorChecking, Some(Value::Code(enabled.into())))
    }

    pub fn set_shutdown(&self, shutdown: bool) -> DResult<()> {
        self.write(Operation::Shutdown, Some(Value::Code(shutdown.into())))
    }

    /// Sets the direction of the next move. [`Direction::Toggle`] reverses the
    /// current one.
    pub fn set_direction(&self, direction: Direction) -> DResult<()> {
        self.write(Operation::Direction, Some(Value::Direction(direction)))
    }

    //

    pub fn get_indexer_status(&self) -> DResult<IndexerStatus> {
        self.read(Operation::IndexerStatus, IndexerStatus::parse)
    }

    /// Reads the status register (`RA`) once. Use this instead of
    /// [`get_closed_loop_status`][Motor::get_closed_loop_status] and
    /// [`get_limits_status`][Motor::get_limits_status] if both are needed at the
    /// same moment.
    pub fn get_status_register(&self) -> DResult<StatusRegister> {
        self.read(Operation::StatusRegister, StatusRegister::parse)
    }

    pub fn get_closed_loop_status(&self) -> DResult<ClosedLoopStatus> {
        self.get_status_register()?.closed_loop()
    }

    pub fn get_limits_status(&self) -> DResult<LimitsStatus> {
        self.get_status_register()?.limits()
    }

    /// Returns the absolute position in steps (`PR`)
    pub fn get_absolute_position(&self) -> DResult<i64> {
        self.read(Operation::AbsolutePosition, |v| Ok(parse_integer(v)?))
    }

    /// Returns the position relative to the start of the last move (`W3`)
    pub fn get_relative_position(&self) -> DResult<i32> {
        self.read(Operation::RelativePosition, |v| {
            Ok(frame::parse_relative_position(v)?)
        })
    }
}
