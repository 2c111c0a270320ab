use super::{
    super::{
        cmd::{payload::Direction, Address, Command, Operation, Value},
        InnerDriver,
    },
    motor_common_functions, DResult,
};
use std::sync::Arc;

/// Controls all channels at once
///
/// Commands are sent without a channel prefix, every channel executes them.
/// Only `G`, `S` and `GH` can be broadcast, which is why there are no other
/// functions. Queries can't be sent to all channels since there would be no
/// way to tell the replies apart.
///
/// # Examples
/// ```no_run
/// # use parker_oem750x::{Driver, SerialSettings, SerialTransport};
/// let transport = SerialTransport::new(SerialSettings::new("/dev/ttyUSB0"));
/// let driver = Driver::new(Box::new(transport));
/// driver.connect().unwrap();
///
/// let all = driver.all_motor();
/// all.go().unwrap();
/// all.stop().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AllMotor(Arc<InnerDriver>);

impl AllMotor {
    pub(in super::super) fn new(driver: Arc<InnerDriver>) -> Self {
        Self(driver)
    }

    fn write(&self, operation: Operation, value: Option<Value>) -> DResult<()> {
        let cmd = Command::new(Address::All, operation, value)?;
        self.0.write(&cmd)
    }

    motor_common_functions!(AllMotor::write);
}
