//! Builds the commands understood by the drive.
//!
//! Every operation of the drive is described once in a table ([`Operation::entry`])
//! holding its mnemonic, what argument it takes, whether it can be sent to all
//! channels at once and how its reply is decoded if it can be queried. A
//! [`Command`] can only be built through that table, so an argument out of range
//! never reaches the wire.
//!
//! You usually don't have to build commands yourself, [`Motor`][super::motor::Motor]
//! and [`AllMotor`][super::motor::AllMotor] do that for you.

#[cfg(test)]
mod tests;

pub mod frame;
pub mod payload;

use self::payload::Direction;
use super::{map, DriverError};
use crate::util::ensure;
use std::fmt::{Debug, Display};

// unfortunately, due to rustfmt not having the blank_lines_upper_bound feature
// stable yet, we gotta put comments in between the different sections. otherwise
// its just too much

//

/// Holds the address of a command
///
/// Used to discern whether a command goes to a specific channel or to all
/// channels. Commands to all channels are sent without a channel prefix.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Address {
    All,
    Single(u8),
}

impl Address {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => Ok(()),
            Self::Single(a) => write!(f, "{}", a),
        }
    }
}

impl From<u8> for Address {
    fn from(a: u8) -> Self {
        Self::Single(a)
    }
}

//

/// The argument an operation takes when it is written
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Argument {
    None,
    /// Rendered with exactly two decimals
    Decimal { min: f64, max: f64 },
    Integer { min: i64, max: i64 },
    /// A single digit from 0 to `max`
    Code { max: u8 },
    /// `+`, `-` or nothing
    Heading,
    /// `+` or `-` followed by the speed with two decimals
    Homing { min: f64, max: f64 },
}

/// How the reply to a query is turned into a value
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Decode {
    /// The cleaned reply as is, without looking at the envelope
    Raw,
    /// The value inside the `*<channel><letters>` envelope
    Value,
    /// Hex digits as 32 bit two's complement
    Hex,
}

/// Row of the command table
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Entry {
    pub mnemonic: &'static str,
    /// Used in error messages
    pub name: &'static str,
    pub argument: Argument,
    pub broadcast: bool,
    /// `None` if the operation can't be queried
    pub query: Option<Decode>,
}

const fn action(mnemonic: &'static str, name: &'static str) -> Entry {
    Entry {
        mnemonic,
        name,
        argument: Argument::None,
        broadcast: false,
        query: None,
    }
}

const fn setting(mnemonic: &'static str, name: &'static str, argument: Argument) -> Entry {
    Entry {
        mnemonic,
        name,
        argument,
        broadcast: false,
        query: None,
    }
}

const fn reading(mnemonic: &'static str, name: &'static str, decode: Decode) -> Entry {
    Entry {
        mnemonic,
        name,
        argument: Argument::None,
        broadcast: false,
        query: Some(decode),
    }
}

/// Every operation the drive understands
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Operation {
    NormalMode,
    ContinuousMode,
    AbsoluteMode,
    IncrementalMode,
    ZeroPosition,
    Go,
    Stop,
    Kill,
    Reset,
    ResetCommunication,
    GoHome,
    Velocity,
    Acceleration,
    Distance,
    Resolution,
    MovementMode,
    EndLimitsState,
    IndexerMode,
    Polarity,
    ErrorChecking,
    Shutdown,
    DisableSwitch,
    Direction,
    PartNumber,
    IndexerStatus,
    StatusRegister,
    AbsolutePosition,
    RelativePosition,
}

impl Operation {
    pub const fn entry(self) -> Entry {
        match self {
            Self::NormalMode => action(map::NORMAL_MODE, "normal mode"),
            Self::ContinuousMode => action(map::CONTINUOUS_MODE, "continuous mode"),
            Self::AbsoluteMode => action(map::ABSOLUTE_MODE, "absolute mode"),
            Self::IncrementalMode => action(map::INCREMENTAL_MODE, "incremental mode"),
            Self::ZeroPosition => action(map::ZERO_POSITION, "zero position"),
            Self::Go => Entry {
                broadcast: true,
                ..action(map::GO, "go")
            },
            Self::Stop => Entry {
                broadcast: true,
                ..action(map::STOP, "stop")
            },
            Self::Kill => action(map::KILL, "kill"),
            Self::Reset => action(map::RESET, "reset"),
            Self::ResetCommunication => reading(
                map::RESET_COMMUNICATION,
                "reset communication",
                Decode::Raw,
            ),
            Self::GoHome => Entry {
                broadcast: true,
                ..setting(
                    map::GO_HOME,
                    "homing speed",
                    Argument::Homing {
                        min: 0.01,
                        max: 50.0,
                    },
                )
            },
            Self::Velocity => Entry {
                query: Some(Decode::Value),
                ..setting(
                    map::VELOCITY,
                    "velocity",
                    Argument::Decimal {
                        min: 0.001,
                        max: 50.0,
                    },
                )
            },
            Self::Acceleration => Entry {
                query: Some(Decode::Value),
                ..setting(
                    map::ACCELERATION,
                    "acceleration",
                    Argument::Decimal {
                        min: 0.01,
                        max: 999.0,
                    },
                )
            },
            Self::Distance => Entry {
                query: Some(Decode::Value),
                ..setting(
                    map::DISTANCE,
                    "distance",
                    Argument::Integer {
                        min: -2_147_483_648,
                        max: 2_147_483_648,
                    },
                )
            },
            Self::Resolution => Entry {
                query: Some(Decode::Value),
                ..setting(
                    map::RESOLUTION,
                    "resolution",
                    Argument::Integer {
                        min: 200,
                        max: 50_800,
                    },
                )
            },
            Self::MovementMode => setting(map::MOVEMENT_MODE, "movement mode", Argument::Code { max: 1 }),
            Self::EndLimitsState => setting(
                map::END_LIMITS_STATE,
                "switch state",
                Argument::Code { max: 1 },
            ),
            Self::IndexerMode => setting(map::INDEXER_MODE, "indexer mode", Argument::Code { max: 1 }),
            Self::Polarity => setting(map::POLARITY, "polarity", Argument::Code { max: 1 }),
            Self::ErrorChecking => setting(
                map::ERROR_CHECKING,
                "error checking",
                Argument::Code { max: 1 },
            ),
            Self::Shutdown => setting(map::SHUTDOWN, "shutdown", Argument::Code { max: 1 }),
            Self::DisableSwitch => setting(
                map::DISABLE_SWITCH,
                "disable switch mode",
                Argument::Code { max: 3 },
            ),
            Self::Direction => setting(map::DIRECTION, "direction", Argument::Heading),
            Self::PartNumber => reading(map::PART_NUMBER, "part number", Decode::Raw),
            Self::IndexerStatus => reading(map::INDEXER_STATUS, "indexer status", Decode::Value),
            Self::StatusRegister => reading(map::STATUS_REGISTER, "status register", Decode::Value),
            Self::AbsolutePosition => reading(
                map::ABSOLUTE_POSITION,
                "absolute position",
                Decode::Value,
            ),
            Self::RelativePosition => reading(
                map::RELATIVE_POSITION,
                "relative position",
                Decode::Hex,
            ),
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.entry().name)
    }
}

//

/// Argument value handed to [`Command::new`]
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Value {
    Decimal(f64),
    Integer(i64),
    Code(u8),
    Direction(Direction),
    Homing(Direction, f64),
}

impl Value {
    // how the value shows up in an error message
    fn describe(&self) -> String {
        match self {
            Value::Decimal(v) => v.to_string(),
            Value::Integer(v) => v.to_string(),
            Value::Code(v) => v.to_string(),
            Value::Direction(d) => format!("{:?}", d),
            Value::Homing(d, v) => format!("{:?} {}", d, v),
        }
    }
}

fn check_range(name: &'static str, v: f64, min: f64, max: f64) -> Result<(), DriverError> {
    // written so NaN fails as well
    ensure!(
        v >= min && v <= max,
        DriverError::InvalidArgument {
            what: name,
            value: v.to_string(),
        }
    );
    Ok(())
}

// renders the argument of entry, checking it against the table first
fn render(entry: &Entry, value: Option<Value>) -> Result<String, DriverError> {
    let mismatch = |value: Option<Value>| DriverError::InvalidArgument {
        what: entry.name,
        value: value.map_or_else(|| "nothing".to_owned(), |v| v.describe()),
    };
    match (entry.argument, value) {
        (Argument::None, None) => Ok(String::new()),
        (Argument::Decimal { min, max }, Some(Value::Decimal(v))) => {
            check_range(entry.name, v, min, max)?;
            Ok(format!("{:.2}", v))
        }
        (Argument::Integer { min, max }, Some(Value::Integer(v))) => {
            ensure!(
                v >= min && v <= max,
                DriverError::InvalidArgument {
                    what: entry.name,
                    value: v.to_string(),
                }
            );
            Ok(v.to_string())
        }
        (Argument::Code { max }, Some(Value::Code(v))) => {
            ensure!(
                v <= max,
                DriverError::InvalidArgument {
                    what: entry.name,
                    value: v.to_string(),
                }
            );
            Ok(v.to_string())
        }
        (Argument::Heading, Some(Value::Direction(d))) => Ok(d.to_string()),
        (Argument::Homing { min, max }, Some(Value::Homing(d, v))) => {
            ensure!(
                d != Direction::Toggle,
                DriverError::InvalidArgument {
                    what: "homing direction",
                    value: format!("{:?}", d),
                }
            );
            check_range(entry.name, v, min, max)?;
            Ok(format!("{}{:.2}", d, v))
        }
        (_, value) => Err(mismatch(value)),
    }
}

/// A single command, ready to be sent
///
/// Holds the command text without the trailing carriage return, e.g. `1V0.50`.
/// It can only be constructed through [`Command::new`] or [`Command::query`],
/// which check the argument first.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Command {
    operation: Operation,
    text: String,
}

impl Command {
    /// Builds the write form of `operation`, e.g. `1V0.50` or `1G`
    ///
    /// # Errors
    /// [`DriverError::InvalidArgument`] if `value` is out of range, doesn't fit
    /// the operation or if the operation can't be broadcast but `address` is
    /// [`Address::All`].
    pub fn new(
        address: Address,
        operation: Operation,
        value: Option<Value>,
    ) -> Result<Self, DriverError> {
        let entry = operation.entry();
        Self::check_address(&entry, address)?;
        let argument = render(&entry, value)?;
        Ok(Self {
            operation,
            text: format!("{}{}{}", address, entry.mnemonic, argument),
        })
    }

    /// Builds the query form of `operation`, e.g. `1V` or `1PR`
    ///
    /// # Errors
    /// [`DriverError::InvalidArgument`] if the operation can't be queried or
    /// `address` is [`Address::All`].
    pub fn query(address: Address, operation: Operation) -> Result<Self, DriverError> {
        let entry = operation.entry();
        ensure!(
            entry.query.is_some() && address.is_single(),
            DriverError::InvalidArgument {
                what: "query",
                value: format!("{}{}", address, entry.mnemonic),
            }
        );
        Ok(Self {
            operation,
            text: format!("{}{}", address, entry.mnemonic),
        })
    }

    fn check_address(entry: &Entry, address: Address) -> Result<(), DriverError> {
        ensure!(
            entry.broadcast || address.is_single(),
            DriverError::InvalidArgument {
                what: "broadcast",
                value: entry.mnemonic.to_owned(),
            }
        );
        Ok(())
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The bytes that go on the wire, including the delimiter
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.text.len() + 1);
        bytes.extend_from_slice(self.text.as_bytes());
        bytes.push(map::DELIMITER);
        bytes
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
