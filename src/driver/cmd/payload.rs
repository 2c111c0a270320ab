#[cfg(test)]
mod tests;

use super::super::{parse::ParseError, DriverError};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

// unfortunately, due to rustfmt not having the blank_lines_upper_bound feature
// stable yet, we gotta put comments in between the different sections. otherwise
// its just too much

//

// implements Display as the wire digit and TryFrom<u8> for the setting enums
macro_rules! wire_enum {
    ($name:ident, $what:literal) => {
        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", *self as u8)
            }
        }

        impl TryFrom<u8> for $name {
            type Error = DriverError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::from_u8(value).ok_or_else(|| DriverError::InvalidArgument {
                    what: $what,
                    value: value.to_string(),
                })
            }
        }
    };
}

/// Whether a move in step mode is relative to the current position or to zero
/// (`FSA`)
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, FromPrimitive)]
pub enum MovementMode {
    Incremental,
    Absolute,
}

wire_enum!(MovementMode, "movement mode");

/// Active state of the end-of-travel limit switches (`OSA`)
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, FromPrimitive)]
pub enum SwitchState {
    NormallyClosed,
    NormallyOpen,
}

wire_enum!(SwitchState, "switch state");

/// Whether moves are counted in motor steps or encoder steps (`FSB`)
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, FromPrimitive)]
pub enum IndexerMode {
    MotorSteps,
    EncoderSteps,
}

wire_enum!(IndexerMode, "indexer mode");

/// Direction polarity of the motor (`CMDDIR`)
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, FromPrimitive)]
pub enum Polarity {
    Normal,
    Inverted,
}

wire_enum!(Polarity, "polarity");

/// Which end-of-travel limit switches are ignored (`LD`)
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, FromPrimitive)]
pub enum DisableSwitch {
    EnableBoth,
    DisableCW,
    DisableCCW,
    DisableBoth,
}

wire_enum!(DisableSwitch, "disable switch mode");

//

/// Direction of the next move (`H`)
///
/// [`Toggle`][Direction::Toggle] reverses whatever direction the motor
/// currently has and is therefore not accepted where an absolute heading is
/// needed, like homing.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Direction {
    Forward,
    Backward,
    Toggle,
}

impl Direction {
    /// The limit switch that lies in this direction
    pub fn edge(&self) -> Option<Edge> {
        match self {
            Direction::Forward => Some(Edge::CW),
            Direction::Backward => Some(Edge::CCW),
            Direction::Toggle => None,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "+"),
            Direction::Backward => write!(f, "-"),
            Direction::Toggle => Ok(()),
        }
    }
}

/// One of the two end-of-travel limit switches
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Edge {
    CW,
    CCW,
}

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edge::CW => write!(f, "CW"),
            Edge::CCW => write!(f, "CCW"),
        }
    }
}

impl FromStr for Edge {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CW" => Ok(Edge::CW),
            "CCW" => Ok(Edge::CCW),
            _ => Err(DriverError::InvalidArgument {
                what: "limit switch",
                value: s.to_owned(),
            }),
        }
    }
}

//

// a status reply has to be exactly one character, anything else is a malformed
// reply rather than an unknown code
fn status_char(value: &str) -> Result<char, DriverError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ParseError::StatusLength(value.to_owned()).into()),
    }
}

/// General state of the indexer as returned by `R`
///
/// Busy means the indexer is executing a command (moving, waiting for a
/// trigger, pausing, ...). Attention indicates a drive fault, a failed go
/// home, a reached end-of-travel limit, an unsuccessful sequence or a memory
/// checksum error.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum IndexerStatus {
    Ready,
    ReadyWithAttention,
    Busy,
    BusyWithAttention,
}

impl IndexerStatus {
    pub fn from_char(c: char) -> Result<Self, DriverError> {
        match c {
            'R' => Ok(IndexerStatus::Ready),
            'S' => Ok(IndexerStatus::ReadyWithAttention),
            'B' => Ok(IndexerStatus::Busy),
            'C' => Ok(IndexerStatus::BusyWithAttention),
            c => Err(DriverError::UnknownStatusCode(c)),
        }
    }

    pub(crate) fn parse(value: &str) -> Result<Self, DriverError> {
        Self::from_char(status_char(value)?)
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            IndexerStatus::Busy | IndexerStatus::BusyWithAttention
        )
    }

    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            IndexerStatus::ReadyWithAttention | IndexerStatus::BusyWithAttention
        )
    }
}

/// Closed loop view of the status register
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct ClosedLoopStatus {
    /// The indexer detected a stall during the last move
    pub stall: bool,
    /// The last homing procedure succeeded
    pub home_ok: bool,
}

impl ClosedLoopStatus {
    pub fn from_char(c: char) -> Result<Self, DriverError> {
        let (stall, home_ok) = match c {
            '@' => (false, true),
            'A' => (true, true),
            'B' => (false, false),
            'C' => (true, false),
            c => return Err(DriverError::UnknownStatusCode(c)),
        };
        Ok(Self { stall, home_ok })
    }
}

/// Renders the bits in the order stall, home ok, e.g. `01`
impl Display for ClosedLoopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stall as u8, self.home_ok as u8)
    }
}

/// End-of-travel limits view of the status register
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct LimitsStatus {
    /// The last move was terminated by the CW limit
    pub last_move_cw: bool,
    /// The last move was terminated by the CCW limit
    pub last_move_ccw: bool,
    /// The CW limit is currently asserted
    pub cw: bool,
    /// The CCW limit is currently asserted
    pub ccw: bool,
}

impl LimitsStatus {
    pub fn from_char(c: char) -> Result<Self, DriverError> {
        let bits = match c {
            '@' => [0, 0, 0, 0],
            'A' => [1, 0, 0, 0],
            'B' => [0, 1, 0, 0],
            'D' => [0, 0, 1, 0],
            'E' => [1, 0, 1, 0],
            'F' => [0, 1, 1, 0],
            'H' => [0, 0, 0, 1],
            'I' => [1, 0, 0, 1],
            'J' => [0, 1, 0, 1],
            'L' => [0, 0, 1, 1],
            'M' => [1, 0, 1, 1],
            'N' => [0, 1, 1, 1],
            c => return Err(DriverError::UnknownStatusCode(c)),
        };
        Ok(Self {
            last_move_cw: bits[0] == 1,
            last_move_ccw: bits[1] == 1,
            cw: bits[2] == 1,
            ccw: bits[3] == 1,
        })
    }

    /// Whether the given limit switch is currently asserted
    pub fn is_asserted(&self, edge: Edge) -> bool {
        match edge {
            Edge::CW => self.cw,
            Edge::CCW => self.ccw,
        }
    }
}

/// Renders the bits in the order last move CW, last move CCW, CW, CCW, e.g.
/// `0011`
impl Display for LimitsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.last_move_cw as u8, self.last_move_ccw as u8, self.cw as u8, self.ccw as u8
        )
    }
}

/// Raw status register as returned by `RA`
///
/// The closed loop status and the limits status are two views of this one
/// character, so both should be decoded from the same reading when they need
/// to agree with each other. A character can be valid for one view and unknown
/// to the other.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub struct StatusRegister(pub char);

impl StatusRegister {
    pub(crate) fn parse(value: &str) -> Result<Self, DriverError> {
        Ok(Self(status_char(value)?))
    }

    pub fn closed_loop(&self) -> Result<ClosedLoopStatus, DriverError> {
        ClosedLoopStatus::from_char(self.0)
    }

    pub fn limits(&self) -> Result<LimitsStatus, DriverError> {
        LimitsStatus::from_char(self.0)
    }
}
