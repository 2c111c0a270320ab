//! Mnemonics of the OEM750X command language

macro_rules! makepl {
    ($($name:ident, $val:literal),*) => {
        $(pub const $name: &str = $val;)*
    };
}

// symbols of the commands in the order they appear in the manual
#[rustfmt::skip]
makepl!(
    NORMAL_MODE, "MN",
    CONTINUOUS_MODE, "MC",
    ABSOLUTE_MODE, "MPA",
    INCREMENTAL_MODE, "MPI",
    ZERO_POSITION, "PZ",
    GO, "G",
    STOP, "S",
    KILL, "K",
    RESET, "Z",
    RESET_COMMUNICATION, "%",
    GO_HOME, "GH",
    VELOCITY, "V",
    ACCELERATION, "A",
    DISTANCE, "D",
    RESOLUTION, "MR",
    MOVEMENT_MODE, "FSA",
    END_LIMITS_STATE, "OSA",
    INDEXER_MODE, "FSB",
    POLARITY, "CMDDIR",
    ERROR_CHECKING, "SSE",
    SHUTDOWN, "ST",
    DISABLE_SWITCH, "LD",
    DIRECTION, "H",
    PART_NUMBER, "RV",
    INDEXER_STATUS, "R",
    STATUS_REGISTER, "RA",
    ABSOLUTE_POSITION, "PR",
    RELATIVE_POSITION, "W3"
);

/// Envelope marker in front of every reply to a query
pub const REPLY: &str = "*";
/// Terminates every command and every reply
pub const DELIMITER: u8 = b'\r';
