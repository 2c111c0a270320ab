use nom::{
    character::complete::{hex_digit1, i64 as parse_i64, u32 as parse_u32},
    combinator::all_consuming,
    number::complete::double,
    Finish, IResult,
};
use thiserror::Error;

/// Gets thrown when a reply of the drive couldn't be turned into a value.
/// Always carries the text that was being parsed.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    /// The reply didn't have the form `*<channel><letters><value>`
    #[error("reply {0:?} doesn't match the reply envelope")]
    Envelope(String),
    /// The value of a reply wasn't a valid number
    #[error("malformed number {0:?}")]
    Number(String),
    /// A status reply didn't consist of exactly one character
    #[error("expected a single status character, got {0:?}")]
    StatusLength(String),
}

// runs parser on the whole of s. a remainder counts as malformed
fn complete<'a, O>(
    s: &'a str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> Result<O, ParseError> {
    all_consuming(parser)(s)
        .finish()
        .map(|(_, o)| o)
        .map_err(|_| ParseError::Number(s.to_owned()))
}

pub(crate) fn parse_float(s: &str) -> Result<f64, ParseError> {
    complete(s, double)
}

pub(crate) fn parse_integer(s: &str) -> Result<i64, ParseError> {
    complete(s, parse_i64)
}

pub(crate) fn parse_unsigned(s: &str) -> Result<u32, ParseError> {
    complete(s, parse_u32)
}

/// Parses hex digits as an unsigned 32 bit value and reinterprets them as
/// two's complement, so everything >= 2^31 turns negative
pub(crate) fn parse_hex_i32(s: &str) -> Result<i32, ParseError> {
    let digits = complete(s, hex_digit1)?;
    u32::from_str_radix(digits, 16)
        .map(|v| v as i32)
        .map_err(|_| ParseError::Number(s.to_owned()))
}
