
use super::super::{
    map,
    parse::{parse_hex_i32, ParseError},
};
use nom::{
    bytes::complete::{tag, take_while},
    character::complete::digit1,
    sequence::tuple,
    IResult, Parser,
};

/// Removes carriage returns and NUL bytes from a reply
///
/// Only used on reply payloads, echoes are compared byte for byte.
pub(crate) fn clean(response: &[u8]) -> String {
    let cleaned: Vec<u8> = response
        .iter()
        .copied()
        .filter(|&b| b != b'\r' && b != b'\0')
        .collect();
    String::from_utf8_lossy(&cleaned).into_owned()
}

//

/// Reply to a query, split into its envelope and value
///
/// The drive answers queries with `*<channel><letters><value>`, e.g. `*1V0.50`
/// or `*2R`. The value always keeps at least one character, so a reply
/// consisting only of digits or only of letters after the `*` gives the last
/// one to the value (`*1R` is channel 1 with value `R`).
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Reply<'a> {
    pub channel: &'a str,
    pub letters: &'a str,
    pub value: &'a str,
}

fn envelope(s: &str) -> IResult<&str, (&str, &str)> {
    tuple((
        tag(map::REPLY),
        digit1,
        take_while(|c: char| c.is_ascii_uppercase()),
    ))
    .map(|(_, digits, letters)| (digits, letters))
    .parse(s)
}

impl<'a> Reply<'a> {
    pub fn parse(s: &'a str) -> Result<Self, ParseError> {
        let (rem, (digits, letters)) =
            envelope(s).map_err(|_| ParseError::Envelope(s.to_owned()))?;
        if !rem.is_empty() {
            return Ok(Reply {
                channel: digits,
                letters,
                value: rem,
            });
        }
        // nothing left for the value, hand it the last character of whatever
        // came before, as long as the channel keeps at least one digit
        if let Some(last) = letters.char_indices().last() {
            Ok(Reply {
                channel: digits,
                letters: &letters[..last.0],
                value: &letters[last.0..],
            })
        } else if digits.len() > 1 {
            let split = digits.len() - 1;
            Ok(Reply {
                channel: &digits[..split],
                letters,
                value: &digits[split..],
            })
        } else {
            Err(ParseError::Envelope(s.to_owned()))
        }
    }
}

/// Decodes the reply to `W3`: hex digits, optionally preceded by the reply
/// marker, read as a 32 bit two's complement value
pub(crate) fn parse_relative_position(s: &str) -> Result<i32, ParseError> {
    let digits = s.strip_prefix(map::REPLY).unwrap_or(s);
    parse_hex_i32(digits).map_err(|_| ParseError::Number(s.to_owned()))
}
