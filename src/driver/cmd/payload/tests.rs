use super::{
    ClosedLoopStatus, Direction, DisableSwitch, Edge, IndexerStatus, LimitsStatus,
    MovementMode, Polarity, StatusRegister, SwitchState,
};
use crate::driver::{parse::ParseError, DriverError};

#[test]
fn closed_loop_table() {
    let decoded: Vec<String> = ['@', 'A', 'B', 'C']
        .iter()
        .map(|&c| ClosedLoopStatus::from_char(c).unwrap().to_string())
        .collect();
    assert_eq!(decoded, vec!["01", "11", "00", "10"]);
}

#[test]
fn closed_loop_fields() {
    let s = ClosedLoopStatus::from_char('C').unwrap();
    assert!(s.stall);
    assert!(!s.home_ok);
}

#[test]
fn closed_loop_unknown() {
    for c in ['D', 'H', 'a', '?'] {
        assert!(matches!(
            ClosedLoopStatus::from_char(c),
            Err(DriverError::UnknownStatusCode(u)) if u == c
        ));
    }
}

#[test]
fn limits_table() {
    let table = [
        ('@', "0000"),
        ('A', "1000"),
        ('B', "0100"),
        ('D', "0010"),
        ('E', "1010"),
        ('F', "0110"),
        ('H', "0001"),
        ('I', "1001"),
        ('J', "0101"),
        ('L', "0011"),
        ('M', "1011"),
        ('N', "0111"),
    ];
    for (c, bits) in table {
        assert_eq!(LimitsStatus::from_char(c).unwrap().to_string(), bits);
    }
}

#[test]
fn limits_unknown() {
    for c in ['C', 'G', 'K', 'O'] {
        assert!(matches!(
            LimitsStatus::from_char(c),
            Err(DriverError::UnknownStatusCode(u)) if u == c
        ));
    }
}

#[test]
fn limits_asserted() {
    let l = LimitsStatus::from_char('H').unwrap();
    assert!(l.is_asserted(Edge::CCW));
    assert!(!l.is_asserted(Edge::CW));
    let l = LimitsStatus::from_char('L').unwrap();
    assert!(l.is_asserted(Edge::CCW) && l.is_asserted(Edge::CW));
}

#[test]
fn register_views_share_a_character() {
    let r = StatusRegister::parse("A").unwrap();
    assert_eq!(r.closed_loop().unwrap().to_string(), "11");
    assert_eq!(r.limits().unwrap().to_string(), "1000");

    // valid for the limits, unknown for the closed loop view
    let r = StatusRegister::parse("H").unwrap();
    assert!(r.limits().is_ok());
    assert!(matches!(
        r.closed_loop(),
        Err(DriverError::UnknownStatusCode('H'))
    ));
}

#[test]
fn register_wrong_length() {
    assert!(matches!(
        StatusRegister::parse("AB"),
        Err(DriverError::Parsing(ParseError::StatusLength(s))) if s == "AB"
    ));
    assert!(StatusRegister::parse("").is_err());
}

#[test]
fn indexer_status() {
    assert_eq!(IndexerStatus::parse("R").unwrap(), IndexerStatus::Ready);
    assert_eq!(
        IndexerStatus::parse("S").unwrap(),
        IndexerStatus::ReadyWithAttention
    );
    assert_eq!(IndexerStatus::parse("B").unwrap(), IndexerStatus::Busy);
    let s = IndexerStatus::parse("C").unwrap();
    assert!(s.is_busy() && s.needs_attention());
    assert!(matches!(
        IndexerStatus::parse("X"),
        Err(DriverError::UnknownStatusCode('X'))
    ));
}

#[test]
fn enum_display() {
    assert_eq!(MovementMode::Absolute.to_string(), "1");
    assert_eq!(SwitchState::NormallyClosed.to_string(), "0");
    assert_eq!(Polarity::Inverted.to_string(), "1");
    assert_eq!(DisableSwitch::DisableBoth.to_string(), "3");
    assert_eq!(Direction::Forward.to_string(), "+");
    assert_eq!(Direction::Backward.to_string(), "-");
    assert_eq!(Direction::Toggle.to_string(), "");
}

#[test]
fn enum_try_from() {
    assert_eq!(
        DisableSwitch::try_from(2).unwrap(),
        DisableSwitch::DisableCCW
    );
    assert!(matches!(
        DisableSwitch::try_from(4),
        Err(DriverError::InvalidArgument { value, .. }) if value == "4"
    ));
    assert!(MovementMode::try_from(2).is_err());
}

#[test]
fn edge_from_str() {
    assert_eq!("CW".parse::<Edge>().unwrap(), Edge::CW);
    assert_eq!("CCW".parse::<Edge>().unwrap(), Edge::CCW);
    assert!(matches!(
        "cw".parse::<Edge>(),
        Err(DriverError::InvalidArgument { value, .. }) if value == "cw"
    ));
}

#[test]
fn direction_edge() {
    assert_eq!(Direction::Forward.edge(), Some(Edge::CW));
    assert_eq!(Direction::Backward.edge(), Some(Edge::CCW));
    assert_eq!(Direction::Toggle.edge(), None);
}
