use super::{payload::Direction, Address, Command, Decode, Operation, Value};
use crate::driver::DriverError;

fn write(address: Address, op: Operation, value: Option<Value>) -> Result<String, DriverError> {
    Command::new(address, op, value).map(|c| c.as_str().to_owned())
}

fn single(op: Operation, value: Value) -> Result<String, DriverError> {
    write(Address::Single(1), op, Some(value))
}

fn is_invalid(r: Result<String, DriverError>) -> bool {
    matches!(r, Err(DriverError::InvalidArgument { .. }))
}

#[test]
fn actions() {
    let table = [
        (Operation::NormalMode, "1MN"),
        (Operation::ContinuousMode, "1MC"),
        (Operation::AbsoluteMode, "1MPA"),
        (Operation::IncrementalMode, "1MPI"),
        (Operation::ZeroPosition, "1PZ"),
        (Operation::Go, "1G"),
        (Operation::Stop, "1S"),
        (Operation::Kill, "1K"),
        (Operation::Reset, "1Z"),
    ];
    for (op, expected) in table {
        assert_eq!(write(Address::Single(1), op, None).unwrap(), expected);
    }
}

#[test]
fn broadcast() {
    assert_eq!(write(Address::All, Operation::Go, None).unwrap(), "G");
    assert_eq!(write(Address::All, Operation::Stop, None).unwrap(), "S");
    assert_eq!(
        write(
            Address::All,
            Operation::GoHome,
            Some(Value::Homing(Direction::Backward, 1.0))
        )
        .unwrap(),
        "GH-1.00"
    );
    assert!(is_invalid(write(Address::All, Operation::Kill, None)));
    assert!(is_invalid(write(
        Address::All,
        Operation::Velocity,
        Some(Value::Decimal(1.0))
    )));
}

#[test]
fn velocity() {
    assert_eq!(single(Operation::Velocity, Value::Decimal(0.5)).unwrap(), "1V0.50");
    assert_eq!(single(Operation::Velocity, Value::Decimal(50.0)).unwrap(), "1V50.00");
    assert_eq!(single(Operation::Velocity, Value::Decimal(0.001)).unwrap(), "1V0.00");
    assert!(is_invalid(single(Operation::Velocity, Value::Decimal(0.0009))));
    assert!(is_invalid(single(Operation::Velocity, Value::Decimal(50.01))));
    assert!(is_invalid(single(Operation::Velocity, Value::Decimal(f64::NAN))));
}

#[test]
fn acceleration_bounds() {
    assert_eq!(
        single(Operation::Acceleration, Value::Decimal(0.01)).unwrap(),
        "1A0.01"
    );
    assert_eq!(
        single(Operation::Acceleration, Value::Decimal(999.0)).unwrap(),
        "1A999.00"
    );
    assert!(is_invalid(single(Operation::Acceleration, Value::Decimal(0.009))));
    assert!(is_invalid(single(Operation::Acceleration, Value::Decimal(999.01))));
}

#[test]
fn resolution_bounds() {
    assert_eq!(
        single(Operation::Resolution, Value::Integer(200)).unwrap(),
        "1MR200"
    );
    assert_eq!(
        single(Operation::Resolution, Value::Integer(50800)).unwrap(),
        "1MR50800"
    );
    assert!(is_invalid(single(Operation::Resolution, Value::Integer(199))));
    assert!(is_invalid(single(Operation::Resolution, Value::Integer(50801))));
}

#[test]
fn distance_bounds() {
    assert_eq!(
        single(Operation::Distance, Value::Integer(-2_147_483_648)).unwrap(),
        "1D-2147483648"
    );
    assert_eq!(
        single(Operation::Distance, Value::Integer(2_147_483_648)).unwrap(),
        "1D2147483648"
    );
    assert!(is_invalid(single(
        Operation::Distance,
        Value::Integer(2_147_483_649)
    )));
    assert!(is_invalid(single(
        Operation::Distance,
        Value::Integer(-2_147_483_649)
    )));
}

#[test]
fn codes() {
    let table = [
        (Operation::MovementMode, 1, "1FSA1"),
        (Operation::EndLimitsState, 0, "1OSA0"),
        (Operation::IndexerMode, 1, "1FSB1"),
        (Operation::Polarity, 1, "1CMDDIR1"),
        (Operation::ErrorChecking, 0, "1SSE0"),
        (Operation::Shutdown, 1, "1ST1"),
        (Operation::DisableSwitch, 3, "1LD3"),
    ];
    for (op, code, expected) in table {
        assert_eq!(single(op, Value::Code(code)).unwrap(), expected);
    }
    assert!(is_invalid(single(Operation::DisableSwitch, Value::Code(4))));
    assert!(is_invalid(single(Operation::Polarity, Value::Code(2))));
}

#[test]
fn direction() {
    assert_eq!(
        single(Operation::Direction, Value::Direction(Direction::Forward)).unwrap(),
        "1H+"
    );
    assert_eq!(
        single(Operation::Direction, Value::Direction(Direction::Backward)).unwrap(),
        "1H-"
    );
    assert_eq!(
        single(Operation::Direction, Value::Direction(Direction::Toggle)).unwrap(),
        "1H"
    );
}

#[test]
fn go_home() {
    assert_eq!(
        single(Operation::GoHome, Value::Homing(Direction::Forward, 2.5)).unwrap(),
        "1GH+2.50"
    );
    assert_eq!(
        single(Operation::GoHome, Value::Homing(Direction::Backward, 0.01)).unwrap(),
        "1GH-0.01"
    );
    // homing keeps its own lower bound, stricter than the velocity setter
    assert!(is_invalid(single(
        Operation::GoHome,
        Value::Homing(Direction::Forward, 0.005)
    )));
    assert!(is_invalid(single(
        Operation::GoHome,
        Value::Homing(Direction::Forward, 50.5)
    )));
    assert!(matches!(
        single(Operation::GoHome, Value::Homing(Direction::Toggle, 1.0)),
        Err(DriverError::InvalidArgument { what: "homing direction", .. })
    ));
}

#[test]
fn wrong_value_kind() {
    assert!(is_invalid(single(Operation::Velocity, Value::Integer(1))));
    assert!(is_invalid(write(Address::Single(1), Operation::Velocity, None)));
    assert!(is_invalid(single(Operation::Go, Value::Code(1))));
}

#[test]
fn queries() {
    let table = [
        (Operation::Velocity, "2V"),
        (Operation::Acceleration, "2A"),
        (Operation::Distance, "2D"),
        (Operation::Resolution, "2MR"),
        (Operation::PartNumber, "2RV"),
        (Operation::IndexerStatus, "2R"),
        (Operation::StatusRegister, "2RA"),
        (Operation::AbsolutePosition, "2PR"),
        (Operation::RelativePosition, "2W3"),
        (Operation::ResetCommunication, "2%"),
    ];
    for (op, expected) in table {
        assert_eq!(Command::query(Address::Single(2), op).unwrap().as_str(), expected);
    }
}

#[test]
fn query_not_allowed() {
    assert!(Command::query(Address::Single(1), Operation::Go).is_err());
    assert!(Command::query(Address::All, Operation::Velocity).is_err());
}

#[test]
fn decode_kinds() {
    assert_eq!(Operation::RelativePosition.entry().query, Some(Decode::Hex));
    assert_eq!(Operation::AbsolutePosition.entry().query, Some(Decode::Value));
    assert_eq!(Operation::PartNumber.entry().query, Some(Decode::Raw));
    assert_eq!(Operation::Shutdown.entry().query, None);
}

#[test]
fn bytes_end_with_delimiter() {
    let c = Command::new(Address::Single(3), Operation::Stop, None).unwrap();
    assert_eq!(c.to_bytes(), b"3S\r");
    assert_eq!(c.operation(), Operation::Stop);
    assert_eq!(c.to_string(), "3S");
}

#[test]
fn velocity_reparses_within_tolerance() {
    let small = (1..10).map(|i| i as f64 / 1000.0);
    for v in small.chain((1..5000).map(|i| i as f64 * 0.01)) {
        let c = single(Operation::Velocity, Value::Decimal(v)).unwrap();
        let back: f64 = c.trim_start_matches("1V").parse().unwrap();
        assert!((back - v).abs() <= 0.005, "{} came back as {}", v, back);
    }
}
