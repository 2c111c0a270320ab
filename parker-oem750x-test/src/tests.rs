use super::{Event, Interface};
use std::io::{ErrorKind, Read, Write};

#[test]
fn read_small_buffer() {
    let mut i = Interface::new();
    let mut buf = [0u8; 8];
    let expected = b"thisisatest";
    i.add_read(expected);
    assert_eq!(i.read(&mut buf).unwrap(), 8);
    assert_eq!(buf, expected[..8]);
    assert_eq!(i.read(&mut buf).unwrap(), expected.len() - 8);
    assert_eq!(buf[..expected.len() - 8], expected[8..]);
}

#[test]
fn read_big_buffer() {
    let mut i = Interface::new();
    let mut buf = [0u8; 64];
    let expected = b"thisisatest";
    i.add_read(expected);
    assert_eq!(i.read(&mut buf).unwrap(), expected.len());
    assert_eq!(&buf[..expected.len()], expected);
}

#[test]
fn read_empty() {
    let mut i = Interface::new();
    let mut buf = [0u8; 32];
    let e = i.read(&mut buf).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::TimedOut);
}

#[test]
fn write_small_buffer() {
    let mut i = Interface::new();
    let expected = b"thisisatest";
    i.add_write(expected);
    assert_eq!(i.write(&expected[..8]).unwrap(), 8);
    assert_eq!(i.write(&expected[8..]).unwrap(), expected.len() - 8);
    assert!(i.is_empty());
}

#[test]
#[should_panic]
fn write_wrong_buf() {
    let mut i = Interface::new();
    i.add_write(b"thisisatest");
    let _ = i.write(b"anothertest");
}

#[test]
#[should_panic]
fn write_empty() {
    let mut i = Interface::new();
    let _ = i.write(b"thisisatest");
}

#[test]
fn responder_echoes_and_replies() {
    let mut i = Interface::with_responder(|cmd| (cmd == b"1R\r").then(|| b"*1R\r".to_vec()));
    let mut buf = [0u8; 64];
    i.write_all(b"1R\r").unwrap();
    let n = i.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"1R\r*1R\r");
    i.write_all(b"1G\r").unwrap();
    let n = i.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"1G\r");
    assert_eq!(i.written(), vec![b"1R\r".to_vec(), b"1G\r".to_vec()]);
}

#[test]
fn events_are_recorded_in_order() {
    let mut i = Interface::new();
    let mut buf = [0u8; 8];
    i.add_cmd_echo(b"1S\r");
    i.write_all(b"1S\r").unwrap();
    let n = i.read(&mut buf).unwrap();
    assert_eq!(n, 3);
    assert_eq!(
        i.events(),
        vec![Event::Write(b"1S\r".to_vec()), Event::Read(b"1S\r".to_vec())]
    );
}
