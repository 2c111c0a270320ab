//! The byte-level connection to the drive.
//!
//! The driver only needs to open and close the line, write bytes and read up to
//! a delimiter. Anything providing that can implement [`Transport`]. Two
//! implementations are provided: [`SerialTransport`] for a serial port and
//! [`StreamTransport`] for any other byte stream implementing [`Read`] and
//! [`Write`], like a TCP socket to a serial server.

pub mod serial;

pub use serial::{SerialSettings, SerialTransport};

use std::{
    fmt::Debug,
    io::{self, BufRead, BufReader, Read, Write},
};

/// Connection the driver talks to the drive over
///
/// All errors are passed through the driver untouched as
/// [`DriverError::Transport`][super::DriverError::Transport].
pub trait Transport: Send {
    fn open(&mut self) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()>;

    fn is_open(&self) -> bool;

    /// Writes all of `bytes` and flushes them
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Reads up to and including the next `delimiter`
    fn read_until(&mut self, delimiter: u8) -> io::Result<Vec<u8>>;
}

pub(crate) fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "transport is closed")
}

// reads a whole frame. running out of bytes before the delimiter is an error,
// a partial frame is useless to the driver
pub(crate) fn read_frame<R: BufRead>(reader: &mut R, delimiter: u8) -> io::Result<Vec<u8>> {
    // size chosen more or less randomly, should fit most replies
    let mut buf = Vec::with_capacity(64);
    reader.read_until(delimiter, &mut buf)?;
    if buf.last() == Some(&delimiter) {
        Ok(buf)
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "stream ended before delimiter, got {:?}",
                String::from_utf8_lossy(&buf)
            ),
        ))
    }
}

//

/// [`Transport`] over any byte stream
///
/// The stream is considered open from the start. [`close`][Transport::close]
/// only marks it closed, the stream itself is closed once the transport is
/// dropped.
pub struct StreamTransport<S: Read + Write + Send> {
    // wrap into bufreader so reading until '\r' is easier
    stream: BufReader<S>,
    open: bool,
}

impl<S: Read + Write + Send> StreamTransport<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
            open: true,
        }
    }

    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }
}

impl<S: Read + Write + Send> Transport for StreamTransport<S> {
    fn open(&mut self) -> io::Result<()> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if self.open {
            self.open = false;
            self.stream.get_mut().flush()?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        if !self.open {
            return Err(not_connected());
        }
        let stream = self.stream.get_mut();
        stream.write_all(bytes)?;
        stream.flush()
    }

    fn read_until(&mut self, delimiter: u8) -> io::Result<Vec<u8>> {
        if !self.open {
            return Err(not_connected());
        }
        read_frame(&mut self.stream, delimiter)
    }
}

impl<S: Read + Write + Send> Debug for StreamTransport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StreamTransport {{ stream: _, open: {:?} }}", self.open)
    }
}

#[cfg(test)]
mod tests {
    use super::{StreamTransport, Transport};
    use parker_oem750x_test::Interface;
    use std::io::ErrorKind;

    #[test]
    fn read_frames() {
        let mut interface = Interface::new();
        interface.add_read(b"1G\r*1R\r");
        let mut t = StreamTransport::new(interface.clone());
        assert_eq!(t.read_until(b'\r').unwrap(), b"1G\r");
        assert_eq!(t.read_until(b'\r').unwrap(), b"*1R\r");
        assert!(interface.is_empty());
    }

    #[test]
    fn read_without_delimiter() {
        let mut interface = Interface::new();
        interface.add_read(b"*1R");
        let mut t = StreamTransport::new(interface);
        // the mock times out once it runs dry, like a serial port would
        let e = t.read_until(b'\r').unwrap_err();
        assert_eq!(e.kind(), ErrorKind::TimedOut);
    }

    #[test]
    fn read_frame_eof() {
        let mut reader: &[u8] = b"*1R";
        let e = super::read_frame(&mut reader, b'\r').unwrap_err();
        assert_eq!(e.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn closed() {
        let mut interface = Interface::new();
        interface.add_write(b"1G\r");
        let mut t = StreamTransport::new(interface.clone());
        t.close().unwrap();
        assert!(!t.is_open());
        assert_eq!(
            t.write_bytes(b"1G\r").unwrap_err().kind(),
            ErrorKind::NotConnected
        );
        t.open().unwrap();
        t.write_bytes(b"1G\r").unwrap();
        assert!(interface.is_empty());
    }
}
