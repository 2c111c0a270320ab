#[cfg(test)]
mod tests;

use std::{
    io::{self, Read, Write},
    sync::{Arc, Mutex},
};

// used to mock the serial line of an OEM750X drive.
// read contains bytes the driver can read and write contains bytes the driver
// is expected to write. once they are read/written they are removed from the
// corresponding buffer. writing something that isn't expected panics, reading
// from an empty buffer returns a TimedOut error like a serialport would.
//
// instead of scripting every write, a responder can be installed which gets
// every written command and returns the reply the drive would send after the
// echo. that's needed as soon as multiple threads talk to the same interface
// since the order of their commands isn't known beforehand.
//
// every read and write is recorded in events so tests can check the order
// things happened on the wire.
//
// it doesn't need to be fast nor pretty, its just for testing. it needs to be
// easy

/// Something that happened on the mocked line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(Vec<u8>),
    Read(Vec<u8>),
}

type Responder = Box<dyn FnMut(&[u8]) -> Option<Vec<u8>> + Send>;

#[derive(Default)]
struct State {
    read: Vec<u8>,
    write: Vec<u8>,
    responder: Option<Responder>,
    events: Vec<Event>,
}

#[derive(Clone, Default)]
pub struct Interface {
    state: Arc<Mutex<State>>,
}

impl Read for Interface {
    fn read(&mut self, mut buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.read.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "read was empty"));
        }
        let n = buf.len().min(state.read.len());
        let chunk: Vec<u8> = state.read.drain(..n).collect();
        buf.write_all(&chunk)?;
        state.events.push(Event::Read(chunk));
        Ok(n)
    }
}

impl Write for Interface {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Write(buf.to_vec()));
        if let Some(responder) = state.responder.as_mut() {
            let reply = responder(buf);
            state.read.extend_from_slice(buf);
            if let Some(reply) = reply {
                state.read.extend_from_slice(&reply);
            }
            return Ok(buf.len());
        }
        if state.write.is_empty() {
            panic!("write was empty, tried to write {:?}", String::from_utf8_lossy(buf))
        } else if state.write.starts_with(buf) {
            state.write.drain(..buf.len());
            Ok(buf.len())
        } else {
            panic!(
                "write didn't start with {:?}, write was {:?}",
                String::from_utf8_lossy(buf),
                String::from_utf8_lossy(&state.write)
            )
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Interface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an interface that answers every command with its echo followed
    /// by whatever `responder` returns for it
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: FnMut(&[u8]) -> Option<Vec<u8>> + Send + 'static,
    {
        let interface = Self::new();
        interface.state.lock().unwrap().responder = Some(Box::new(responder));
        interface
    }

    pub fn add_read(&mut self, buf: &[u8]) {
        self.state.lock().unwrap().read.extend_from_slice(buf)
    }

    pub fn add_write(&mut self, buf: &[u8]) {
        self.state.lock().unwrap().write.extend_from_slice(buf)
    }

    /// Expects `cmd` to be written and echoes it back
    pub fn add_cmd_echo(&mut self, cmd: &[u8]) {
        self.add_write(cmd);
        self.add_read(cmd);
    }

    /// Expects `cmd` to be written, echoes it back and then replies with `reply`
    pub fn add_request(&mut self, cmd: &[u8], reply: &[u8]) {
        self.add_cmd_echo(cmd);
        self.add_read(reply);
    }

    /// True if everything that was expected got written and everything that
    /// could be read was read
    pub fn is_empty(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.read.is_empty() && state.write.is_empty()
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    /// All writes in the order they happened
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Write(w) => Some(w),
                Event::Read(_) => None,
            })
            .collect()
    }
}
