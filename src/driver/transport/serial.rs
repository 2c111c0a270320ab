use super::{not_connected, read_frame, Transport};
use serialport::{DataBits, Parity, SerialPort, StopBits};
use std::{
    fmt::Debug,
    io::{self, BufReader, Write},
    time::Duration,
};

/// Parameters of the serial line
///
/// Defaults match the factory settings of the drive: 9600 baud, 8 data bits,
/// no parity, one stop bit. Since the drive can take a while to answer while
/// it's busy, the timeout should be something sensible and big.
///
/// # Examples
/// ```
/// # use parker_oem750x::SerialSettings;
/// use std::time::Duration;
///
/// let settings = SerialSettings::new("/dev/ttyUSB0")
///     .baud_rate(19200)
///     .timeout(Duration::from_secs(2));
/// assert_eq!(settings.baud_rate, 19200);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SerialSettings {
    pub path: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub timeout: Duration,
}

impl SerialSettings {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout: Duration::from_secs(1),
        }
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`Transport`] over a serial port
///
/// The port is opened on [`open`][Transport::open], not on construction, and
/// dropped again on [`close`][Transport::close].
pub struct SerialTransport {
    settings: SerialSettings,
    port: Option<BufReader<Box<dyn SerialPort>>>,
}

impl SerialTransport {
    pub fn new(settings: SerialSettings) -> Self {
        Self {
            settings,
            port: None,
        }
    }

    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }
}

impl Transport for SerialTransport {
    fn open(&mut self) -> io::Result<()> {
        if self.port.is_some() {
            return Ok(());
        }
        let s = &self.settings;
        let port = serialport::new(&s.path, s.baud_rate)
            .data_bits(s.data_bits)
            .parity(s.parity)
            .stop_bits(s.stop_bits)
            .timeout(s.timeout)
            .open()?;
        tracing::debug!(path = %s.path, baud_rate = s.baud_rate, "opened serial port");
        self.port = Some(BufReader::new(port));
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut port) = self.port.take() {
            port.get_mut().flush()?;
            tracing::debug!(path = %self.settings.path, "closed serial port");
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        let port = self.port.as_mut().ok_or_else(not_connected)?.get_mut();
        port.write_all(bytes)?;
        port.flush()
    }

    fn read_until(&mut self, delimiter: u8) -> io::Result<Vec<u8>> {
        let port = self.port.as_mut().ok_or_else(not_connected)?;
        read_frame(port, delimiter)
    }
}

impl Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SerialTransport {{ settings: {:?}, port: {} }}",
            self.settings,
            if self.port.is_some() { "open" } else { "closed" }
        )
    }
}
