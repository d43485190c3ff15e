use crate::constants::{BAUD_RATE, DEFAULT_TIMEOUT, READ_RETRIES};
use crate::error::DmmError;
use crate::reader::{Transport, read_until_from};
use bytes::Bytes;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::time::{Duration, Instant};
use tracing::info;

/// Port settings for the UT61E optical cable.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// DTR powers the receiver in the cable and must be high
    pub dtr: bool,
    pub rts: bool,
    /// Deadline of a single read attempt
    pub timeout: Duration,
    pub retries: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port().to_string(),
            baud_rate: BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            dtr: true,
            rts: false,
            timeout: DEFAULT_TIMEOUT,
            retries: READ_RETRIES,
        }
    }
}

impl SerialConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }
}

#[cfg(windows)]
fn default_port() -> &'static str {
    "COM3"
}

#[cfg(not(windows))]
fn default_port() -> &'static str {
    "/dev/ttyUSB0"
}

/// Names of the serial ports present on this machine.
pub fn list_ports() -> Result<Vec<String>, DmmError> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .collect())
}

pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    timeout: Duration,
}

impl SerialTransport {
    pub fn open(config: &SerialConfig) -> Result<Self, DmmError> {
        let mut port = serialport::new(&config.port, config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .flow_control(FlowControl::None)
            .timeout(config.timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => DmmError::PortNotFound,
                _ => DmmError::Serial(e),
            })?;

        port.write_data_terminal_ready(config.dtr)?;
        port.write_request_to_send(config.rts)?;

        info!(
            port = %config.port,
            baud = config.baud_rate,
            dtr = config.dtr,
            rts = config.rts,
            "Serial port opened"
        );

        Ok(Self {
            port,
            timeout: config.timeout,
        })
    }
}

impl Transport for SerialTransport {
    fn discard_input(&mut self) -> Result<(), DmmError> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn read_until(&mut self, terminator: &[u8], max_len: usize) -> Result<Bytes, DmmError> {
        let deadline = Instant::now() + self.timeout;
        read_until_from(&mut self.port, terminator, max_len, || Instant::now() >= deadline)
    }
}
