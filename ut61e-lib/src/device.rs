use crate::error::DmmError;
use crate::frame::{Frame, hex_string};
use crate::measurement::Measurement;
use crate::reader::{FrameReader, Transport};
use crate::serial::{SerialConfig, SerialTransport};
use bytes::Bytes;
use tracing::warn;

/// A UNI-T UT61E attached through its serial cable.
///
/// Owns the transport for its whole lifetime. Every call runs one bounded,
/// blocking read cycle.
pub struct Ut61e<T = SerialTransport> {
    reader: FrameReader<T>,
}

impl Ut61e<SerialTransport> {
    /// Open and configure the serial port described by `config`.
    pub fn open(config: &SerialConfig) -> Result<Self, DmmError> {
        let transport = SerialTransport::open(config)?;
        Ok(Self::with_transport(transport, config.retries))
    }
}

impl<T: Transport> Ut61e<T> {
    pub fn with_transport(transport: T, retries: usize) -> Self {
        Self {
            reader: FrameReader::with_retries(transport, retries),
        }
    }

    pub fn reader_mut(&mut self) -> &mut FrameReader<T> {
        &mut self.reader
    }

    /// The next valid frame's bytes, or empty bytes when none arrived.
    pub fn read_raw_data(&mut self) -> Result<Bytes, DmmError> {
        self.reader.read_raw()
    }

    /// The next frame as space-separated hex, empty when none arrived.
    pub fn read_hex_str_data(&mut self) -> Result<String, DmmError> {
        let data = self.read_raw_data()?;
        Ok(hex_string(&data))
    }

    pub fn read_frame(&mut self) -> Result<Option<Frame>, DmmError> {
        self.reader.read_frame()
    }

    /// Reads and decodes one measurement. `Ok(None)` means the meter sent
    /// nothing usable this cycle, which happens while it is off or settling.
    pub fn get_measurement(&mut self) -> Result<Option<Measurement>, DmmError> {
        let Some(frame) = self.read_frame()? else {
            return Ok(None);
        };
        if !frame.separator_ok() {
            warn!(frame = %frame, "Unexpected separator byte");
        }
        Ok(Some(Measurement::from(&frame)))
    }
}
