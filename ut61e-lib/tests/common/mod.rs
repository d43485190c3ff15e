//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use ut61e_lib::constants::{FRAME_LEN, OVERFLOW_SENTINEL, TERMINATOR};
#[allow(unused_imports)]
pub use ut61e_lib::error::DmmError;
#[allow(unused_imports)]
pub use ut61e_lib::measurement::{DecimalPoint, Measurement, Reading};
#[allow(unused_imports)]
pub use ut61e_lib::mode::MeasurementMode;
#[allow(unused_imports)]
pub use ut61e_lib::{Frame, FrameReader, Transport, Ut61e, is_frame_valid};

use std::collections::VecDeque;

/// "+1.234 V", DC, autorange, nothing else set
#[allow(dead_code)]
pub const VOLTAGE_DC_AUTO: &str = "0031323334202b30000080000d0a";

/// Same display with '?' in the first digit byte
#[allow(dead_code)]
pub const VOLTAGE_OVERFLOW: &str = "003f303a3f202b30000080000d0a";

/// Routes the library's trace output to the test harness. Safe to call from every test.
#[allow(dead_code)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("ut61e_lib=trace"))
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Vec<u8> {
    hex::decode(hex_data).expect("Failed to decode hex")
}

#[allow(dead_code)]
pub fn decode(bytes: &[u8]) -> Measurement {
    let frame = Frame::try_from(bytes).expect("Failed to parse frame");
    Measurement::from(&frame)
}

#[allow(dead_code)]
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

/// Builds frames field by field on top of an all-zero digit frame.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    bytes: [u8; FRAME_LEN],
}

#[allow(dead_code)]
impl FrameBuilder {
    pub fn new() -> Self {
        Self {
            bytes: [
                0x00, b'0', b'0', b'0', b'0', b' ', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, TERMINATOR[0], TERMINATOR[1],
            ],
        }
    }

    pub fn digits(mut self, digits: [u8; 4]) -> Self {
        for (i, d) in digits.iter().enumerate() {
            self.bytes[1 + i] = b'0' + d;
        }
        self
    }

    pub fn raw_digit_byte(mut self, index: usize, value: u8) -> Self {
        self.bytes[1 + index] = value;
        self
    }

    pub fn negative(mut self, negative: bool) -> Self {
        if negative {
            self.bytes[0] |= 0x80;
        } else {
            self.bytes[0] &= !0x80;
        }
        self
    }

    pub fn range(mut self, range: u8) -> Self {
        self.bytes[0] = (self.bytes[0] & !0x07) | (range & 0x07);
        self
    }

    pub fn mode(mut self, code: u8) -> Self {
        self.bytes[6] = (self.bytes[6] & 0xF0) | (code & 0x0F);
        self
    }

    pub fn point_nibble(mut self, nibble: u8) -> Self {
        self.bytes[6] = (self.bytes[6] & 0x0F) | (nibble << 4);
        self
    }

    /// Decimal point in front of digit `position` (1..=4)
    pub fn point(self, position: u8) -> Self {
        self.point_nibble(1 << (position - 1))
    }

    pub fn status(mut self, mask: u8) -> Self {
        self.bytes[7] |= mask;
        self
    }

    pub fn options(mut self, mask: u8) -> Self {
        self.bytes[8] |= mask;
        self
    }

    pub fn prefix(mut self, mask: u8) -> Self {
        self.bytes[9] |= mask;
        self
    }

    pub fn unit(mut self, mask: u8) -> Self {
        self.bytes[10] |= mask;
        self
    }

    pub fn bargraph(mut self, value: u8) -> Self {
        self.bytes[11] = value;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

/// Hands out scripted reads and counts how often input was discarded.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MockTransport {
    pub reads: VecDeque<Vec<u8>>,
    pub discards: usize,
    pub read_calls: usize,
    pub fail_with: Option<std::io::ErrorKind>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new(reads: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            reads: reads.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn failing(kind: std::io::ErrorKind) -> Self {
        Self {
            fail_with: Some(kind),
            ..Self::default()
        }
    }
}

impl Transport for MockTransport {
    fn discard_input(&mut self) -> Result<(), DmmError> {
        self.discards += 1;
        Ok(())
    }

    fn read_until(&mut self, _terminator: &[u8], max_len: usize) -> Result<Bytes, DmmError> {
        self.read_calls += 1;
        if let Some(kind) = self.fail_with {
            return Err(DmmError::Io(std::io::Error::new(kind, "mock transport failure")));
        }
        let mut data = self.reads.pop_front().unwrap_or_default();
        data.truncate(max_len);
        Ok(Bytes::from(data))
    }
}
