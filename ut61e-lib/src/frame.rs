use crate::constants::{FRAME_LEN, OVERFLOW_SENTINEL, SEPARATOR, TERMINATOR};
use crate::error::DmmError;
use crate::flags::{Bargraph, OptionByte, PointMode, PrefixByte, SignRange, StatusByte, UnitByte};
use std::fmt;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Returns true iff `bytes` is exactly one frame: 14 bytes ending in CR LF.
///
/// This is the only gate before any field of a frame is trusted.
pub fn is_frame_valid(bytes: &[u8]) -> bool {
    bytes.len() == FRAME_LEN && bytes.ends_with(&TERMINATOR)
}

/// Byte-for-byte layout of a frame as it arrives on the wire.
#[derive(Debug, Clone, Copy, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct RawFrame {
    pub sign_range: u8,  // sign bit, range selector
    pub digits: [u8; 4], // most significant first
    pub separator: u8,   // always ' '
    pub point_mode: u8,  // decimal point (high nibble), mode (low nibble)
    pub status: u8,      // hold, rel, AC/DC, auto, OL
    pub options: u8,     // min/max, low battery, APO, nano
    pub prefix: u8,      // UL, %, diode, beep, M/k/m/u
    pub unit: u8,        // F, degree, farad, Hz, hFE, Ohm, A, V
    pub bargraph: u8,    // signed 7-bit segment count
    pub terminator: [u8; 2],
}

/// A frame that passed validation. Only obtainable through `TryFrom<&[u8]>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame(RawFrame);

impl Frame {
    pub fn raw(&self) -> &RawFrame {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn sign_range(&self) -> SignRange {
        SignRange::from_bytes([self.0.sign_range])
    }

    pub fn point_mode(&self) -> PointMode {
        PointMode::from_bytes([self.0.point_mode])
    }

    pub fn status(&self) -> StatusByte {
        StatusByte::from_bytes([self.0.status])
    }

    pub fn options(&self) -> OptionByte {
        OptionByte::from_bytes([self.0.options])
    }

    pub fn prefix(&self) -> PrefixByte {
        PrefixByte::from_bytes([self.0.prefix])
    }

    pub fn unit(&self) -> UnitByte {
        UnitByte::from_bytes([self.0.unit])
    }

    pub fn bargraph(&self) -> Bargraph {
        Bargraph::from_bytes([self.0.bargraph])
    }

    /// True when the first digit byte holds '?' instead of a digit.
    pub fn has_overflow_sentinel(&self) -> bool {
        self.0.digits[0] == OVERFLOW_SENTINEL
    }

    pub fn separator_ok(&self) -> bool {
        self.0.separator == SEPARATOR
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = DmmError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if !is_frame_valid(bytes) {
            return Err(DmmError::InvalidFrame { len: bytes.len() });
        }
        let raw = RawFrame::read_from_bytes(bytes).map_err(|_| DmmError::InvalidFrame { len: bytes.len() })?;
        Ok(Frame(raw))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_string(self.as_bytes()))
    }
}

/// Upper-case hex with a space between bytes, e.g. `"2B 31 0D 0A"`.
pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
