//! Bit layouts of the single-byte fields of a frame.
//!
//! Fields are declared least significant bit first, so the first `bool` of a
//! struct is mask `0x01`.

use modular_bitfield::prelude::*;

/// Byte 0: range selector and sign.
///
/// The sign is bit 7, not an ASCII '+'/'-' byte.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignRange {
    pub range: B3,
    #[skip]
    unused: B4,
    pub negative: bool,
}

/// Byte 6: mode code and one-hot decimal point position.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMode {
    pub mode: B4,
    pub point: B4,
}

/// Byte 7: display state.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusByte {
    pub bargraph: bool,
    pub hold: bool,
    pub relative: bool,
    pub ac: bool,
    pub dc: bool,
    pub autorange: bool,
    pub overload: bool,
    #[skip]
    unused: bool,
}

/// Byte 8: min/max recording and power state.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionByte {
    #[skip]
    unused_low: bool,
    pub nano: bool,
    pub low_battery: bool,
    pub auto_power_off: bool,
    pub min: bool,
    pub max: bool,
    #[skip]
    unused_high: B2,
}

/// Byte 9: sub-modes and unit prefix.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefixByte {
    pub underload: bool,
    pub percent: bool,
    pub diode: bool,
    pub beep: bool,
    pub mega: bool,
    pub kilo: bool,
    pub milli: bool,
    pub micro: bool,
}

/// Byte 10: unit annunciators.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitByte {
    pub fahrenheit: bool,
    pub degree: bool,
    pub farad: bool,
    pub hertz: bool,
    pub hfe: bool,
    pub ohm: bool,
    pub ampere: bool,
    pub volt: bool,
}

/// Byte 11: bargraph segment count with sign in the top bit.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bargraph {
    pub magnitude: B7,
    pub negative: bool,
}

impl Bargraph {
    pub fn signed(&self) -> i8 {
        // B7 fits in i8 without overflow
        let magnitude = self.magnitude() as i8;
        if self.negative() { -magnitude } else { magnitude }
    }
}
