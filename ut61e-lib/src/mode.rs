//! Measurement modes and their range tables.
//!
//! The same 3-bit range selector means different things depending on the
//! mode code and on the percent and Hz sub-modes, so the table to index is
//! chosen first and the selector is applied second.

use num_enum::{FromPrimitive, IntoPrimitive};
use strum_macros::Display;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One entry of a range table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RangeInfo {
    /// Full scale as printed on the dial, e.g. `"4.000"`
    pub label: &'static str,
    /// Unit symbol of the range, e.g. `"mV"`
    pub unit: &'static str,
    /// Weight of one display count in this range
    pub multiplier: f64,
}

const fn range(label: &'static str, unit: &'static str, multiplier: f64) -> RangeInfo {
    RangeInfo {
        label,
        unit,
        multiplier,
    }
}

pub static RANGE_VOLTAGE: [RangeInfo; 5] = [
    range("4.000", "V", 0.001),
    range("40.00", "V", 0.01),
    range("400.0", "V", 0.1),
    range("1000", "V", 1.0),
    range("400.0", "mV", 0.1),
];

pub static RANGE_CURRENT_A: [RangeInfo; 1] = [range("10.00", "A", 0.01)];

pub static RANGE_CURRENT_MA: [RangeInfo; 2] = [range("40.00", "mA", 0.01), range("400.0", "mA", 0.1)];

pub static RANGE_CURRENT_UA: [RangeInfo; 2] = [range("400.0", "uA", 0.1), range("4000", "uA", 1.0)];

pub static RANGE_RESISTANCE: [RangeInfo; 6] = [
    range("400.0", "Ohm", 0.1),
    range("4.000", "kOhm", 0.001),
    range("40.00", "kOhm", 0.01),
    range("400.0", "kOhm", 0.1),
    range("4.000", "MOhm", 0.001),
    range("40.00", "MOhm", 0.01),
];

pub static RANGE_CONTINUITY: [RangeInfo; 1] = [range("400.0", "Ohm", 0.1)];

pub static RANGE_DIODE: [RangeInfo; 1] = [range("4.000", "V", 0.001)];

pub static RANGE_CAPACITANCE: [RangeInfo; 7] = [
    range("40.00", "nF", 0.01),
    range("400.0", "nF", 0.1),
    range("4.000", "uF", 0.001),
    range("40.00", "uF", 0.01),
    range("400.0", "uF", 0.1),
    range("4.000", "mF", 0.001),
    range("40.00", "mF", 0.01),
];

pub static RANGE_TEMPERATURE: [RangeInfo; 2] = [range("400.0", "°C", 0.1), range("752.0", "°F", 0.1)];

pub static RANGE_HFE: [RangeInfo; 1] = [range("1000", "hFE", 1.0)];

/// Used by the frequency mode and by the Hz sub-mode of voltage and current.
pub static RANGE_FREQUENCY: [RangeInfo; 7] = [
    range("99.99", "Hz", 0.01),
    range("999.9", "Hz", 0.1),
    range("9.999", "kHz", 0.001),
    range("99.99", "kHz", 0.01),
    range("999.9", "kHz", 0.1),
    range("9.999", "MHz", 0.001),
    range("99.99", "MHz", 0.01),
];

const DUTY_CYCLE: RangeInfo = range("100.0", "%", 0.1);

/// Duty cycle has a single scale whatever the selector says.
pub static RANGE_PERCENT: [RangeInfo; 8] = [DUTY_CYCLE; 8];

/// Mode code carried in the low nibble of byte 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoPrimitive, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[repr(u8)]
pub enum MeasurementMode {
    #[strum(to_string = "Current (A)")]
    CurrentA = 0x0,
    Diode = 0x1,
    Frequency = 0x2,
    Resistance = 0x3,
    Temperature = 0x4,
    Continuity = 0x5,
    Capacitance = 0x6,
    #[strum(to_string = "hFE")]
    Hfe = 0x7,
    Voltage = 0xB,
    #[strum(to_string = "Current (uA)")]
    CurrentMicroA = 0xD,
    #[strum(to_string = "Current (mA)")]
    CurrentMilliA = 0xF,

    #[num_enum(catch_all)]
    Unknown(u8),
}

impl MeasurementMode {
    /// The mode's own range table, before any sub-mode override.
    pub fn range_table(&self) -> &'static [RangeInfo] {
        match self {
            MeasurementMode::CurrentA => &RANGE_CURRENT_A,
            MeasurementMode::Diode => &RANGE_DIODE,
            MeasurementMode::Frequency => &RANGE_FREQUENCY,
            MeasurementMode::Resistance => &RANGE_RESISTANCE,
            MeasurementMode::Temperature => &RANGE_TEMPERATURE,
            MeasurementMode::Continuity => &RANGE_CONTINUITY,
            MeasurementMode::Capacitance => &RANGE_CAPACITANCE,
            MeasurementMode::Hfe => &RANGE_HFE,
            MeasurementMode::Voltage => &RANGE_VOLTAGE,
            MeasurementMode::CurrentMicroA => &RANGE_CURRENT_UA,
            MeasurementMode::CurrentMilliA => &RANGE_CURRENT_MA,
            MeasurementMode::Unknown(_) => &[],
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MeasurementMode::Unknown(_))
    }
}

/// Picks the table for the active sub-mode and indexes it by `range_index`.
///
/// Percent wins over Hz if a frame ever sets both.
pub fn resolve_range(mode: MeasurementMode, range_index: u8, percent: bool, hertz: bool) -> Option<RangeInfo> {
    let table: &[RangeInfo] = if percent {
        &RANGE_PERCENT
    } else if hertz {
        &RANGE_FREQUENCY
    } else {
        mode.range_table()
    };
    table.get(range_index as usize).copied()
}

/// The canonical (mode, range, unit, multiplier) tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRange {
    pub mode: MeasurementMode,
    pub range: Option<RangeInfo>,
}

impl ResolvedRange {
    pub fn new(mode_code: u8, range_index: u8, percent: bool, hertz: bool) -> Self {
        let mode = MeasurementMode::from_primitive(mode_code);
        Self {
            mode,
            range: resolve_range(mode, range_index, percent, hertz),
        }
    }

    pub fn mode_name(&self) -> String {
        self.mode.to_string()
    }

    pub fn label(&self) -> Option<&'static str> {
        self.range.map(|r| r.label)
    }

    pub fn unit(&self) -> Option<&'static str> {
        self.range.map(|r| r.unit)
    }

    pub fn multiplier(&self) -> Option<f64> {
        self.range.map(|r| r.multiplier)
    }
}
