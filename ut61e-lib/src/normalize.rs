//! Rescaling of displayed values to base units.
//!
//! Voltage goes to V, current to A, resistance to Ohm, capacitance to F and
//! frequency to Hz. Anything else (%, temperature, hFE) is left alone.

#[cfg(feature = "serde")]
use serde::Serialize;

/// `(displayed unit, scale, base unit)`
pub static NORM_RULES: [(&str, f64, &str); 14] = [
    ("V", 1.0, "V"),
    ("mV", 1e-3, "V"),
    ("A", 1.0, "A"),
    ("mA", 1e-3, "A"),
    ("uA", 1e-6, "A"),
    ("Ohm", 1.0, "Ohm"),
    ("kOhm", 1e3, "Ohm"),
    ("MOhm", 1e6, "Ohm"),
    ("nF", 1e-9, "F"),
    ("uF", 1e-6, "F"),
    ("mF", 1e-3, "F"),
    ("Hz", 1.0, "Hz"),
    ("kHz", 1e3, "Hz"),
    ("MHz", 1e6, "Hz"),
];

/// A value expressed in the base unit of its quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NormalizedValue<'a> {
    pub value: f64,
    pub unit: &'a str,
}

fn rule(unit: &str) -> Option<(f64, &'static str)> {
    NORM_RULES
        .iter()
        .find(|(symbol, _, _)| *symbol == unit)
        .map(|&(_, scale, base)| (scale, base))
}

/// Scale factor from `unit` to its base unit, 1.0 for units without a rule.
pub fn scale_of(unit: &str) -> f64 {
    rule(unit).map_or(1.0, |(scale, _)| scale)
}

pub fn normalize(value: f64, unit: &str) -> NormalizedValue<'_> {
    match rule(unit) {
        Some((scale, base)) => NormalizedValue {
            value: value * scale,
            unit: base,
        },
        None => NormalizedValue { value, unit },
    }
}

/// Inverse of [`normalize`]: back from the base unit to `original_unit`.
pub fn denormalize(normalized: f64, original_unit: &str) -> f64 {
    normalized / scale_of(original_unit)
}
