use crate::constants::{DIGIT_MASK, POINT_POS_1, POINT_POS_2, POINT_POS_3, POINT_POS_4};
use crate::frame::Frame;
use crate::mode::{MeasurementMode, RangeInfo, resolve_range};
use crate::normalize::{NormalizedValue, normalize};
use num_enum::FromPrimitive;
use std::fmt;
use strum_macros::Display;
use tracing::warn;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Where the display shows its decimal point.
///
/// Position k puts the point in front of digit k, so the 4-digit integer is
/// divided by 10^(5-k).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DecimalPoint {
    #[default]
    None,
    Pos1,
    Pos2,
    Pos3,
    Pos4,
}

impl DecimalPoint {
    /// Decodes the upper nibble of byte 6. Anything but a single known bit is `None`.
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble {
            POINT_POS_1 => DecimalPoint::Pos1,
            POINT_POS_2 => DecimalPoint::Pos2,
            POINT_POS_3 => DecimalPoint::Pos3,
            POINT_POS_4 => DecimalPoint::Pos4,
            _ => DecimalPoint::None,
        }
    }

    pub fn divisor(&self) -> f64 {
        match self {
            DecimalPoint::None => 1.0,
            DecimalPoint::Pos1 => 10_000.0,
            DecimalPoint::Pos2 => 1_000.0,
            DecimalPoint::Pos3 => 100.0,
            DecimalPoint::Pos4 => 10.0,
        }
    }

    pub fn multiplier(&self) -> f64 {
        1.0 / self.divisor()
    }
}

/// What the display shows. Exactly one of these holds for any frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Reading {
    Value(f64),
    /// "OL": above the selected range
    Overload,
    /// "UL": below the selected range
    Underload,
}

/// Unit prefix annunciator lit on the LCD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum UnitPrefix {
    #[strum(to_string = "n")]
    Nano,
    #[strum(to_string = "u")]
    Micro,
    #[strum(to_string = "m")]
    Milli,
    #[strum(to_string = "k")]
    Kilo,
    #[strum(to_string = "M")]
    Mega,
}

impl UnitPrefix {
    pub fn factor(&self) -> f64 {
        match self {
            UnitPrefix::Nano => 1e-9,
            UnitPrefix::Micro => 1e-6,
            UnitPrefix::Milli => 1e-3,
            UnitPrefix::Kilo => 1e3,
            UnitPrefix::Mega => 1e6,
        }
    }
}

/// Unit annunciator lit on the LCD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum UnitAnnunciator {
    #[strum(to_string = "V")]
    Volt,
    #[strum(to_string = "A")]
    Ampere,
    #[strum(to_string = "Ohm")]
    Ohm,
    #[strum(to_string = "hFE")]
    Hfe,
    #[strum(to_string = "Hz")]
    Hertz,
    #[strum(to_string = "F")]
    Farad,
    #[strum(to_string = "°F")]
    Fahrenheit,
    #[strum(to_string = "°C")]
    Celsius,
}

/// Independent status flags, reported exactly as the frame states them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct StatusFlags {
    pub hold: bool,
    pub relative: bool,
    pub ac: bool,
    pub dc: bool,
    pub auto: bool,
    pub min: bool,
    pub max: bool,
    pub low_battery: bool,
    pub percent: bool,
    pub hertz: bool,
    pub diode: bool,
    pub beep: bool,
    pub overload: bool,
    pub underload: bool,
    pub bargraph: bool,
    pub auto_power_off: bool,
}

/// One decoded reading of the meter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Measurement {
    pub mode: MeasurementMode,
    pub range_index: u8,
    pub range: Option<RangeInfo>,
    pub reading: Reading,
    pub decimal_point: DecimalPoint,
    pub minus: bool,
    pub flags: StatusFlags,
    pub prefix: Option<UnitPrefix>,
    pub unit_annunciator: Option<UnitAnnunciator>,
    pub bargraph: Option<i8>,
}

impl From<&Frame> for Measurement {
    fn from(frame: &Frame) -> Self {
        let sign_range = frame.sign_range();
        let point_mode = frame.point_mode();
        let status = frame.status();
        let options = frame.options();
        let prefix_byte = frame.prefix();
        let unit = frame.unit();

        let flags = StatusFlags {
            hold: status.hold(),
            relative: status.relative(),
            ac: status.ac(),
            dc: status.dc(),
            auto: status.autorange(),
            min: options.min(),
            max: options.max(),
            low_battery: options.low_battery(),
            percent: prefix_byte.percent(),
            hertz: unit.hertz(),
            diode: prefix_byte.diode(),
            beep: prefix_byte.beep(),
            // The sentinel check comes before any digit is read
            overload: status.overload() || frame.has_overflow_sentinel(),
            underload: prefix_byte.underload(),
            bargraph: status.bargraph(),
            auto_power_off: options.auto_power_off(),
        };

        let minus = sign_range.negative();
        let decimal_point = DecimalPoint::from_nibble(point_mode.point());

        let reading = if flags.overload {
            Reading::Overload
        } else if flags.underload {
            Reading::Underload
        } else {
            let digits = frame
                .raw()
                .digits
                .iter()
                .fold(0u32, |acc, byte| acc * 10 + u32::from(byte & DIGIT_MASK));
            let value = digits as f64 / decimal_point.divisor();
            Reading::Value(if minus { -value } else { value })
        };

        let mode = MeasurementMode::from_primitive(point_mode.mode());
        if !mode.is_known() {
            warn!(code = point_mode.mode(), "Unknown measurement mode code");
        }
        let range_index = sign_range.range();
        let range = resolve_range(mode, range_index, flags.percent, flags.hertz);

        let prefix = if options.nano() {
            Some(UnitPrefix::Nano)
        } else if prefix_byte.micro() {
            Some(UnitPrefix::Micro)
        } else if prefix_byte.milli() {
            Some(UnitPrefix::Milli)
        } else if prefix_byte.kilo() {
            Some(UnitPrefix::Kilo)
        } else if prefix_byte.mega() {
            Some(UnitPrefix::Mega)
        } else {
            None
        };

        let unit_annunciator = if unit.volt() {
            Some(UnitAnnunciator::Volt)
        } else if unit.ampere() {
            Some(UnitAnnunciator::Ampere)
        } else if unit.ohm() {
            Some(UnitAnnunciator::Ohm)
        } else if unit.hfe() {
            Some(UnitAnnunciator::Hfe)
        } else if unit.hertz() {
            Some(UnitAnnunciator::Hertz)
        } else if unit.farad() {
            Some(UnitAnnunciator::Farad)
        } else if unit.fahrenheit() {
            Some(UnitAnnunciator::Fahrenheit)
        } else if unit.degree() {
            Some(UnitAnnunciator::Celsius)
        } else {
            None
        };

        let bargraph = flags.bargraph.then(|| frame.bargraph().signed());

        Measurement {
            mode,
            range_index,
            range,
            reading,
            decimal_point,
            minus,
            flags,
            prefix,
            unit_annunciator,
            bargraph,
        }
    }
}

impl From<Frame> for Measurement {
    fn from(frame: Frame) -> Self {
        Measurement::from(&frame)
    }
}

impl Measurement {
    /// The displayed value, `None` while the meter shows OL or UL.
    pub fn value(&self) -> Option<f64> {
        match self.reading {
            Reading::Value(value) => Some(value),
            Reading::Overload | Reading::Underload => None,
        }
    }

    pub fn is_overload(&self) -> bool {
        matches!(self.reading, Reading::Overload)
    }

    pub fn is_underload(&self) -> bool {
        matches!(self.reading, Reading::Underload)
    }

    /// Unit symbol of the active range, empty if the range is unknown.
    pub fn units(&self) -> &'static str {
        self.range.map_or("", |r| r.unit)
    }

    pub fn range_label(&self) -> &'static str {
        self.range.map_or("", |r| r.label)
    }

    pub fn normalized(&self) -> Option<NormalizedValue<'static>> {
        self.value().map(|value| normalize(value, self.units()))
    }

    /// Renders the reading the way the LCD shows it.
    ///
    /// Line one holds AC/DC, MIN/MAX, HOLD, REL and LOW BAT separated by tabs,
    /// line two the mode and range, line three the value. With
    /// `show_normalized` a fourth line gives the value in base units.
    pub fn to_readable(&self, show_normalized: bool) -> String {
        let ac_dc = if self.flags.dc {
            "DC"
        } else if self.flags.ac {
            "AC"
        } else {
            ""
        };
        let peak = if self.flags.min {
            "MIN"
        } else if self.flags.max {
            "MAX"
        } else {
            ""
        };
        let hold = if self.flags.hold { "HOLD" } else { "" };
        let rel = if self.flags.relative { "REL" } else { "" };
        let low_bat = if self.flags.low_battery { "LOW BAT" } else { "" };

        let mut out = format!("{}\t{}\t{}\t{}\t{}\n", ac_dc, peak, hold, rel, low_bat);

        if self.flags.auto {
            out.push_str(&format!("MODE: {}\tAUTO\n", self.mode));
        } else {
            out.push_str(&format!("MODE: {}\t{} {}\n", self.mode, self.range_label(), self.units()));
        }

        match self.reading {
            Reading::Overload => out.push_str("OL\n"),
            Reading::Underload => out.push_str("UL\n"),
            Reading::Value(value) => out.push_str(&format!("{} {}\n", value, self.units())),
        }

        if show_normalized {
            match (self.reading, self.normalized()) {
                (Reading::Overload, _) => out.push_str("OL"),
                (Reading::Underload, _) => out.push_str("UL"),
                (_, Some(norm)) => out.push_str(&format!("= {} {}", norm.value, norm.unit)),
                (_, None) => {}
            }
        }

        out
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_readable(false).trim_end())
    }
}
