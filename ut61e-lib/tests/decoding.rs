//! Tests for field decoding

mod common;

use common::*;
use ut61e_lib::measurement::{UnitAnnunciator, UnitPrefix};
use ut61e_lib::StatusFlags;
use ut61e_lib::mode::RANGE_VOLTAGE;

#[test]
fn test_end_to_end_voltage_dc_auto() {
    let m = decode(&hex_to_bytes(VOLTAGE_DC_AUTO));

    assert_eq!(m.mode.to_string(), "Voltage");
    assert_eq!(m.range, Some(RANGE_VOLTAGE[0]));
    assert_eq!(m.units(), "V");
    assert_close(m.value().expect("expected a value"), 1.234);
    assert!(m.flags.dc);
    assert!(!m.flags.ac);
    assert!(m.flags.auto);
    assert!(!m.flags.overload);
    assert!(!m.minus);
}

#[test]
fn test_end_to_end_overflow_sentinel() {
    let m = decode(&hex_to_bytes(VOLTAGE_OVERFLOW));
    assert!(m.flags.overload);
    assert!(m.is_overload());
    assert_eq!(m.value(), None);
}

#[test]
fn test_overflow_ignores_other_digit_bytes() {
    for filler in [0x00u8, b'0', b'9', 0x3F, 0xFF] {
        let bytes = FrameBuilder::new()
            .mode(0xB)
            .raw_digit_byte(0, OVERFLOW_SENTINEL)
            .raw_digit_byte(1, filler)
            .raw_digit_byte(2, filler)
            .raw_digit_byte(3, filler)
            .build();
        let m = decode(&bytes);
        assert_eq!(m.reading, Reading::Overload, "filler {:#04x}", filler);
    }
}

#[test]
fn test_digits_without_decimal_point() {
    for digits in [[0, 0, 0, 0], [1, 2, 3, 4], [9, 9, 9, 9], [0, 0, 0, 7], [4, 0, 0, 0]] {
        let bytes = FrameBuilder::new().mode(0xB).digits(digits).build();
        let m = decode(&bytes);
        let expected =
            digits[0] as f64 * 1000.0 + digits[1] as f64 * 100.0 + digits[2] as f64 * 10.0 + digits[3] as f64;
        assert_eq!(m.decimal_point, DecimalPoint::None);
        assert_eq!(m.value(), Some(expected), "digits {:?}", digits);
    }
}

#[test]
fn test_decimal_point_positions() {
    let cases = [
        (1, DecimalPoint::Pos1, 0.1234),
        (2, DecimalPoint::Pos2, 1.234),
        (3, DecimalPoint::Pos3, 12.34),
        (4, DecimalPoint::Pos4, 123.4),
    ];
    for (position, expected_point, expected_value) in cases {
        let bytes = FrameBuilder::new().mode(0xB).digits([1, 2, 3, 4]).point(position).build();
        let m = decode(&bytes);
        assert_eq!(m.decimal_point, expected_point);
        assert_close(m.value().expect("expected a value"), expected_value);
        assert_close(m.value().unwrap(), 1234.0 / 10f64.powi(5 - position as i32));
    }
}

#[test]
fn test_unrecognized_point_pattern_means_no_point() {
    for nibble in [0x0, 0x3, 0x5, 0xF] {
        let bytes = FrameBuilder::new().mode(0xB).digits([1, 2, 3, 4]).point_nibble(nibble).build();
        let m = decode(&bytes);
        assert_eq!(m.decimal_point, DecimalPoint::None, "nibble {:#x}", nibble);
        assert_eq!(m.value(), Some(1234.0));
    }
}

#[test]
fn test_sign_bit() {
    let base = FrameBuilder::new().mode(0xB).digits([1, 2, 3, 4]).point(2);

    let positive = decode(&base.clone().negative(false).build());
    assert!(!positive.minus);
    assert!(positive.value().unwrap() >= 0.0);

    let negative = decode(&base.clone().negative(true).build());
    assert!(negative.minus);
    assert_close(negative.value().unwrap(), -1.234);

    // The sign does not touch the range selector
    assert_eq!(positive.range_index, negative.range_index);
}

#[test]
fn test_underload_flag() {
    let bytes = FrameBuilder::new().mode(0x3).digits([1, 2, 3, 4]).prefix(0x01).build();
    let m = decode(&bytes);
    assert!(m.flags.underload);
    assert!(m.is_underload());
    assert_eq!(m.value(), None);
}

#[test]
fn test_overload_bit_wins_over_underload() {
    let bytes = FrameBuilder::new().mode(0x3).status(0x40).prefix(0x01).build();
    let m = decode(&bytes);
    assert!(m.flags.overload);
    assert!(m.flags.underload);
    assert_eq!(m.reading, Reading::Overload);
}

#[test]
fn test_status_flags_are_independent() {
    let bytes = FrameBuilder::new()
        .mode(0xB)
        .status(0x01 | 0x02 | 0x04 | 0x08 | 0x10 | 0x20)
        .options(0x04 | 0x08 | 0x10 | 0x20)
        .prefix(0x04 | 0x08)
        .bargraph(0x12)
        .build();
    let m = decode(&bytes);

    assert!(m.flags.bargraph);
    assert!(m.flags.hold);
    assert!(m.flags.relative);
    assert!(m.flags.ac);
    assert!(m.flags.dc);
    assert!(m.flags.auto);
    assert!(m.flags.low_battery);
    assert!(m.flags.auto_power_off);
    // Min and max together are reported as-is
    assert!(m.flags.min);
    assert!(m.flags.max);
    assert!(m.flags.diode);
    assert!(m.flags.beep);
    assert!(!m.flags.percent);
    assert!(!m.flags.overload);
    assert_eq!(m.bargraph, Some(0x12));
}

#[test]
fn test_each_flag_alone() {
    let empty = decode(&FrameBuilder::new().mode(0xB).build()).flags;
    assert_eq!(empty, StatusFlags::default());

    let hold = decode(&FrameBuilder::new().mode(0xB).status(0x02).build()).flags;
    assert!(hold.hold && !hold.relative && !hold.ac && !hold.dc);

    let low_bat = decode(&FrameBuilder::new().mode(0xB).options(0x04).build()).flags;
    assert!(low_bat.low_battery && !low_bat.percent);

    let percent = decode(&FrameBuilder::new().mode(0xB).prefix(0x02).build()).flags;
    assert!(percent.percent && !percent.low_battery);
}

#[test]
fn test_bargraph_needs_present_flag() {
    let hidden = decode(&FrameBuilder::new().mode(0xB).bargraph(0x85).build());
    assert_eq!(hidden.bargraph, None);

    let shown = decode(&FrameBuilder::new().mode(0xB).status(0x01).bargraph(0x85).build());
    assert_eq!(shown.bargraph, Some(-5));
}

#[test]
fn test_annunciators() {
    let m = decode(&FrameBuilder::new().mode(0x6).options(0x02).unit(0x04).build());
    assert_eq!(m.prefix, Some(UnitPrefix::Nano));
    assert_eq!(m.unit_annunciator, Some(UnitAnnunciator::Farad));

    let m = decode(&FrameBuilder::new().mode(0x3).prefix(0x10).unit(0x20).build());
    assert_eq!(m.prefix, Some(UnitPrefix::Mega));
    assert_eq!(m.unit_annunciator, Some(UnitAnnunciator::Ohm));

    let m = decode(&FrameBuilder::new().mode(0x4).unit(0x02).build());
    assert_eq!(m.prefix, None);
    assert_eq!(m.unit_annunciator, Some(UnitAnnunciator::Celsius));
}
