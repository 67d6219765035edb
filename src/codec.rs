//! Numeric codec for level-bearing commands
//!
//! The switcher expects audio values as integer thousandths rendered in a
//! fixed-width text field: four characters for non-negative values, five for
//! negative ones (sign included). Longer renderings are cut, never rounded.

use crate::error::{Result, StudioError};

/// Audio level domain (dB-like device units)
pub const LEVEL_RANGE: (f64, f64) = (-60.0, 10.0);

/// Input gain domain
pub const GAIN_RANGE: (f64, f64) = (0.0, 10.0);

/// Level increment domain
pub const INCREMENT_RANGE: (f64, f64) = (-60.0, 60.0);

/// Encode an absolute audio level (-60.0..=10.0)
pub fn to_level_code(value: f64) -> Result<String> {
    encode("audio level", value, LEVEL_RANGE)
}

/// Encode an input gain (0.0..=10.0)
pub fn to_gain_code(value: f64) -> Result<String> {
    encode("gain", value, GAIN_RANGE)
}

/// Encode a relative level change (-60.0..=60.0)
pub fn to_increment_code(value: f64) -> Result<String> {
    encode("increment", value, INCREMENT_RANGE)
}

fn encode(what: &'static str, value: f64, (min, max): (f64, f64)) -> Result<String> {
    if !value.is_finite() {
        return Err(StudioError::invalid(format!("{} must be a finite number", what)));
    }
    if value < min || value > max {
        return Err(StudioError::OutOfRange {
            what,
            min,
            max,
            value,
        });
    }
    Ok(fixed_width_thousandths(value))
}

/// Scale by 1000 and keep the leading 4 (or 5 when negative) characters.
///
/// Values with a fractional thousandths part keep their decimal point when it
/// falls inside the field ("123." for 0.12345).
fn fixed_width_thousandths(value: f64) -> String {
    // adding 0.0 folds -0.0 into 0.0 so it never renders a sign
    let scaled = value * 1000.0 + 0.0;
    let width = if value < 0.0 { 5 } else { 4 };
    scaled.to_string().chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_negative_level_is_five_chars() {
        let code = to_level_code(-6.0).unwrap();
        assert_eq!(code, "-6000");
        assert_eq!(code.len(), 5);
    }

    #[test]
    fn test_max_level_is_truncated_to_four_chars() {
        // 10000 does not fit the field; the device convention cuts it
        assert_eq!(to_level_code(10.0).unwrap(), "1000");
        assert_eq!(to_level_code(-60.0).unwrap(), "-6000");
    }

    #[test]
    fn test_fraction_is_truncated_not_rounded() {
        assert_eq!(to_level_code(1.2345).unwrap(), "1234");
        assert_eq!(to_level_code(-1.23456).unwrap(), "-1234");
        assert_eq!(to_gain_code(0.5).unwrap(), "500");
    }

    #[test]
    fn test_sub_thousandth_values_keep_decimal_point() {
        assert_eq!(to_level_code(0.12345).unwrap(), "123.");
        assert_eq!(to_gain_code(0.0005).unwrap(), "0.5");
    }

    #[test]
    fn test_zero_has_no_sign() {
        assert_eq!(to_level_code(0.0).unwrap(), "0");
        assert_eq!(to_level_code(-0.0).unwrap(), "0");
    }

    #[test]
    fn test_level_out_of_range() {
        assert!(matches!(
            to_level_code(10.1),
            Err(StudioError::OutOfRange { what: "audio level", .. })
        ));
        assert!(matches!(
            to_level_code(-60.1),
            Err(StudioError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_gain_rejects_negative() {
        assert!(matches!(
            to_gain_code(-0.5),
            Err(StudioError::OutOfRange { what: "gain", .. })
        ));
        assert!(to_gain_code(10.0).is_ok());
    }

    #[test]
    fn test_increment_range() {
        assert_eq!(to_increment_code(60.0).unwrap(), "6000");
        assert_eq!(to_increment_code(-2.5).unwrap(), "-2500");
        assert!(to_increment_code(60.5).is_err());
    }

    #[test]
    fn test_non_finite_is_invalid_argument() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                to_level_code(value),
                Err(StudioError::InvalidArgument(_))
            ));
            assert!(matches!(
                to_increment_code(value),
                Err(StudioError::InvalidArgument(_))
            ));
        }
    }

    proptest! {
        #[test]
        fn prop_level_code_width(value in -60.0f64..=10.0) {
            let code = to_level_code(value).unwrap();
            if value < 0.0 {
                prop_assert!(code.starts_with('-'));
                prop_assert!(code.len() <= 5);
            } else {
                prop_assert!(!code.starts_with('-'));
                prop_assert!(code.len() <= 4);
            }
        }

        #[test]
        fn prop_increment_code_width(value in -60.0f64..=60.0) {
            let code = to_increment_code(value).unwrap();
            let width = if value < 0.0 { 5 } else { 4 };
            prop_assert!(code.len() <= width);
            prop_assert_eq!(code.starts_with('-'), value < 0.0);
        }
    }
}
