//! Permissive field readers for device packets
//!
//! The device is trusted: a numeric field that does not parse yields `None`
//! (for indices and counts) or `NaN` (for levels) instead of an error. Like
//! the device's own tooling, a numeric prefix is accepted ("12abc" reads 12).

/// Positional fields of one packet, after the type tag
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    parts: &'a [&'a str],
}

impl<'a> Fields<'a> {
    pub fn new(parts: &'a [&'a str]) -> Self {
        Self { parts }
    }

    /// Raw text of field `n` (1-based, matching the packet catalog)
    pub fn text(&self, n: usize) -> Option<&'a str> {
        n.checked_sub(1).and_then(|i| self.parts.get(i)).copied()
    }

    /// Integer field
    pub fn int(&self, n: usize) -> Option<i64> {
        self.text(n).and_then(leading_int)
    }

    /// Non-negative integer field, used for device indices and counts
    pub fn index(&self, n: usize) -> Option<u32> {
        self.int(n).and_then(|v| u32::try_from(v).ok())
    }

    /// `"1"` means true, anything else (including a missing field) false
    pub fn flag(&self, n: usize) -> bool {
        self.text(n) == Some("1")
    }

    /// Integer thousandths scaled to device units, `NaN` when malformed
    pub fn thousandths(&self, n: usize) -> f64 {
        self.int(n).map(|v| v as f64 / 1000.0).unwrap_or(f64::NAN)
    }

    /// Decimal thousandths scaled to device units, `NaN` when malformed
    pub fn float_thousandths(&self, n: usize) -> f64 {
        self.text(n).map(leading_float).unwrap_or(f64::NAN) / 1000.0
    }
}

/// Parse the leading integer of a field: optional sign, then digits.
pub fn leading_int(field: &str) -> Option<i64> {
    let s = field.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let value: i64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Parse the longest leading decimal number of a field, `NaN` if there is none.
pub fn leading_float(field: &str) -> f64 {
    let s = field.trim_start();
    let candidate_len = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(s.len());
    let candidate = &s[..candidate_len];
    (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("42"), Some(42));
        assert_eq!(leading_int("-6000"), Some(-6000));
        assert_eq!(leading_int("12abc"), Some(12));
        assert_eq!(leading_int(" 7"), Some(7));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-"), None);
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("-6000"), -6000.0);
        assert_eq!(leading_float("1234.5xyz"), 1234.5);
        assert_eq!(leading_float("5e"), 5.0);
        assert!(leading_float("level").is_nan());
    }

    #[test]
    fn test_fields_are_one_based() {
        let parts = ["3", "Camera", "-6000", "x"];
        let fields = Fields::new(&parts);
        assert_eq!(fields.index(1), Some(3));
        assert_eq!(fields.text(2), Some("Camera"));
        assert_eq!(fields.thousandths(3), -6.0);
        assert!(fields.thousandths(4).is_nan());
        assert!(fields.thousandths(9).is_nan());
        assert_eq!(fields.text(0), None);
    }

    #[test]
    fn test_negative_index_is_unset() {
        let parts = ["-1"];
        assert_eq!(Fields::new(&parts).index(1), None);
    }

    #[test]
    fn test_flag() {
        let parts = ["1", "0", "2"];
        let fields = Fields::new(&parts);
        assert!(fields.flag(1));
        assert!(!fields.flag(2));
        assert!(!fields.flag(3));
        assert!(!fields.flag(4));
    }
}
