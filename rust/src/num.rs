use std::hash::{Hash, Hasher};

// Wraps f64 so nodes can derive Eq.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(test, derive(serde::Serialize))]
pub struct JsNumber(pub f64);

impl PartialEq for JsNumber {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() {
            return other.0.is_nan();
        };
        // Distinguish 0 and -0.
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for JsNumber {}

impl Hash for JsNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if !self.0.is_nan() {
            self.0.to_bits().hash(state);
        };
    }
}

fn decimal_form(value: f64) -> String {
    let mut out = format!("{}", value);
    if out.starts_with("0.") {
        out.remove(0);
    };
    out
}

fn exponent_form(value: f64) -> String {
    // `{:e}` yields the shortest round-trip mantissa, e.g. `1.5e-7`, `1e21`, `1.25e0`.
    let raw = format!("{:e}", value);
    match raw.split_once('e') {
        Some((mantissa, "0")) => mantissa.to_string(),
        Some((mantissa, exp)) => {
            // Move the fraction digits into the exponent, which is never longer: `1.5e-7` is `15e-8`.
            let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
            let exp: i64 = exp.parse().unwrap_or(0) - frac.len() as i64;
            let digits = format!("{}{}", int, frac);
            format!("{}e{}", digits, exp)
        }
        None => raw,
    }
}

fn hex_form(value: f64) -> Option<String> {
    if value.fract() == 0.0 && value < 9007199254740992.0 {
        Some(format!("0x{:x}", value as u64))
    } else {
        None
    }
}

/// Shortest JavaScript numeral that reads back as `value`. `value` must be finite and not negative;
/// callers print the sign as a unary operator.
pub fn format_number(value: f64) -> String {
    debug_assert!(value.is_finite() && value.is_sign_positive());
    let mut best = decimal_form(value);
    let exp = exponent_form(value);
    if exp.len() < best.len() {
        best = exp;
    };
    if let Some(hex) = hex_form(value) {
        if hex.len() < best.len() {
            best = hex;
        };
    };
    best
}

/// Whether a numeral needs a second `.` (or a space) before a member access, i.e. it has no
/// fraction, exponent or radix prefix of its own.
pub fn numeral_is_plain_integer(numeral: &str) -> bool {
    numeral.bytes().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::format_number;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), ".5");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(1000.0), "1e3");
        assert_eq!(format_number(1234000.0), "1234e3");
        assert_eq!(format_number(0.000001), "1e-6");
        assert_eq!(format_number(0.0000015), "15e-7");
        assert_eq!(format_number(1e21), "1e21");
        assert_eq!(format_number(0.1 + 0.2), ".30000000000000004");
        assert_eq!(format_number(4294967295.0), "4294967295");
    }
}
