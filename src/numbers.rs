//! Number parsing and formatting with the page's browser semantics.

use super::*;

/// Parses the longest leading decimal literal, like `parseFloat`.
///
/// Leading whitespace is skipped; input without a numeric prefix yields NaN.
pub fn parse_float(src: &str) -> f64 {
    let s = src.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0usize;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    let literal = s[..i].trim_end_matches('.');
    literal.parse::<f64>().unwrap_or(f64::NAN)
}

/// Formats a number the way a template literal would print it.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    if value == 0.0 {
        return "0".into();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        // `{:e}` prints the shortest digits; only the exponent sign differs.
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    format!("{value}")
}

/// Formats a CSS length or percentage, e.g. `px(12.5) == "12.5px"`.
pub(crate) fn with_unit(value: f64, unit: &str) -> String {
    format!("{}{unit}", format_number(value))
}

/// Removes every character that is not an ASCII digit or a dot.
pub(crate) struct NumericStripper {
    pattern: fancy_regex::Regex,
}

impl NumericStripper {
    pub(crate) fn new() -> Result<Self> {
        let pattern = fancy_regex::Regex::new(r"[^0-9.]")?;
        Ok(Self { pattern })
    }

    pub(crate) fn strip<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        self.pattern.replace_all(text, "")
    }

    /// Strips then parses, so `"$589"` becomes 589 and `"N/A"` becomes NaN.
    pub(crate) fn parse(&self, text: &str) -> f64 {
        parse_float(&self.strip(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_float_reads_numeric_prefix() {
        assert_eq!(parse_float("42"), 42.0);
        assert_eq!(parse_float("  3.5GHz"), 3.5);
        assert_eq!(parse_float("-.5"), -0.5);
        assert_eq!(parse_float("1e3x"), 1000.0);
        assert_eq!(parse_float("7."), 7.0);
        assert_eq!(parse_float("3.5.1"), 3.5);
        assert!(parse_float("").is_nan());
        assert!(parse_float("abc").is_nan());
        assert!(parse_float(".").is_nan());
        assert_eq!(parse_float("Infinity"), f64::INFINITY);
    }

    #[test]
    fn format_number_matches_template_output() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(4.5), "4.5");
        assert_eq!(format_number(100.0 / 3.0), "33.333333333333336");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(with_unit(12.5, "px"), "12.5px");
    }

    #[test]
    fn format_number_switches_to_exponent_form_at_the_extremes() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn stripper_keeps_digits_and_dots() -> Result<()> {
        let stripper = NumericStripper::new()?;
        assert_eq!(stripper.strip("$1,299.99 USD"), "1299.99");
        assert_eq!(stripper.parse("125W"), 125.0);
        assert!(stripper.parse("N/A").is_nan());
        Ok(())
    }
}
