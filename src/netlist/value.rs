//! Numeric values with SI prefixes and optional unit names.
//!
//! ```text
//! value  = number [prefix] [unit]
//! number = ['-' | '+'] digit+ ['.' digit*] [('e'|'E') ['-'|'+'] digit+]
//! prefix = 'f' | 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | 'K' | 'M' | 'G' | 'T'
//! unit   = "ohm" | "ohms" | "v" | "a" | "f" | "h" | "s" | "hz"   (any case)
//! ```
//!
//! Prefixes are case-sensitive (`m` is milli, `M` is mega).

/// Unit names accepted after a number. They carry no scaling.
const UNITS: &[&str] = &["ohm", "ohms", "v", "a", "f", "h", "s", "hz"];

fn prefix_scale(prefix: char) -> Option<f64> {
    let scale = match prefix {
        'f' => 1e-15,
        'p' => 1e-12,
        'n' => 1e-9,
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        'T' => 1e12,
        _ => return None,
    };
    Some(scale)
}

fn is_unit(text: &str) -> bool {
    UNITS.iter().any(|unit| unit.eq_ignore_ascii_case(text))
}

/// Length in bytes of the leading numeric literal of `text`.
fn numeric_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return 0;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    // Only take the exponent if digits follow, so "1e" stays invalid
    // and "5f" is not mistaken for an exponent.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'-' || bytes[j] == b'+') {
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
    i
}

/// Parse a number string with optional SI prefix and unit.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let len = numeric_len(text);
    if len == 0 {
        return None;
    }

    let value: f64 = text[..len].parse().ok()?;
    let rest = &text[len..];
    if rest.is_empty() {
        return Some(value);
    }

    let mut chars = rest.chars();
    if let Some(scale) = chars.next().and_then(prefix_scale) {
        let unit = chars.as_str();
        if unit.is_empty() || is_unit(unit) {
            return Some(value * scale);
        }
    }

    if is_unit(rest) {
        return Some(value);
    }

    None
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(parse_value("10k").unwrap(), 10_000.0);
        assert_relative_eq!(parse_value("100n").unwrap(), 100e-9);
        assert_relative_eq!(parse_value("4.7u").unwrap(), 4.7e-6);
        assert_relative_eq!(parse_value("1M").unwrap(), 1_000_000.0);
        assert_relative_eq!(parse_value("1m").unwrap(), 1e-3);
        assert_relative_eq!(parse_value("2.2").unwrap(), 2.2);
        assert_relative_eq!(parse_value("1e-9").unwrap(), 1e-9);
        assert_relative_eq!(parse_value("-5").unwrap(), -5.0);
    }

    #[test]
    fn test_parse_value_with_units() {
        assert_relative_eq!(parse_value("5V").unwrap(), 5.0);
        assert_relative_eq!(parse_value("10kOhm").unwrap(), 10_000.0);
        assert_relative_eq!(parse_value("1uF").unwrap(), 1e-6);
        assert_relative_eq!(parse_value("2s").unwrap(), 2.0);
        assert_relative_eq!(parse_value("50Hz").unwrap(), 50.0);
        // A lone 'f' is femto, not farad
        assert_relative_eq!(parse_value("3f").unwrap(), 3e-15);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("1x"), None);
        assert_eq!(parse_value("1e"), None);
        assert_eq!(parse_value("1kq"), None);
    }
}
