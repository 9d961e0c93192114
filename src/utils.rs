use byte_unit::{Byte, UnitType};

/// Reads a free-text size such as `"156 MB"` the way the dashboard did:
/// the leading run of digits after optional whitespace, as a whole number.
pub fn parse_leading_int(text: &str) -> Option<u64> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Renders a whole-megabyte size in the largest decimal unit that fits.
pub fn format_mb(mb: u64) -> String {
    if mb == 0 {
        return "0 MB".to_string();
    }
    let adjusted =
        Byte::from_u64(mb.saturating_mul(1_000_000)).get_appropriate_unit(UnitType::Decimal);
    let value = adjusted.get_value();
    if value.fract() == 0.0 {
        format!("{:.0} {}", value, adjusted.get_unit())
    } else {
        format!("{:.1} {}", value, adjusted.get_unit())
    }
}

pub fn format_millis(ms: u128) -> String {
    if ms >= 1000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        format!("{}ms", ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("156 MB"), Some(156));
        assert_eq!(parse_leading_int("  45MB"), Some(45));
        assert_eq!(parse_leading_int("12.5 MB"), Some(12));
    }

    #[test]
    fn test_parse_leading_int_without_digits() {
        assert_eq!(parse_leading_int("MB"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_format_mb() {
        assert_eq!(format_mb(0), "0 MB");
        assert_eq!(format_mb(234), "234 MB");
        assert_eq!(format_mb(1000), "1 GB");
        assert_eq!(format_mb(1500), "1.5 GB");
    }
}
