// Free-text distance/duration extraction
//
// The upstream API reports human-readable strings like "18.5 km" and
// "1 hour 12 mins". Structured numeric fields are preferred when present;
// these parsers are the fallback: leading numeric token for distance,
// optional hour and minute components (missing -> 0) summed to total
// minutes.

use regex::Regex;
use std::sync::OnceLock;

fn distance_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\d.]+").expect("distance regex"))
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:(\d+)\s*hours?)?\s*(?:(\d+)\s*mins?)?").expect("duration regex")
    })
}

/// Leading numeric token of a distance string ("18.5 km" -> 18.5)
pub fn parse_distance_text(text: &str) -> Option<f64> {
    distance_re()
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Total minutes from a duration string ("1 hour 12 mins" -> 72).
/// None when the string carries no digits at all.
pub fn parse_duration_text(text: &str) -> Option<i64> {
    if !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let caps = duration_re().captures(text)?;
    let hours: i64 = caps
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    let minutes: i64 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);

    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_leading_token() {
        assert_eq!(parse_distance_text("18.5 km"), Some(18.5));
        assert_eq!(parse_distance_text("3 mi"), Some(3.0));
        assert_eq!(parse_distance_text("0.4 km"), Some(0.4));
        assert_eq!(parse_distance_text("no digits"), None);
    }

    #[test]
    fn test_duration_components() {
        assert_eq!(parse_duration_text("12 mins"), Some(12));
        assert_eq!(parse_duration_text("1 min"), Some(1));
        assert_eq!(parse_duration_text("1 hour 12 mins"), Some(72));
        assert_eq!(parse_duration_text("2 hours"), Some(120));
    }

    #[test]
    fn test_duration_without_digits_is_none() {
        assert_eq!(parse_duration_text("soon"), None);
        assert_eq!(parse_duration_text(""), None);
    }
}
