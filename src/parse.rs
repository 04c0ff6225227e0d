//! Parsers for human-readable env values

use std::time::Duration;

/// Parse a size string like "1MB", "512KB", "2048" into bytes.
///
/// Bare numbers are bytes. Falls back to 1MB on unparseable input.
pub fn parse_size(s: &str) -> usize {
    let s = s.trim().to_uppercase();
    let (digits, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => s.split_at(idx),
        None => (s.as_str(), ""),
    };

    let multiplier: usize = match unit.trim() {
        "" | "B" => 1,
        "KB" => 1024,
        "MB" => 1024 * 1024,
        "GB" => 1024 * 1024 * 1024,
        _ => return 1024 * 1024,
    };

    digits
        .parse::<usize>()
        .map(|n| n * multiplier)
        .unwrap_or(1024 * 1024)
}

/// Parse a duration string like "30s", "5m", "1h", "250ms".
///
/// Bare numbers are seconds. Falls back to 30s on unparseable input.
pub fn parse_duration(s: &str) -> Duration {
    let s = s.trim().to_lowercase();
    let (digits, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => s.split_at(idx),
        None => (s.as_str(), ""),
    };

    let millis: u64 = match unit.trim() {
        "ms" => 1,
        "" | "s" => 1000,
        "m" => 60 * 1000,
        "h" => 60 * 60 * 1000,
        _ => return Duration::from_secs(30),
    };

    digits
        .parse::<u64>()
        .map(|n| Duration::from_millis(n * millis))
        .unwrap_or(Duration::from_secs(30))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(parse_size("512B"), 512);
        assert_eq!(parse_size("1KB"), 1024);
        assert_eq!(parse_size("10MB"), 10 * 1024 * 1024);
        assert_eq!(parse_size("1GB"), 1024 * 1024 * 1024);
        assert_eq!(parse_size("2048"), 2048);
        assert_eq!(parse_size(" 5mb "), 5 * 1024 * 1024);
        // Unparseable input falls back to 1MB
        assert_eq!(parse_size("lots"), 1024 * 1024);
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("250ms"), Duration::from_millis(250));
        assert_eq!(parse_duration("30s"), Duration::from_secs(30));
        assert_eq!(parse_duration("5m"), Duration::from_secs(300));
        assert_eq!(parse_duration("1h"), Duration::from_secs(3600));
        assert_eq!(parse_duration("45"), Duration::from_secs(45));
        assert_eq!(parse_duration("soon"), Duration::from_secs(30));
    }
}
