//! Small helpers shared by the check operations and the binaries

pub mod error_logging;

/// Format a duration in a human-readable way
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let millis = duration.subsec_millis();

    let mut parts = Vec::new();

    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 || (parts.is_empty() && millis == 0) {
        parts.push(format!("{}s", seconds));
    }
    if millis > 0 && parts.is_empty() {
        parts.push(format!("{}ms", millis));
    }

    parts.join(" ")
}

/// Round to two decimal places, the precision every ratio is shown and compared at
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / max(1, denominator)`, rounded to two places
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    round2(numerator as f64 / denominator.max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "60m");
    }

    #[test]
    fn test_ratio_floors_denominator() {
        assert_eq!(ratio(10, 0), ratio(10, 1));
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(7500, 3000), 2.5);
        assert_eq!(ratio(7500, 3001), 2.5);
        assert_eq!(ratio(1, 3), 0.33);
    }
}
