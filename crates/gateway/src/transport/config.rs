//! Subject naming

/// Logical subjects alerts are published on
pub struct Subjects;

impl Subjects {
    /// Alerts for a specific instrument: `alerts.BTCUSDT`
    pub fn alerts(instrument: &str) -> String {
        format!("alerts.{}", instrument)
    }

    /// Every alert: `alerts.*`
    pub fn alerts_all() -> &'static str {
        "alerts.*"
    }

    /// Whether `subject` matches `pattern`. A trailing `*` matches any
    /// remainder, otherwise the match is exact.
    pub fn matches(pattern: &str, subject: &str) -> bool {
        match pattern.strip_suffix('*') {
            Some(prefix) => subject.starts_with(prefix),
            None => pattern == subject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subjects() {
        assert_eq!(Subjects::alerts("BTCUSDT"), "alerts.BTCUSDT");
        assert_eq!(Subjects::alerts_all(), "alerts.*");
    }

    #[test]
    fn test_matching() {
        assert!(Subjects::matches("alerts.*", "alerts.BTCUSDT"));
        assert!(Subjects::matches("alerts.BTCUSDT", "alerts.BTCUSDT"));
        assert!(Subjects::matches("*", "anything"));
        assert!(!Subjects::matches("alerts.BTCUSDT", "alerts.ETHUSDT"));
        assert!(!Subjects::matches("alerts.BTCUSDT", "alerts.BTCUSDTX"));
        assert!(!Subjects::matches("alerts.*", "control.summary"));
    }
}
