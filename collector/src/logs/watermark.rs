/// Timestamp of the newest log record already counted.
///
/// Timestamps are compared as text, which orders ISO-8601 values correctly as long as the server
/// keeps one offset format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watermark {
    last: Option<String>,
}

impl Watermark {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Whether a record with this timestamp was already counted.
    pub fn covers(&self, timestamp: &str) -> bool {
        self.last.as_deref().is_some_and(|last| timestamp <= last)
    }

    /// Moves forward to `timestamp`. Never moves backwards.
    pub fn advance(&mut self, timestamp: &str) {
        if !self.covers(timestamp) {
            self.last = Some(timestamp.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_watermark_covers_nothing() {
        let watermark = Watermark::new();
        assert!(!watermark.covers("1970-01-01T00:00:00.000+00:00"));
        assert_eq!(watermark.get(), None);
    }

    #[test]
    fn covers_equal_and_older_timestamps() {
        let mut watermark = Watermark::new();
        watermark.advance("2024-03-01T10:00:05.000+00:00");
        assert!(watermark.covers("2024-03-01T10:00:05.000+00:00"));
        assert!(watermark.covers("2024-03-01T10:00:04.999+00:00"));
        assert!(!watermark.covers("2024-03-01T10:00:05.001+00:00"));
    }

    #[test]
    fn never_moves_backwards() {
        let mut watermark = Watermark::new();
        watermark.advance("2024-03-01T10:00:05.000+00:00");
        watermark.advance("2024-03-01T09:00:00.000+00:00");
        assert_eq!(watermark.get(), Some("2024-03-01T10:00:05.000+00:00"));
        watermark.advance("2024-03-01T10:00:06.000+00:00");
        assert_eq!(watermark.get(), Some("2024-03-01T10:00:06.000+00:00"));
    }
}
