//! Per-batch accounting of processed and skipped feed items.

use std::fmt;

use crate::models::DisruptionError;

/// Why one feed item was dropped
#[derive(Debug)]
pub struct SkippedItem {
    pub index: usize,
    pub label: String,
    pub error: DisruptionError,
}

/// Outcome of processing one feed payload
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Items that produced at least one disruption
    pub processed: usize,
    pub skipped: Vec<SkippedItem>,
}

impl BatchReport {
    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub fn record_skipped(
        &mut self,
        index: usize,
        label: impl Into<String>,
        error: DisruptionError,
    ) {
        let label = label.into();
        tracing::warn!(index, label = %label, error = %error, "Skipped feed item");
        self.skipped.push(SkippedItem { index, label, error });
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn total(&self) -> usize {
        self.processed + self.skipped.len()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} processed, {} skipped", self.processed, self.skipped.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeometryError;

    #[test]
    fn test_counts() {
        let mut report = BatchReport::default();
        report.record_processed();
        report.record_processed();
        report.record_skipped(2, "Bad feature", GeometryError::MissingLocation.into());

        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.total(), 3);
        assert_eq!(report.skipped[0].index, 2);
        assert_eq!(report.to_string(), "2 processed, 1 skipped");
    }
}
