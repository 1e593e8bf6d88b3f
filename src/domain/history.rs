//! Scan history records and the dashboard aggregation over them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scan::{Modality, ScanResult, Verdict};

/// One entry of the user's scan history, as returned by the backend.
///
/// The result fields always exist; the metadata fields tolerate absence so
/// the client keeps working against older backend revisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub modality: Option<Modality>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub result: ScanResult,
}

impl ScanRecord {
    /// Timestamp formatted for list display, or a dash when absent.
    #[must_use]
    pub fn created_label(&self) -> String {
        self.created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Aggregate statistics over the fetched history, rendered on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistorySummary {
    pub total: usize,
    pub malignant: usize,
    pub benign: usize,
    pub other: usize,
    pub masks: usize,
    pub mammograms: usize,
    pub ultrasounds: usize,
    /// Mean confidence across all records, `None` when history is empty.
    pub mean_confidence: Option<f64>,
}

impl HistorySummary {
    /// Fold the history sequence into display counts.
    #[must_use]
    pub fn from_records(records: &[ScanRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        let mut confidence_sum = 0.0;
        for record in records {
            match record.result.verdict() {
                Verdict::Malignant => summary.malignant += 1,
                Verdict::Benign => summary.benign += 1,
                Verdict::Other => summary.other += 1,
            }
            if record.result.has_mask() {
                summary.masks += 1;
            }
            match record.modality {
                Some(Modality::Mammogram) => summary.mammograms += 1,
                Some(Modality::Ultrasound) => summary.ultrasounds += 1,
                None => {}
            }
            confidence_sum += record.result.confidence;
        }

        if summary.total > 0 {
            summary.mean_confidence = Some(confidence_sum / summary.total as f64);
        }
        summary
    }
}
