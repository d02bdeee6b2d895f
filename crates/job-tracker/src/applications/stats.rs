use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{ApplicationRecord, ApplicationStatus};

/// Headline numbers shown above the list. Recomputed on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DerivedStats {
    pub total: usize,
    pub interviews: usize,
    /// Percentage of applications that moved past `Applied`.
    pub response_rate: u32,
    pub avg_match: u32,
}

impl DerivedStats {
    pub fn from_records(records: &[ApplicationRecord]) -> Self {
        let total = records.len();
        if total == 0 {
            return Self::default();
        }

        let interviews = records
            .iter()
            .filter(|record| record.status.reached_interview())
            .count();
        let responded = records
            .iter()
            .filter(|record| record.status.has_response())
            .count();
        let match_sum: u64 = records
            .iter()
            .map(|record| u64::from(record.match_score))
            .sum();

        Self {
            total,
            interviews,
            response_rate: rounded_ratio(100.0 * responded as f64, total),
            avg_match: rounded_ratio(match_sum as f64, total),
        }
    }
}

// f64::round rounds half away from zero.
fn rounded_ratio(numerator: f64, denominator: usize) -> u32 {
    (numerator / denominator as f64).round() as u32
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub status_label: &'static str,
    pub count: usize,
}

/// Count per status in pipeline order, zero counts included.
pub fn status_breakdown(records: &[ApplicationRecord]) -> Vec<StatusCount> {
    ApplicationStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            status_label: status.label(),
            count: records
                .iter()
                .filter(|record| record.status == status)
                .count(),
        })
        .collect()
}

/// Records with a follow-up date on or before `day`, in list order.
pub fn followups_due(records: &[ApplicationRecord], day: NaiveDate) -> Vec<&ApplicationRecord> {
    records
        .iter()
        .filter(|record| record.followup.is_some_and(|followup| followup <= day))
        .collect()
}
