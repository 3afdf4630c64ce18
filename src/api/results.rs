//! Report records produced by the status engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::classify::{DeadlineStatus, TestingStatus};
pub use crate::core::coverage::Gap;
use crate::core::coverage::round_to;

/// Full status report for one segment.
///
/// Field names and ordering follow the legacy JSON payload consumed
/// downstream. Date fields serialize as ISO `YYYY-MM-DD` strings and are
/// emitted as explicit `null` when absent; consumers validate against the
/// keys being present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    /// Numeric plan ID.
    pub id: i64,
    /// Normalized segment identifier, the join key across the tables.
    pub une_id: String,
    /// Identifier as spelled in the plan row.
    pub une_id_raw: String,
    /// Railway line designation.
    pub bandel: String,
    /// Testing status label.
    pub status: TestingStatus,
    /// Date of the previous completed test.
    pub last_previous_test: Option<NaiveDate>,
    /// Planned test date.
    pub planned_date: Option<NaiveDate>,
    /// Scheduled next test date.
    pub next_test_date: Option<NaiveDate>,
    /// Days until the deadline, passed through from the plan unchanged.
    pub days_until: Option<i64>,
    /// Retest deadline.
    pub deadline: Option<NaiveDate>,
    /// Deadline urgency label.
    pub deadline_status: DeadlineStatus,
    /// Date the segment was tested.
    pub tested_date: Option<NaiveDate>,
    /// Covered share of the total length, in percent.
    pub coverage_pct: f64,
    /// Merged valid tested length in kilometres, rounded to three decimals.
    pub tested_length_km: f64,
    /// Plan total length in kilometres, rounded to three decimals.
    pub total_length_km: Option<f64>,
    /// Lower segment bound in kilometres.
    pub km_from: f64,
    /// Upper segment bound in kilometres.
    pub km_to: f64,
    /// Uncovered stretches within the bounds.
    pub gaps: Vec<Gap>,
}

/// Error record standing in for a report when a segment cannot be built.
///
/// Lookup misses carry whichever key the caller queried by; batch row
/// failures carry what the offending row had. The absent side is omitted
/// from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentErrorRecord {
    /// Numeric plan ID, when the query or row had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Queried or row identifier, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub une_id: Option<String>,
    /// Human-readable description of what went wrong.
    pub error: String,
}

impl SegmentErrorRecord {
    /// Lookup miss for an identifier query.
    pub fn une_id_not_found(une_id: impl Into<String>) -> Self {
        Self {
            id: None,
            une_id: Some(une_id.into()),
            error: "UNE ID not found in testplan".to_string(),
        }
    }

    /// Lookup miss for a numeric ID query.
    pub fn id_not_found(id: i64) -> Self {
        Self {
            id: Some(id),
            une_id: None,
            error: "ID not found in testplan".to_string(),
        }
    }

    /// Failure of a single row during a batch run.
    pub fn row_error(id: Option<i64>, une_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            id,
            une_id,
            error: error.into(),
        }
    }
}

/// One entry of a batch result: a report or the error that replaced it.
///
/// Serializes untagged, so a batch is a flat JSON array of report and error
/// objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SegmentOutcome {
    /// A successfully built report.
    Report(Box<SegmentReport>),
    /// The error record for a segment that produced none.
    Error(SegmentErrorRecord),
}

impl SegmentOutcome {
    /// The report, if this outcome holds one.
    pub fn as_report(&self) -> Option<&SegmentReport> {
        match self {
            SegmentOutcome::Report(report) => Some(report),
            SegmentOutcome::Error(_) => None,
        }
    }

    /// The error record, if this outcome holds one.
    pub fn as_error(&self) -> Option<&SegmentErrorRecord> {
        match self {
            SegmentOutcome::Report(_) => None,
            SegmentOutcome::Error(error) => Some(error),
        }
    }

    /// Whether this outcome is a report.
    pub fn is_report(&self) -> bool {
        matches!(self, SegmentOutcome::Report(_))
    }
}

/// Counts of segments per testing status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Segments without a planned test date.
    pub unassigned: usize,
    /// Segments at or above the fully-tested threshold.
    pub fully_tested: usize,
    /// Segments with partial coverage.
    pub partially_tested: usize,
    /// Segments planned and still uncovered.
    pub planned: usize,
}

impl StatusCounts {
    fn record(&mut self, status: TestingStatus) {
        match status {
            TestingStatus::Unassigned => self.unassigned += 1,
            TestingStatus::FullyTested => self.fully_tested += 1,
            TestingStatus::PartiallyTested => self.partially_tested += 1,
            TestingStatus::Planned => self.planned += 1,
        }
    }
}

/// Counts of segments per deadline urgency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineCounts {
    /// Segments without a deadline.
    pub unknown: usize,
    /// Segments past their deadline.
    pub overdue: usize,
    /// Segments with a deadline inside the upcoming window.
    pub upcoming: usize,
    /// Segments with a comfortably distant deadline.
    pub safe: usize,
}

impl DeadlineCounts {
    fn record(&mut self, status: DeadlineStatus) {
        match status {
            DeadlineStatus::Unknown => self.unknown += 1,
            DeadlineStatus::Overdue => self.overdue += 1,
            DeadlineStatus::Upcoming => self.upcoming += 1,
            DeadlineStatus::Safe => self.safe += 1,
        }
    }
}

/// Aggregate view over a batch of segment outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Number of successfully built reports.
    pub reports: usize,
    /// Number of error records in the batch.
    pub errors: usize,
    /// Segments per testing status.
    pub status_counts: StatusCounts,
    /// Segments per deadline urgency.
    pub deadline_counts: DeadlineCounts,
    /// Summed tested length across all reports, in kilometres.
    pub tested_length_km: f64,
    /// Summed plan total length across all reports, in kilometres.
    pub total_length_km: f64,
    /// Tested share of the summed total length, in percent. 0.0 when no
    /// total length is known.
    pub overall_coverage_pct: f64,
}

impl StatusSummary {
    /// Aggregate a batch of outcomes.
    pub fn from_outcomes(outcomes: &[SegmentOutcome]) -> Self {
        let mut summary = Self::default();

        for outcome in outcomes {
            match outcome {
                SegmentOutcome::Report(report) => {
                    summary.reports += 1;
                    summary.status_counts.record(report.status);
                    summary.deadline_counts.record(report.deadline_status);
                    summary.tested_length_km += report.tested_length_km;
                    summary.total_length_km += report.total_length_km.unwrap_or(0.0);
                }
                SegmentOutcome::Error(_) => summary.errors += 1,
            }
        }

        if summary.total_length_km != 0.0 {
            summary.overall_coverage_pct = round_to(
                summary.tested_length_km / summary.total_length_km * 100.0,
                2,
            );
        }
        summary
    }
}
