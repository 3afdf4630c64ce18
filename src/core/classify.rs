//! Status and deadline classification.
//!
//! Maps a segment's coverage percentage and plan dates onto the two
//! enumerations reported downstream: the testing status and the deadline
//! urgency. Thresholds come from [`ClassifyConfig`] so reporting policy can
//! be tuned without touching the rules themselves.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::config::ClassifyConfig;

/// Testing status of a segment, derived from coverage and the planned date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestingStatus {
    /// No planned test date exists for the segment.
    #[serde(rename = "Unassigned")]
    Unassigned,
    /// Coverage has reached the fully-tested threshold.
    #[serde(rename = "Fully tested")]
    FullyTested,
    /// Some coverage exists but the threshold has not been reached.
    #[serde(rename = "Partially tested")]
    PartiallyTested,
    /// A test is planned and no coverage has been recorded yet.
    #[serde(rename = "Planned")]
    Planned,
}

impl TestingStatus {
    /// The label used in serialized reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestingStatus::Unassigned => "Unassigned",
            TestingStatus::FullyTested => "Fully tested",
            TestingStatus::PartiallyTested => "Partially tested",
            TestingStatus::Planned => "Planned",
        }
    }
}

impl fmt::Display for TestingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a segment's retest deadline relative to the report date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeadlineStatus {
    /// The plan carries no deadline date.
    Unknown,
    /// The deadline has already passed.
    Overdue,
    /// The deadline falls within the upcoming window.
    Upcoming,
    /// The deadline is comfortably in the future.
    Safe,
}

impl DeadlineStatus {
    /// The label used in serialized reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineStatus::Unknown => "Unknown",
            DeadlineStatus::Overdue => "Overdue",
            DeadlineStatus::Upcoming => "Upcoming",
            DeadlineStatus::Safe => "Safe",
        }
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a segment's testing status.
///
/// Evaluated in precedence order, first match wins: a missing planned date
/// is `Unassigned` regardless of coverage; coverage at or above the
/// fully-tested threshold is `FullyTested`; any positive coverage is
/// `PartiallyTested`; otherwise `Planned`. The threshold defaults to 99.9
/// rather than 100 so rounding noise in the length division cannot demote a
/// fully covered segment.
pub fn testing_status(
    coverage_pct: f64,
    planned_date: Option<NaiveDate>,
    config: &ClassifyConfig,
) -> TestingStatus {
    if planned_date.is_none() {
        TestingStatus::Unassigned
    } else if coverage_pct >= config.fully_tested_pct {
        TestingStatus::FullyTested
    } else if coverage_pct > 0.0 {
        TestingStatus::PartiallyTested
    } else {
        TestingStatus::Planned
    }
}

/// Classify a deadline's urgency as of `on`.
///
/// A missing deadline is `Unknown`. Otherwise the calendar-day delta
/// decides: negative is `Overdue`, within the upcoming window (inclusive)
/// is `Upcoming`, beyond it `Safe`.
pub fn deadline_status(
    deadline: Option<NaiveDate>,
    on: NaiveDate,
    config: &ClassifyConfig,
) -> DeadlineStatus {
    let Some(deadline) = deadline else {
        return DeadlineStatus::Unknown;
    };

    let delta_days = (deadline - on).num_days();
    if delta_days < 0 {
        DeadlineStatus::Overdue
    } else if delta_days <= config.upcoming_window_days {
        DeadlineStatus::Upcoming
    } else {
        DeadlineStatus::Safe
    }
}

/// Whether a planned test has slipped past its grace window.
///
/// True only for segments still in `Planned` status whose planned date lies
/// more than `planned_grace_days` calendar days before `on`. Segments with
/// any recorded coverage, or without a planned date, are never flagged.
pub fn planned_test_overdue(
    status: TestingStatus,
    planned_date: Option<NaiveDate>,
    on: NaiveDate,
    config: &ClassifyConfig,
) -> bool {
    if status != TestingStatus::Planned {
        return false;
    }
    let Some(planned) = planned_date else {
        return false;
    };
    (on - planned).num_days() > config.planned_grace_days
}
