//! Typed rows and the loaded-table context.
//!
//! The engine never reads files itself; a loading collaborator hands it a
//! [`StatusTables`] value holding the three fully-loaded tables. The context
//! is immutable after construction and every query borrows it, so one load
//! can serve any number of segment queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::intervals::Interval;
use crate::core::normalize::normalize_une_id;

/// One row of the tested-segments report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestedRow {
    /// Segment identifier as spelled in the source file.
    pub une_id: String,
    /// Lower kilometre endpoint of the measured stretch.
    pub km_from: f64,
    /// Upper kilometre endpoint of the measured stretch.
    pub km_to: f64,
}

impl TestedRow {
    /// Create a row from an identifier and kilometre endpoints.
    pub fn new(une_id: impl Into<String>, km_from: f64, km_to: f64) -> Self {
        Self {
            une_id: une_id.into(),
            km_from,
            km_to,
        }
    }

    /// Normalized form of the row's identifier.
    pub fn une_id_norm(&self) -> String {
        normalize_une_id(&self.une_id)
    }

    /// The measured stretch as an interval.
    pub fn interval(&self) -> Interval {
        Interval::new(self.km_from, self.km_to)
    }
}

/// One row of the untested-segments report.
///
/// Entries here retract exactly matching tested rows; the shape mirrors
/// [`TestedRow`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UntestedRow {
    /// Segment identifier as spelled in the source file.
    pub une_id: String,
    /// Lower kilometre endpoint of the retracted stretch.
    pub km_from: f64,
    /// Upper kilometre endpoint of the retracted stretch.
    pub km_to: f64,
}

impl UntestedRow {
    /// Create a row from an identifier and kilometre endpoints.
    pub fn new(une_id: impl Into<String>, km_from: f64, km_to: f64) -> Self {
        Self {
            une_id: une_id.into(),
            km_from,
            km_to,
        }
    }

    /// Normalized form of the row's identifier.
    pub fn une_id_norm(&self) -> String {
        normalize_une_id(&self.une_id)
    }

    /// The retracted stretch as an interval.
    pub fn interval(&self) -> Interval {
        Interval::new(self.km_from, self.km_to)
    }
}

/// One row of the master test plan.
///
/// `id` and `bandel` are mandatory reference fields upstream, but they stay
/// optional here so a corrupt row survives loading and the report builder
/// can raise the missing-field error itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRow {
    /// Segment identifier as spelled in the plan.
    pub une_id: String,
    /// Numeric plan ID.
    pub id: Option<i64>,
    /// Railway line designation.
    pub bandel: Option<String>,
    /// Lower kilometre bound of the segment.
    pub km_from: f64,
    /// Upper kilometre bound of the segment.
    pub km_to: f64,
    /// Total segment length in kilometres.
    pub total_length: Option<f64>,
    /// Date the segment was last tested.
    pub tested_date: Option<NaiveDate>,
    /// Date a test is planned for.
    pub planned_date: Option<NaiveDate>,
    /// Last date the retest interval allows.
    pub deadline: Option<NaiveDate>,
    /// Date of the previous completed test.
    pub last_previous_test: Option<NaiveDate>,
    /// Scheduled date of the next test.
    pub next_test_date: Option<NaiveDate>,
    /// Days until the deadline, as precomputed in the plan.
    pub days_until: Option<i64>,
}

impl PlanRow {
    /// Normalized form of the row's identifier.
    pub fn une_id_norm(&self) -> String {
        normalize_une_id(&self.une_id)
    }

    /// Segment bounds with endpoints ordered, whichever way the plan
    /// recorded them.
    pub fn bounds(&self) -> Interval {
        Interval::from_endpoints(self.km_from, self.km_to)
    }
}

/// The three loaded tables a status run reads from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusTables {
    /// Tested-segments report rows.
    pub tested: Vec<TestedRow>,
    /// Untested-segments report rows.
    pub untested: Vec<UntestedRow>,
    /// Master test plan rows.
    pub plan: Vec<PlanRow>,
}

impl StatusTables {
    /// Bundle three loaded tables into a query context.
    pub fn new(tested: Vec<TestedRow>, untested: Vec<UntestedRow>, plan: Vec<PlanRow>) -> Self {
        Self {
            tested,
            untested,
            plan,
        }
    }

    /// Measured intervals for a normalized identifier, in table order with
    /// duplicates preserved.
    pub fn tested_intervals(&self, norm_id: &str) -> Vec<Interval> {
        self.tested
            .iter()
            .filter(|row| row.une_id_norm() == norm_id)
            .map(TestedRow::interval)
            .collect()
    }

    /// Retracted intervals for a normalized identifier, in table order.
    pub fn untested_intervals(&self, norm_id: &str) -> Vec<Interval> {
        self.untested
            .iter()
            .filter(|row| row.une_id_norm() == norm_id)
            .map(UntestedRow::interval)
            .collect()
    }

    /// First plan row matching a normalized identifier.
    pub fn find_plan_row(&self, norm_id: &str) -> Option<&PlanRow> {
        self.plan.iter().find(|row| row.une_id_norm() == norm_id)
    }

    /// First plan row with the given numeric ID.
    pub fn find_plan_row_by_id(&self, id: i64) -> Option<&PlanRow> {
        self.plan.iter().find(|row| row.id == Some(id))
    }
}
