//! Main status engine implementation.

use chrono::{Local, NaiveDate};
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::api::results::{SegmentErrorRecord, SegmentOutcome, SegmentReport, StatusSummary};
use crate::core::classify::{self, deadline_status, testing_status};
use crate::core::config::BanstatConfig;
use crate::core::coverage::{compute_coverage, round_to};
use crate::core::errors::{BanstatError, Result};
use crate::core::normalize::normalize_une_id;
use crate::core::tables::{PlanRow, StatusTables};

/// Status engine answering segment queries against the loaded tables.
///
/// Owns the three tables, the configuration, and the report date every
/// deadline is judged against. All queries take `&self`; one engine can
/// serve any number of lookups from the same load.
#[derive(Debug)]
pub struct StatusEngine {
    /// Loaded source tables.
    tables: StatusTables,

    /// Schema and classification configuration.
    config: BanstatConfig,

    /// Date deadlines are evaluated against.
    report_date: NaiveDate,
}

impl StatusEngine {
    /// Create an engine reporting as of today.
    pub fn new(tables: StatusTables, config: BanstatConfig) -> Result<Self> {
        Self::with_report_date(tables, config, Local::now().date_naive())
    }

    /// Create an engine with an explicit report date.
    pub fn with_report_date(
        tables: StatusTables,
        config: BanstatConfig,
        report_date: NaiveDate,
    ) -> Result<Self> {
        config.validate()?;
        info!(
            "Status engine ready: {} tested, {} untested, {} plan rows",
            tables.tested.len(),
            tables.untested.len(),
            tables.plan.len()
        );
        Ok(Self {
            tables,
            config,
            report_date,
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &BanstatConfig {
        &self.config
    }

    /// The loaded tables.
    pub fn tables(&self) -> &StatusTables {
        &self.tables
    }

    /// The date deadlines are evaluated against.
    pub fn report_date(&self) -> NaiveDate {
        self.report_date
    }

    /// Status for the segment named by a raw identifier.
    ///
    /// The identifier is normalized before lookup, so any source spelling
    /// works. An identifier absent from the plan yields an error record
    /// outcome, not an `Err`; a matched plan row missing its mandatory
    /// fields propagates the failure.
    pub fn segment_status(&self, raw_une_id: &str) -> Result<SegmentOutcome> {
        let une_id = normalize_une_id(raw_une_id);
        debug!("Segment status query for '{}'", une_id);

        match self.tables.find_plan_row(&une_id) {
            Some(row) => self.build_report(row).map(boxed_report),
            None => Ok(SegmentOutcome::Error(SegmentErrorRecord::une_id_not_found(
                une_id,
            ))),
        }
    }

    /// Status for the segment with a numeric plan ID.
    pub fn segment_status_by_id(&self, id: i64) -> Result<SegmentOutcome> {
        debug!("Segment status query for ID {}", id);

        match self.tables.find_plan_row_by_id(id) {
            Some(row) => self.build_report(row).map(boxed_report),
            None => Ok(SegmentOutcome::Error(SegmentErrorRecord::id_not_found(id))),
        }
    }

    /// Status for every segment in the plan, one outcome per distinct
    /// numeric ID in table order.
    ///
    /// Duplicate IDs keep their first row. A row that fails mandatory-field
    /// validation contributes an inline error record instead of aborting
    /// the rest of the batch.
    pub fn all_statuses(&self) -> Vec<SegmentOutcome> {
        info!(
            "Building status reports for {} plan rows",
            self.tables.plan.len()
        );

        let mut seen_ids: IndexSet<i64> = IndexSet::new();
        let mut outcomes = Vec::new();

        for row in &self.tables.plan {
            if let Some(id) = row.id {
                if !seen_ids.insert(id) {
                    continue;
                }
            }

            match self.build_report(row) {
                Ok(report) => outcomes.push(SegmentOutcome::Report(Box::new(report))),
                Err(err) => {
                    warn!("Skipping plan row: {}", err);
                    let une_id = row.une_id_norm();
                    outcomes.push(SegmentOutcome::Error(SegmentErrorRecord::row_error(
                        row.id,
                        (!une_id.is_empty()).then_some(une_id),
                        err.to_string(),
                    )));
                }
            }
        }

        debug!("Built {} outcomes", outcomes.len());
        outcomes
    }

    /// Distinct normalized identifiers in the plan, in table order.
    /// Rows whose identifier normalizes to nothing are skipped.
    pub fn plan_identifiers(&self) -> Vec<String> {
        let mut identifiers: IndexSet<String> = IndexSet::new();
        for row in &self.tables.plan {
            let une_id = row.une_id_norm();
            if !une_id.is_empty() {
                identifiers.insert(une_id);
            }
        }
        identifiers.into_iter().collect()
    }

    /// Aggregate a batch of outcomes.
    pub fn summary(&self, outcomes: &[SegmentOutcome]) -> StatusSummary {
        StatusSummary::from_outcomes(outcomes)
    }

    /// Whether a report's planned test has slipped past the grace window.
    pub fn planned_test_overdue(&self, report: &SegmentReport) -> bool {
        classify::planned_test_overdue(
            report.status,
            report.planned_date,
            self.report_date,
            &self.config.classify,
        )
    }

    /// Assemble the full report for one plan row.
    ///
    /// Fails with a missing-mandatory-field error when the row lacks its
    /// numeric ID or line designation; those are upstream reference fields
    /// a valid plan always carries.
    fn build_report(&self, row: &PlanRow) -> Result<SegmentReport> {
        let row_label = row_label(row);
        let id = row
            .id
            .ok_or_else(|| BanstatError::missing_field("ID", row_label))?;
        let bandel = row
            .bandel
            .clone()
            .ok_or_else(|| BanstatError::missing_field("Bandel", row_label))?;

        let une_id = row.une_id_norm();
        let bounds = row.bounds();
        let coverage = compute_coverage(
            &self.tables.tested_intervals(&une_id),
            &self.tables.untested_intervals(&une_id),
            bounds,
            row.total_length,
        );

        let status = testing_status(coverage.coverage_pct, row.planned_date, &self.config.classify);
        let deadline_status = deadline_status(row.deadline, self.report_date, &self.config.classify);

        Ok(SegmentReport {
            id,
            une_id,
            une_id_raw: row.une_id.clone(),
            bandel,
            status,
            last_previous_test: row.last_previous_test,
            planned_date: row.planned_date,
            next_test_date: row.next_test_date,
            days_until: row.days_until,
            deadline: row.deadline,
            deadline_status,
            tested_date: row.tested_date,
            coverage_pct: coverage.coverage_pct,
            tested_length_km: round_to(coverage.tested_length, 3),
            total_length_km: row.total_length.map(|total| round_to(total, 3)),
            km_from: bounds.start,
            km_to: bounds.end,
            gaps: coverage.gaps,
        })
    }
}

fn boxed_report(report: SegmentReport) -> SegmentOutcome {
    SegmentOutcome::Report(Box::new(report))
}

fn row_label(row: &PlanRow) -> Option<&str> {
    (!row.une_id.is_empty()).then_some(row.une_id.as_str())
}
