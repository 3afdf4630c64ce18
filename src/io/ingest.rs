//! Conversion of raw loaded records into typed tables.
//!
//! A file-loading collaborator parses the three source exports and hands
//! each row over as a map of column name to JSON value. This module applies
//! a [`SchemaConfig`] to those maps and produces the [`StatusTables`] the
//! engine queries, so the core never sees a source column spelling.
//!
//! Cell extraction is best-effort by contract: unreadable dates become
//! `None`, non-string identifiers become the empty string, and only rows
//! missing a kilometre endpoint in the interval tables are dropped. Plan
//! rows are always kept, whatever their shape, because mandatory-field
//! enforcement belongs to the report builder, not the loader.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::config::{PlanSchema, SchemaConfig, SegmentTableSchema};
use crate::core::tables::{PlanRow, StatusTables, TestedRow, UntestedRow};

/// One loaded row: column name to already-parsed JSON value.
pub type RawRecord = serde_json::Map<String, Value>;

/// Convert the three raw tables into a query context.
pub fn load_tables(
    tested: &[RawRecord],
    untested: &[RawRecord],
    plan: &[RawRecord],
    schema: &SchemaConfig,
) -> StatusTables {
    let tables = StatusTables::new(
        tested_rows_from_records(tested, &schema.tested),
        untested_rows_from_records(untested, &schema.untested),
        plan_rows_from_records(plan, &schema.plan),
    );
    debug!(
        "Loaded {} tested, {} untested, {} plan rows",
        tables.tested.len(),
        tables.untested.len(),
        tables.plan.len()
    );
    tables
}

/// Convert tested-report records into typed rows.
///
/// Records without both kilometre endpoints are skipped.
pub fn tested_rows_from_records(
    records: &[RawRecord],
    schema: &SegmentTableSchema,
) -> Vec<TestedRow> {
    records
        .iter()
        .filter_map(|record| {
            interval_cells(record, schema, "tested")
                .map(|(une_id, km_from, km_to)| TestedRow::new(une_id, km_from, km_to))
        })
        .collect()
}

/// Convert untested-report records into typed rows.
///
/// Records without both kilometre endpoints are skipped.
pub fn untested_rows_from_records(
    records: &[RawRecord],
    schema: &SegmentTableSchema,
) -> Vec<UntestedRow> {
    records
        .iter()
        .filter_map(|record| {
            interval_cells(record, schema, "untested")
                .map(|(une_id, km_from, km_to)| UntestedRow::new(une_id, km_from, km_to))
        })
        .collect()
}

/// Convert test-plan records into typed rows. Every record yields a row.
pub fn plan_rows_from_records(records: &[RawRecord], schema: &PlanSchema) -> Vec<PlanRow> {
    records
        .iter()
        .map(|record| PlanRow {
            une_id: string_cell(record, &schema.une_id).unwrap_or_default(),
            id: integer_cell(record, &schema.id),
            bandel: text_cell(record, &schema.bandel),
            km_from: number_cell(record, &schema.km_from).unwrap_or(0.0),
            km_to: number_cell(record, &schema.km_to).unwrap_or(0.0),
            total_length: number_cell(record, &schema.total_length),
            tested_date: date_cell(record, &schema.tested),
            planned_date: date_cell(record, &schema.planned),
            deadline: date_cell(record, &schema.deadline),
            last_previous_test: date_cell(record, &schema.last_previous_test),
            next_test_date: date_cell(record, &schema.next_test_date),
            days_until: integer_cell(record, &schema.days_until),
        })
        .collect()
}

fn interval_cells(
    record: &RawRecord,
    schema: &SegmentTableSchema,
    table: &str,
) -> Option<(String, f64, f64)> {
    let une_id = string_cell(record, &schema.une_id).unwrap_or_default();
    let km_from = number_cell(record, &schema.km_from);
    let km_to = number_cell(record, &schema.km_to);
    match (km_from, km_to) {
        (Some(from), Some(to)) => Some((une_id, from, to)),
        _ => {
            warn!(
                "Skipping {} row '{}': missing kilometre endpoint",
                table, une_id
            );
            None
        }
    }
}

/// Extract a string cell. Any non-string value reads as absent, which the
/// identifier normalization contract turns into the empty string.
fn string_cell(record: &RawRecord, column: &str) -> Option<String> {
    match record.get(column) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Extract a textual cell, stringifying numbers. Used for reference fields
/// that some exports deliver as numeric cells.
fn text_cell(record: &RawRecord, column: &str) -> Option<String> {
    match record.get(column) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract a numeric cell from a number or a numeric string. Strings that
/// parse to a non-finite value ("NaN", "inf") read as absent, like any
/// other unreadable cell.
fn number_cell(record: &RawRecord, column: &str) -> Option<f64> {
    let value = match record.get(column) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|number| number.is_finite())
}

/// Extract an integer cell, accepting integral floats and numeric strings.
fn integer_cell(record: &RawRecord, column: &str) -> Option<i64> {
    match record.get(column) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_to_i64)),
        Some(Value::String(s)) => {
            let text = s.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral_to_i64))
        }
        _ => None,
    }
}

fn integral_to_i64(value: f64) -> Option<i64> {
    (value.fract() == 0.0).then_some(value as i64)
}

/// Extract a calendar date from a string cell, best effort.
///
/// Accepts plain ISO dates, RFC 3339 timestamps, and the two datetime
/// spellings spreadsheet loaders commonly emit. Anything else reads as
/// absent.
fn date_cell(record: &RawRecord, column: &str) -> Option<NaiveDate> {
    let Some(Value::String(raw)) = record.get(column) else {
        return None;
    };
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }

    debug!("Unparseable date '{}' in column '{}'", text, column);
    None
}
