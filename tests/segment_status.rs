//! End-to-end tests: raw loaded records through ingest, engine queries, and
//! the serialized report shape downstream consumers validate against.

use chrono::NaiveDate;
use serde_json::{json, Value};

use banstat::{
    load_tables, BanstatConfig, DeadlineStatus, RawRecord, StatusEngine, StatusTables,
    TestingStatus,
};

fn record(value: Value) -> RawRecord {
    value.as_object().expect("record literal").clone()
}

fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 25).unwrap()
}

fn engine_from_records(
    tested: Vec<Value>,
    untested: Vec<Value>,
    plan: Vec<Value>,
    config: BanstatConfig,
) -> StatusEngine {
    let tested: Vec<RawRecord> = tested.into_iter().map(record).collect();
    let untested: Vec<RawRecord> = untested.into_iter().map(record).collect();
    let plan: Vec<RawRecord> = plan.into_iter().map(record).collect();
    let tables = load_tables(&tested, &untested, &plan, &config.schema);
    StatusEngine::with_report_date(tables, config, report_date()).unwrap()
}

fn default_plan_record(une_id: &str, id: i64) -> Value {
    json!({
        "SDMS UNE ID": une_id,
        "ID": id,
        "Bandel": "111",
        "KmFrom": 0.0,
        "KmTo": 10.0,
        "Lenght": 10.0,
        "Planned 2025": "2025-06-01",
        "Interval, Last date": "2025-09-04"
    })
}

#[test]
fn report_serializes_into_the_legacy_payload() {
    let engine = engine_from_records(
        vec![
            json!({"SDMS UNA ID": "(LDN-3A)", "KmFrom": 0.0, "KmTo": 3.0}),
            json!({"SDMS UNA ID": "LDN 3A", "KmFrom": 6.0, "KmTo": 10.0}),
            json!({"SDMS UNA ID": "LDN 3A", "KmFrom": 2.0, "KmTo": 4.0}),
        ],
        vec![json!({"Report Number": "LDN3A", "KmFrom": 2.0, "KmTo": 4.0})],
        vec![json!({
            "SDMS UNE ID": "LDN-3A",
            "ID": 7,
            "Bandel": "Stambanan 111",
            "KmFrom": 0.0,
            "KmTo": 10.0,
            "Lenght": 10.0,
            "Tested": "2025-05-01",
            "Planned 2025": "2025-06-01 00:00:00",
            "Interval, Last date": "2025-09-04",
            "Last Previous test": "2024-05-01",
            "next-test-date": "2026-05-01",
            "Days until out of date": 10
        })],
        BanstatConfig::default(),
    );

    let outcome = engine.segment_status("(LDN 3A)").unwrap();
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({
            "id": 7,
            "une_id": "LDN3A",
            "une_id_raw": "LDN-3A",
            "bandel": "Stambanan 111",
            "status": "Partially tested",
            "last_previous_test": "2024-05-01",
            "planned_date": "2025-06-01",
            "next_test_date": "2026-05-01",
            "days_until": 10,
            "deadline": "2025-09-04",
            "deadline_status": "Upcoming",
            "tested_date": "2025-05-01",
            "coverage_pct": 70.0,
            "tested_length_km": 7.0,
            "total_length_km": 10.0,
            "km_from": 0.0,
            "km_to": 10.0,
            "gaps": [{"start_km": 3.0, "end_km": 6.0, "length_km": 3.0}]
        })
    );
}

#[test]
fn touching_intervals_reach_fully_tested() {
    let engine = engine_from_records(
        vec![
            json!({"SDMS UNA ID": "LDN3A", "KmFrom": 0.0, "KmTo": 5.0}),
            json!({"SDMS UNA ID": "LDN3A", "KmFrom": 5.0, "KmTo": 10.0}),
        ],
        vec![],
        vec![default_plan_record("LDN3A", 7)],
        BanstatConfig::default(),
    );

    let outcome = engine.segment_status("LDN3A").unwrap();
    let report = outcome.as_report().unwrap();
    assert_eq!(report.coverage_pct, 100.0);
    assert_eq!(report.status, TestingStatus::FullyTested);
    assert!(report.gaps.is_empty());
}

#[test]
fn retracted_coverage_falls_back_to_planned() {
    let engine = engine_from_records(
        vec![json!({"SDMS UNA ID": "LDN3A", "KmFrom": 2.0, "KmTo": 8.0})],
        vec![json!({"Report Number": "LDN3A", "KmFrom": 2.0, "KmTo": 8.0})],
        vec![default_plan_record("LDN3A", 7)],
        BanstatConfig::default(),
    );

    let outcome = engine.segment_status("LDN3A").unwrap();
    let report = outcome.as_report().unwrap();
    assert_eq!(report.coverage_pct, 0.0);
    assert_eq!(report.status, TestingStatus::Planned);
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].length_km, 10.0);
}

#[test]
fn non_finite_kilometre_cells_never_count_as_coverage() {
    let engine = engine_from_records(
        vec![json!({"SDMS UNA ID": "LDN3A", "KmFrom": "NaN", "KmTo": "NaN"})],
        vec![],
        vec![default_plan_record("LDN3A", 7)],
        BanstatConfig::default(),
    );

    let outcome = engine.segment_status("LDN3A").unwrap();
    let report = outcome.as_report().unwrap();
    assert_eq!(report.coverage_pct, 0.0);
    assert_eq!(report.status, TestingStatus::Planned);
    assert_eq!(report.tested_length_km, 0.0);
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].length_km, 10.0);
}

#[test]
fn missing_planned_date_reports_unassigned_despite_full_coverage() {
    let mut plan = default_plan_record("LDN3A", 7);
    plan.as_object_mut().unwrap().remove("Planned 2025");

    let engine = engine_from_records(
        vec![json!({"SDMS UNA ID": "LDN3A", "KmFrom": 0.0, "KmTo": 10.0})],
        vec![],
        vec![plan],
        BanstatConfig::default(),
    );

    let outcome = engine.segment_status("LDN3A").unwrap();
    let report = outcome.as_report().unwrap();
    assert_eq!(report.coverage_pct, 100.0);
    assert_eq!(report.status, TestingStatus::Unassigned);
}

#[test]
fn deadline_windows_classify_relative_to_the_report_date() {
    let mut upcoming = default_plan_record("UP1", 1);
    upcoming["Interval, Last date"] = json!("2025-09-04");
    let mut overdue = default_plan_record("OV1", 2);
    overdue["Interval, Last date"] = json!("2025-08-24");
    let mut safe = default_plan_record("SF1", 3);
    safe["Interval, Last date"] = json!("2025-09-24");
    let mut unknown = default_plan_record("UN1", 4);
    unknown.as_object_mut().unwrap().remove("Interval, Last date");

    let engine = engine_from_records(
        vec![],
        vec![],
        vec![upcoming, overdue, safe, unknown],
        BanstatConfig::default(),
    );

    let expectations = [
        (1, DeadlineStatus::Upcoming),
        (2, DeadlineStatus::Overdue),
        (3, DeadlineStatus::Safe),
        (4, DeadlineStatus::Unknown),
    ];
    for (id, expected) in expectations {
        let outcome = engine.segment_status_by_id(id).unwrap();
        assert_eq!(
            outcome.as_report().unwrap().deadline_status,
            expected,
            "id {id}"
        );
    }
}

#[test]
fn lookup_misses_serialize_as_error_records() {
    let engine = engine_from_records(vec![], vec![], vec![], BanstatConfig::default());

    let by_une = engine.segment_status("(NO-SUCH)").unwrap();
    assert_eq!(
        serde_json::to_value(&by_une).unwrap(),
        json!({"une_id": "NOSUCH", "error": "UNE ID not found in testplan"})
    );

    let by_id = engine.segment_status_by_id(99).unwrap();
    assert_eq!(
        serde_json::to_value(&by_id).unwrap(),
        json!({"id": 99, "error": "ID not found in testplan"})
    );
}

#[test]
fn batch_collects_reports_and_inline_row_errors() {
    let mut broken = default_plan_record("BRK1", 8);
    broken.as_object_mut().unwrap().remove("Bandel");

    let engine = engine_from_records(
        vec![json!({"SDMS UNA ID": "LDN3A", "KmFrom": 0.0, "KmTo": 10.0})],
        vec![],
        vec![
            default_plan_record("LDN3A", 7),
            broken,
            default_plan_record("XYZ1", 9),
        ],
        BanstatConfig::default(),
    );

    let outcomes = engine.all_statuses();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].as_report().unwrap().status, TestingStatus::FullyTested);
    let row_error = outcomes[1].as_error().unwrap();
    assert_eq!(row_error.id, Some(8));
    assert!(row_error.error.contains("Bandel"));
    assert_eq!(outcomes[2].as_report().unwrap().coverage_pct, 0.0);

    let summary = engine.summary(&outcomes);
    assert_eq!(summary.reports, 2);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.status_counts.fully_tested, 1);
    assert_eq!(summary.status_counts.planned, 1);
    assert_eq!(summary.tested_length_km, 10.0);
    assert_eq!(summary.total_length_km, 20.0);
    assert_eq!(summary.overall_coverage_pct, 50.0);

    let serialized = serde_json::to_value(&outcomes).unwrap();
    let entries = serialized.as_array().unwrap();
    assert!(entries[0].get("error").is_none());
    assert_eq!(entries[1]["error"], "Test plan row 'BRK1' is missing mandatory field 'Bandel'");
}

#[test]
fn plan_identifiers_come_back_normalized_and_deduplicated() {
    let engine = engine_from_records(
        vec![],
        vec![],
        vec![
            default_plan_record("(LDN-3A)", 1),
            default_plan_record("XYZ 1", 2),
            default_plan_record("LDN3A", 3),
        ],
        BanstatConfig::default(),
    );
    assert_eq!(engine.plan_identifiers(), vec!["LDN3A", "XYZ1"]);
}

#[test]
fn yaml_config_overrides_schema_and_thresholds_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banstat.yml");
    std::fs::write(
        &path,
        concat!(
            "schema:\n",
            "  tested:\n",
            "    une_id: Segment ID\n",
            "  plan:\n",
            "    une_id: Segment ID\n",
            "    total_length: Length\n",
            "classify:\n",
            "  fully_tested_pct: 60.0\n",
        ),
    )
    .unwrap();
    let config = BanstatConfig::from_yaml_file(&path).unwrap();

    let engine = engine_from_records(
        vec![json!({"Segment ID": "LDN3A", "KmFrom": 0.0, "KmTo": 7.0})],
        vec![],
        vec![json!({
            "Segment ID": "LDN3A",
            "ID": 7,
            "Bandel": "111",
            "KmFrom": 0.0,
            "KmTo": 10.0,
            "Length": 10.0,
            "Planned 2025": "2025-06-01"
        })],
        config,
    );

    let outcome = engine.segment_status("LDN3A").unwrap();
    let report = outcome.as_report().unwrap();
    assert_eq!(report.coverage_pct, 70.0);
    // 70% clears the lowered fully-tested threshold.
    assert_eq!(report.status, TestingStatus::FullyTested);
}

#[test]
fn queries_share_one_immutable_context() {
    let tables = StatusTables::default();
    let engine = StatusEngine::with_report_date(tables, BanstatConfig::default(), report_date())
        .unwrap();
    let first = engine.segment_status("A").unwrap();
    let second = engine.segment_status("A").unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.report_date(), report_date());
}
