//! # Banstat: Testing-Coverage Status Engine for Railway Segments
//!
//! Computes per-segment testing coverage status from the three tabular
//! reports of a railway inspection programme: tested segments, untested
//! (retracted) segments, and the master test plan. For each planned segment
//! the engine reconciles which measured kilometre intervals count as valid
//! coverage and derives:
//!
//! - **Coverage**: merged valid tested length against the plan's total length
//! - **Gaps**: the uncovered kilometre stretches within the segment bounds
//! - **Testing status**: `Unassigned`, `Fully tested`, `Partially tested`, or `Planned`
//! - **Deadline status**: `Unknown`, `Overdue`, `Upcoming`, or `Safe`
//!
//! File parsing, command-line handling, and JSON emission are collaborator
//! concerns: callers load the source files, hand the rows over through
//! [`io::ingest`], and serialize the returned reports themselves.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                     API Layer                      │
//! │          StatusEngine · SegmentReport              │
//! ├────────────────────────────────────────────────────┤
//! │        Core           │           I/O              │
//! │ • normalize           │ • ingest (schema-mapped    │
//! │ • intervals           │   record conversion)       │
//! │ • coverage            │                            │
//! │ • classify            │                            │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use banstat::{BanstatConfig, PlanRow, StatusEngine, StatusTables, TestedRow};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tables = StatusTables::new(
//!         vec![TestedRow::new("(LDN-3A)", 0.0, 7.0)],
//!         vec![],
//!         vec![PlanRow {
//!             une_id: "LDN 3A".to_string(),
//!             id: Some(7),
//!             bandel: Some("111".to_string()),
//!             km_from: 0.0,
//!             km_to: 10.0,
//!             total_length: Some(10.0),
//!             ..Default::default()
//!         }],
//!     );
//!
//!     let engine = StatusEngine::new(tables, BanstatConfig::default())?;
//!     let outcome = engine.segment_status("LDN3A")?;
//!     let report = outcome.as_report().expect("segment is in the plan");
//!
//!     println!("{} covered: {}%", report.une_id, report.coverage_pct);
//!     assert_eq!(report.coverage_pct, 70.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core status algorithms
pub mod core {
    //! Core status algorithms and data structures.

    pub mod classify;
    pub mod config;
    pub mod coverage;
    pub mod errors;
    pub mod intervals;
    pub mod normalize;
    pub mod tables;
}

// Loading seam between raw records and typed tables
pub mod io {
    //! Conversion of loaded source records into typed tables.

    pub mod ingest;
}

// Public API and engine interface
pub mod api {
    //! High-level API and engine interface.

    pub mod engine;
    pub mod results;
}

// Re-export primary types for convenience
pub use api::engine::StatusEngine;
pub use api::results::{
    DeadlineCounts, Gap, SegmentErrorRecord, SegmentOutcome, SegmentReport, StatusCounts,
    StatusSummary,
};
pub use core::classify::{DeadlineStatus, TestingStatus};
pub use core::config::{
    BanstatConfig, ClassifyConfig, PlanSchema, SchemaConfig, SegmentTableSchema,
};
pub use core::coverage::{compute_coverage, CoverageSummary};
pub use core::errors::{BanstatError, Result};
pub use core::intervals::{clip, Interval, IntervalSet};
pub use core::normalize::normalize_une_id;
pub use core::tables::{PlanRow, StatusTables, TestedRow, UntestedRow};
pub use io::ingest::{load_tables, RawRecord};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
