//! Configuration for schema mapping and classification policy.
//!
//! Two concerns live here: [`SchemaConfig`] maps the core's field names onto
//! the column spellings of the three source exports, and [`ClassifyConfig`]
//! holds the thresholds driving status and deadline classification. Both are
//! bundled into [`BanstatConfig`], which can be round-tripped through YAML
//! so deployments can override the legacy spellings without a rebuild.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{BanstatError, Result};

/// Top-level configuration for the status engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BanstatConfig {
    /// Column-name mapping for the three source tables.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Status and deadline classification thresholds.
    #[serde(default)]
    pub classify: ClassifyConfig,
}

impl BanstatConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            BanstatError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            BanstatError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings.
    pub fn validate(&self) -> Result<()> {
        self.schema.validate()?;
        self.classify.validate()?;
        Ok(())
    }
}

/// Column-name mapping for the three source tables.
///
/// The defaults reproduce the legacy export spellings verbatim, including
/// the misspelled `Lenght` length column, so the engine works against
/// unmodified source files out of the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Columns of the tested-segments report.
    pub tested: SegmentTableSchema,

    /// Columns of the untested-segments (exclusion) report.
    pub untested: SegmentTableSchema,

    /// Columns of the master test plan.
    pub plan: PlanSchema,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            tested: SegmentTableSchema::tested_default(),
            untested: SegmentTableSchema::untested_default(),
            plan: PlanSchema::default(),
        }
    }
}

impl SchemaConfig {
    /// Validate that every mapped column name is usable.
    pub fn validate(&self) -> Result<()> {
        self.tested.validate("tested")?;
        self.untested.validate("untested")?;
        self.plan.validate()?;
        Ok(())
    }
}

/// Column names for a table of measured kilometre intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentTableSchema {
    /// Segment identifier column.
    pub une_id: String,

    /// Lower kilometre endpoint column.
    pub km_from: String,

    /// Upper kilometre endpoint column.
    pub km_to: String,
}

impl Default for SegmentTableSchema {
    fn default() -> Self {
        Self::tested_default()
    }
}

impl SegmentTableSchema {
    /// Default column spellings of the tested-segments export.
    pub fn tested_default() -> Self {
        Self {
            une_id: "SDMS UNA ID".to_string(),
            km_from: "KmFrom".to_string(),
            km_to: "KmTo".to_string(),
        }
    }

    /// Default column spellings of the untested-segments export.
    pub fn untested_default() -> Self {
        Self {
            une_id: "Report Number".to_string(),
            km_from: "KmFrom".to_string(),
            km_to: "KmTo".to_string(),
        }
    }

    /// Validate column names for the named table.
    pub fn validate(&self, table: &str) -> Result<()> {
        require_column(table, "une_id", &self.une_id)?;
        require_column(table, "km_from", &self.km_from)?;
        require_column(table, "km_to", &self.km_to)?;
        Ok(())
    }
}

/// Column names for the master test plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSchema {
    /// Segment identifier column.
    pub une_id: String,

    /// Numeric plan ID column.
    pub id: String,

    /// Railway line designation column.
    pub bandel: String,

    /// Lower kilometre bound column.
    pub km_from: String,

    /// Upper kilometre bound column.
    pub km_to: String,

    /// Total segment length column. The legacy export spells it `Lenght`.
    pub total_length: String,

    /// Tested-date column.
    pub tested: String,

    /// Planned-test-date column.
    pub planned: String,

    /// Retest deadline column.
    pub deadline: String,

    /// Previous-test-date column.
    pub last_previous_test: String,

    /// Next-test-date column.
    pub next_test_date: String,

    /// Precomputed days-until-deadline column.
    pub days_until: String,
}

impl Default for PlanSchema {
    fn default() -> Self {
        Self {
            une_id: "SDMS UNE ID".to_string(),
            id: "ID".to_string(),
            bandel: "Bandel".to_string(),
            km_from: "KmFrom".to_string(),
            km_to: "KmTo".to_string(),
            total_length: "Lenght".to_string(),
            tested: "Tested".to_string(),
            planned: "Planned 2025".to_string(),
            deadline: "Interval, Last date".to_string(),
            last_previous_test: "Last Previous test".to_string(),
            next_test_date: "next-test-date".to_string(),
            days_until: "Days until out of date".to_string(),
        }
    }
}

impl PlanSchema {
    /// Validate plan column names.
    pub fn validate(&self) -> Result<()> {
        require_column("plan", "une_id", &self.une_id)?;
        require_column("plan", "id", &self.id)?;
        require_column("plan", "bandel", &self.bandel)?;
        require_column("plan", "km_from", &self.km_from)?;
        require_column("plan", "km_to", &self.km_to)?;
        require_column("plan", "total_length", &self.total_length)?;
        require_column("plan", "tested", &self.tested)?;
        require_column("plan", "planned", &self.planned)?;
        require_column("plan", "deadline", &self.deadline)?;
        require_column("plan", "last_previous_test", &self.last_previous_test)?;
        require_column("plan", "next_test_date", &self.next_test_date)?;
        require_column("plan", "days_until", &self.days_until)?;
        Ok(())
    }
}

fn require_column(table: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BanstatError::config_field(
            "column name cannot be empty",
            format!("schema.{table}.{field}"),
        ));
    }
    Ok(())
}

/// Thresholds for status and deadline classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Coverage percentage at which a segment counts as fully tested.
    /// Kept just below 100 to absorb rounding noise in the length division.
    pub fully_tested_pct: f64,

    /// Deadlines at most this many days ahead classify as upcoming.
    pub upcoming_window_days: i64,

    /// Days a planned test may slip past its planned date before it is
    /// flagged as overdue.
    pub planned_grace_days: i64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            fully_tested_pct: 99.9,
            upcoming_window_days: 14,
            planned_grace_days: 5,
        }
    }
}

impl ClassifyConfig {
    /// Validate classification thresholds.
    pub fn validate(&self) -> Result<()> {
        if self.fully_tested_pct <= 0.0 || self.fully_tested_pct > 100.0 {
            return Err(BanstatError::validation(format!(
                "fully_tested_pct must be within (0, 100], got {}",
                self.fully_tested_pct
            )));
        }

        if self.upcoming_window_days < 0 {
            return Err(BanstatError::validation(format!(
                "upcoming_window_days must be non-negative, got {}",
                self.upcoming_window_days
            )));
        }

        if self.planned_grace_days < 0 {
            return Err(BanstatError::validation(format!(
                "planned_grace_days must be non-negative, got {}",
                self.planned_grace_days
            )));
        }

        Ok(())
    }
}
