use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::grid::{Origin, ScanOrder};

// ── GeneratorConfig ───────────────────────────────────────────────────────────

/// Settings for a [`Generator`](super::Generator) run.
///
/// Missing fields in a JSON config fall back to [`GeneratorConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Cell visiting order; fixes placement order and palette discovery order.
    pub scan_order: ScanOrder,
    /// How image rows map to grid rows when loading from a file.
    pub origin: Origin,
    /// Worker threads. `1` scans serially.
    pub workers: usize,
    /// Collect a [`CoverageReport`](crate::placement::CoverageReport) of unmapped colours.
    pub coverage_report: bool,
}

impl Default for GeneratorConfig {
    /// Column-major scan, bottom-left origin, serial, no report.
    fn default() -> Self {
        Self {
            scan_order:      ScanOrder::ColumnMajor,
            origin:          Origin::BottomLeft,
            workers:         1,
            coverage_report: false,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(MapError::invalid("workers must be at least 1"));
        }
        Ok(())
    }
}
