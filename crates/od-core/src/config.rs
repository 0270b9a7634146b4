//! Analysis configuration.
//!
//! Typically loaded from a TOML or JSON file by the application crate and
//! passed to the analysis builder.
//!
//! ```toml
//! weighing = "distance"
//! threshold = 0.5
//! origin_out_fraction = 0.1
//! origin_count = "POPULATION"
//! id_name_origin_destination = "OBJECTID"
//! origins_names = "A"
//! destinations_names = "B"
//! category = "category"
//! hazard_names = ["EV1_ma", "EV2_ma"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, Weighing};

/// Top-level configuration of a closest-destination analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Road attribute minimised by the router.
    #[serde(default)]
    pub weighing: Weighing,

    /// Roads whose hazard value exceeds this are removed for the scenario.
    pub threshold: f64,

    /// Destinations whose hazard value exceeds this are considered
    /// disrupted.  Defaults to [`threshold`](Self::threshold).
    #[serde(default)]
    pub destination_threshold: Option<f64>,

    /// Share of an origin's population that travels.
    pub origin_out_fraction: f64,

    /// Name of the population column in the OD table.
    pub origin_count: String,

    /// Name of the numeric id column in the OD table.
    pub id_name_origin_destination: String,

    /// Label prefix of origin ids (`A` in `A_12`).
    #[serde(default = "default_origins_names")]
    pub origins_names: String,

    /// Label prefix of destination ids (`B` in `B_3`).
    #[serde(default = "default_destinations_names")]
    pub destinations_names: String,

    /// Name of the destination category column, if destinations are
    /// partitioned.
    #[serde(default)]
    pub category: Option<String>,

    /// Hazard scenarios to evaluate.  Processed in sorted order regardless of
    /// the order given here.
    #[serde(default)]
    pub hazard_names: Vec<String>,

    /// Compare each disrupted route against the undisrupted baseline.
    #[serde(default = "default_true")]
    pub compare_with_baseline: bool,
}

fn default_origins_names() -> String {
    "A".to_owned()
}

fn default_destinations_names() -> String {
    "B".to_owned()
}

fn default_true() -> bool {
    true
}

impl AnalysisConfig {
    /// Read a configuration from a `.toml` or `.json` file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let s = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&s)
                .map_err(|e| CoreError::Parse(format!("failure decoding {}: {e}", path.display())))?,
            Some("json") => serde_json::from_str(&s)
                .map_err(|e| CoreError::Parse(format!("failure decoding {}: {e}", path.display())))?,
            _ => {
                return Err(CoreError::Config(format!(
                    "unsupported file type: {}",
                    path.display()
                )));
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the analysis cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.threshold.is_finite() {
            return Err(CoreError::Config(format!("threshold must be finite, got {}", self.threshold)));
        }
        if let Some(t) = self.destination_threshold.filter(|t| !t.is_finite()) {
            return Err(CoreError::Config(format!("destination_threshold must be finite, got {t}")));
        }
        if !(0.0..=1.0).contains(&self.origin_out_fraction) {
            return Err(CoreError::Config(format!(
                "origin_out_fraction must be within [0, 1], got {}",
                self.origin_out_fraction
            )));
        }
        if self.origins_names.is_empty() || self.destinations_names.is_empty() {
            return Err(CoreError::Config("origin and destination name prefixes must be non-empty".into()));
        }
        if self.origins_names == self.destinations_names {
            return Err(CoreError::Config(format!(
                "origin and destination prefixes are both {:?}",
                self.origins_names
            )));
        }
        Ok(())
    }

    /// Effective destination disruption threshold.
    #[inline]
    pub fn destination_threshold(&self) -> f64 {
        self.destination_threshold.unwrap_or(self.threshold)
    }

    /// Hazard names in processing order (sorted, duplicates removed).
    pub fn sorted_hazard_names(&self) -> Vec<String> {
        let mut names = self.hazard_names.clone();
        names.sort();
        names.dedup();
        names
    }
}
