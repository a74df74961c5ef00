//! Solver configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```json
//! { "time_limit_secs": 60, "root": { "vertex": 3 }, "degree_rule": "in_and_out" }
//! ```

use crate::error::{DcmstError, Result};
use crate::graph::VertexId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default wall-clock budget of one solve: 30 minutes.
pub const DEFAULT_TIME_LIMIT_SECS: f64 = 1800.0;

/// Default backend name, resolved by [`crate::backend::create_backend`].
pub const DEFAULT_BACKEND: &str = "cp-sat";

/// How the root of the MTZ labeling is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootSelection {
    /// Smallest vertex id of the graph.
    #[default]
    Auto,
    /// A fixed vertex; solving fails if the graph does not contain it.
    Vertex(VertexId),
}

/// How a center's minimum degree is imposed on the arc variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegreeRule {
    /// In-arcs plus out-arcs of the center sum to at least the requirement.
    #[default]
    Total,
    /// In-arcs and out-arcs each sum to at least the requirement.
    InAndOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: String,
    pub time_limit_secs: f64,
    pub root: RootSelection,
    pub degree_rule: DegreeRule,
    /// Require exactly one selected in-arc per non-root vertex and none at the root.
    pub single_parent: bool,
    /// Multiplier applied to edge weights for backends with integral objectives.
    pub objective_scale: f64,
    pub num_workers: Option<i32>,
    pub random_seed: Option<i32>,
    pub log_search_progress: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            root: RootSelection::Auto,
            degree_rule: DegreeRule::Total,
            single_parent: true,
            objective_scale: 1000.0,
            num_workers: None,
            random_seed: None,
            log_search_progress: false,
        }
    }
}

impl SolverConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.time_limit_secs.is_finite() && self.time_limit_secs > 0.0) {
            return Err(DcmstError::InvalidConfig(format!(
                "time_limit_secs must be positive, got {}",
                self.time_limit_secs
            )));
        }
        self.time_limit()?;
        if !(self.objective_scale.is_finite() && self.objective_scale > 0.0) {
            return Err(DcmstError::InvalidConfig(format!(
                "objective_scale must be positive, got {}",
                self.objective_scale
            )));
        }
        if self.num_workers.is_some_and(|n| n < 0) {
            return Err(DcmstError::InvalidConfig("num_workers must not be negative".into()));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.time_limit_secs).map_err(|err| {
            DcmstError::InvalidConfig(format!("time_limit_secs {} is out of range: {err}", self.time_limit_secs))
        })
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_secs = limit.as_secs_f64();
        self
    }

    pub fn with_root(mut self, root: RootSelection) -> Self {
        self.root = root;
        self
    }

    pub fn with_degree_rule(mut self, rule: DegreeRule) -> Self {
        self.degree_rule = rule;
        self
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit().unwrap(), Duration::from_secs(1800));
        assert_eq!(config.root, RootSelection::Auto);
        assert_eq!(config.degree_rule, DegreeRule::Total);
        assert!(config.single_parent);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SolverConfig::from_json_str(
            r#"{ "time_limit_secs": 60, "root": { "vertex": 3 }, "degree_rule": "in_and_out" }"#,
        )
        .unwrap();
        assert_eq!(config.time_limit().unwrap(), Duration::from_secs(60));
        assert_eq!(config.root, RootSelection::Vertex(3));
        assert_eq!(config.degree_rule, DegreeRule::InAndOut);
        assert_eq!(config.backend, DEFAULT_BACKEND);

        let auto = SolverConfig::from_json_str(r#"{ "root": "auto" }"#).unwrap();
        assert_eq!(auto.root, RootSelection::Auto);
    }

    #[test]
    fn rejects_non_positive_limits() {
        let err = SolverConfig::from_json_str(r#"{ "time_limit_secs": 0 }"#).unwrap_err();
        assert!(matches!(err, DcmstError::InvalidConfig(_)));
        let config = SolverConfig {
            objective_scale: f64::NAN,
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_limits_beyond_duration_range() {
        let config = SolverConfig {
            time_limit_secs: 1e20,
            ..SolverConfig::default()
        };
        assert!(matches!(config.validate(), Err(DcmstError::InvalidConfig(_))));
        assert!(config.time_limit().is_err());

        let err = SolverConfig::from_json_str(r#"{ "time_limit_secs": 1e20 }"#).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
