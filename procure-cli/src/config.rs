//! Application configuration management.
//!
//! Configuration is merged from default values, an optional TOML file and
//! environment variables, in increasing order of precedence. Command-line
//! flags then override the optimizer section per invocation.

use crate::CliError;
use procure_core::models::CatalogConfig;
use procure_solver::{MinimumOrderPolicy, Settings};
use procure_sqlite::config::SqliteConfig;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AppConfig {
    /// Where the catalog database lives
    #[serde(default)]
    pub database: SqliteConfig,

    /// Offer freshness filtering
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Search limits and minimum order policy
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

/// Optimizer configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Wall-clock budget for one optimization (if omitted, run to optimality)
    #[serde(with = "humantime_serde")]
    pub deadline: Option<Duration>,

    /// Minimum order enforcement
    pub policy: MinimumOrderPolicy,

    /// Search nodes between clock reads
    pub check_interval: u64,

    /// Search nodes the savings baseline may spend when no single supplier
    /// covers the list
    pub baseline_node_limit: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        let Settings {
            policy,
            check_interval,
            baseline_node_limit,
        } = Settings::default();
        Self {
            deadline: None,
            policy,
            check_interval,
            baseline_node_limit,
        }
    }
}

impl OptimizerConfig {
    /// The solver settings this configuration describes
    pub fn settings(&self) -> Settings {
        Settings {
            policy: self.policy,
            check_interval: self.check_interval,
            baseline_node_limit: self.baseline_node_limit,
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `PROCURE_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Read the catalog from a file
    /// export PROCURE_DATABASE__DATABASE_PATH="/var/lib/procure/catalog.db"
    ///
    /// # Ignore offers older than a month
    /// export PROCURE_CATALOG__MAX_OFFER_AGE="30days"
    ///
    /// # Give every search at most two seconds
    /// export PROCURE_OPTIMIZER__DEADLINE="2s"
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(CliError::MissingConfig(path.to_owned()))?;
            }
        }

        // This maps PROCURE_OPTIMIZER__DEADLINE to optimizer.deadline
        config = config.add_source(
            config::Environment::with_prefix("PROCURE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
