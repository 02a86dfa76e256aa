//! Application configuration management.
//!
//! Engine settings are loaded from default values, an optional TOML file and
//! environment variables, in increasing order of precedence. Command-line flags
//! are applied on top of the result by each subcommand.

use serde::{Deserialize, Serialize};
use smartprice_solver::{EstimatorSettings, GridSettings, IsoelasticSettings};
use std::path::Path;

/// The configuration of every engine component
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AppConfig {
    /// Elasticity estimation (minimum segment size, clip range)
    #[serde(default)]
    pub estimator: EstimatorSettings,

    /// Grid search limits
    #[serde(default)]
    pub grid: GridSettings,

    /// Isoelastic optimization (bound multipliers, golden-section search)
    #[serde(default)]
    pub isoelastic: IsoelasticSettings,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `SMARTPRICE_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Require more observations per segment
    /// export SMARTPRICE_ESTIMATOR__MIN_SAMPLES=250
    ///
    /// # Allow a wider grid
    /// export SMARTPRICE_GRID__MAX_POINTS=1000000
    ///
    /// # Tighten the upper price bound
    /// export SMARTPRICE_ISOELASTIC__BOUNDS__UPPER_MULTIPLIER=1.5
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
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // Override with environment variables
        // This maps SMARTPRICE_ESTIMATOR__MIN_SAMPLES to estimator.min_samples
        config = config.add_source(
            config::Environment::with_prefix("SMARTPRICE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
