#![warn(missing_docs)]
//! The numerical core of the smartprice engine.
//!
//! Four procedures live here, all synchronous and free of shared state:
//! - [`ElasticityEstimator`] fits a log-log slope per market segment;
//! - [`GridSearchOptimizer`] sweeps candidate prices against a demand model;
//! - [`IsoelasticOptimizer`] maximizes profit on a calibrated isoelastic curve;
//! - [`BatchRowOptimizer`] runs the isoelastic optimizer over every row of a
//!   dataset, isolating per-row failures.

mod batch;
pub use batch::*;

mod estimator;
pub use estimator::*;

mod grid;
pub use grid::*;

/**
 * These are the price search strategies the isoelastic optimizer can use.
 */
mod impls;
pub use impls::*;

mod isoelastic;
pub use isoelastic::*;

/// Reading and writing of tabular data (CSV tables and JSON summaries)
#[cfg(feature = "io")]
pub mod io;
