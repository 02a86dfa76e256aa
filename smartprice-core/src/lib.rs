#![warn(missing_docs)]
//! Shared vocabulary for the smartprice pricing engine.
//!
//! This crate holds the data types that flow between the estimation and
//! optimization stages, along with the capability traits the engine consumes
//! from the outside world. It deliberately contains no numerical algorithms;
//! those live in `smartprice-solver`.

/// Core domain models for the pricing engine.
///
/// This module contains the fundamental data structures: historical
/// observations, segment keys, elasticity estimates, calibrated demand curves,
/// optimization results and pricing scenarios.
///
/// The models are primarily data structures with minimal business logic,
/// separating the domain entities from the procedures that produce them.
pub mod models;

/// Interface traits for the pricing engine.
///
/// This module contains the "ports" the engine depends on without implementing,
/// most importantly the demand prediction capability used by the grid search.
/// Keeping these as traits decouples the optimizers from how or where a model
/// was trained and serialized.
pub mod ports;
