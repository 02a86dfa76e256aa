use crate::{ClosedForm, GoldenSectionSettings};
use smartprice_core::models::{CurveError, DemandCurveParams, OptimizationResult, PriceBounds};

/// The PriceSearch trait defines the interface for maximizing profit along a
/// calibrated isoelastic demand curve.
///
/// The objective `((1-r)p - c) * A * p^-E` is unimodal in `p`, so an
/// implementation is free to solve it analytically or by bracketing. Either way
/// it must return a price inside the curve's bounds in bounded time.
pub trait PriceSearch {
    /// The configuration type for this search
    type Settings;

    /// Create a new instance with the provided settings
    fn new(settings: Self::Settings) -> Self;

    /// The price in `[price_lower_bound, price_upper_bound]` maximizing profit
    /// for ad-valorem `rate` and per-unit `cost`
    fn maximize(&self, curve: &DemandCurveParams, rate: f64, cost: f64) -> f64;
}

/// Configuration shared by the isoelastic optimizers
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct IsoelasticSettings {
    /// How the feasible interval is derived from the baseline price
    pub bounds: PriceBounds,
    /// Settings for the numerical search, when it is used
    pub golden_section: GoldenSectionSettings,
}

/// The baseline a single optimization is calibrated from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// The observed price `p0`
    pub price: f64,
    /// The observed (or predicted) quantity `q0` at that price
    pub quantity: f64,
    /// The elasticity magnitude `E`
    pub elasticity: f64,
    /// The ad-valorem tax rate `r`
    pub ad_valorem_rate: f64,
    /// The per-unit cost `c0`
    pub per_unit_cost: f64,
}

impl Baseline {
    /// A baseline with no tax and no per-unit cost
    pub fn new(price: f64, quantity: f64, elasticity: f64) -> Self {
        Self {
            price,
            quantity,
            elasticity,
            ad_valorem_rate: 0.0,
            per_unit_cost: 0.0,
        }
    }

    /// Check every precondition, failing on the first violation
    pub fn validate(&self) -> Result<(), IsoelasticError> {
        let checks = [
            ("price", self.price, self.price > 0.0, "must be positive"),
            ("quantity", self.quantity, self.quantity > 0.0, "must be positive"),
            ("elasticity", self.elasticity, self.elasticity > 0.0, "must be positive"),
            (
                "ad_valorem_rate",
                self.ad_valorem_rate,
                (0.0..1.0).contains(&self.ad_valorem_rate),
                "must lie in [0, 1)",
            ),
            (
                "per_unit_cost",
                self.per_unit_cost,
                self.per_unit_cost >= 0.0,
                "must be non-negative",
            ),
        ];

        for (field, value, ok, reason) in checks {
            if !value.is_finite() {
                return Err(IsoelasticError::InvalidInput {
                    field,
                    value,
                    reason: "must be finite",
                });
            }
            if !ok {
                return Err(IsoelasticError::InvalidInput {
                    field,
                    value,
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// A solved optimization: the calibrated curve and the optimum found on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// The demand curve the optimum was found on
    pub curve: DemandCurveParams,
    /// The optimum
    pub result: OptimizationResult,
}

/// Finds the profit-maximizing price on an isoelastic demand curve calibrated
/// from a single baseline observation.
#[derive(Debug, Clone)]
pub struct IsoelasticOptimizer<S = ClosedForm> {
    bounds: PriceBounds,
    search: S,
}

impl<S: PriceSearch + Default> Default for IsoelasticOptimizer<S> {
    fn default() -> Self {
        Self {
            bounds: PriceBounds::default(),
            search: S::default(),
        }
    }
}

impl<S: PriceSearch> IsoelasticOptimizer<S> {
    /// Create an optimizer with the given bounds policy and search strategy
    pub fn new(bounds: PriceBounds, search: S) -> Self {
        Self { bounds, search }
    }

    /// The bounds policy in use
    pub fn bounds(&self) -> &PriceBounds {
        &self.bounds
    }

    /// Solve for the baseline.
    ///
    /// All preconditions are checked before any computation, and the calibrated
    /// bounds are checked before the search runs.
    pub fn optimize(&self, baseline: &Baseline) -> Result<Solution, IsoelasticError> {
        baseline.validate()?;

        let curve = DemandCurveParams::calibrate(
            baseline.price,
            baseline.quantity,
            baseline.elasticity,
            &self.bounds,
        )?;

        let (rate, cost) = (baseline.ad_valorem_rate, baseline.per_unit_cost);
        let price = self.search.maximize(&curve, rate, cost);
        let quantity = curve.quantity(price);
        let unit_margin = DemandCurveParams::unit_margin(price, rate, cost);

        Ok(Solution {
            curve,
            result: OptimizationResult {
                optimal_price: price,
                optimal_quantity: quantity,
                unit_margin,
                total_profit: unit_margin * quantity,
            },
        })
    }
}

/// Errors that can occur when optimizing a single baseline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IsoelasticError {
    /// A numeric precondition was violated
    #[error("invalid {field} ({value}): {reason}")]
    InvalidInput {
        /// The offending field
        field: &'static str,
        /// Its value
        value: f64,
        /// The violated precondition
        reason: &'static str,
    },
    /// The baseline calibrated to an unusable curve
    #[error("invalid demand curve: {0}")]
    Curve(#[from] CurveError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_reports_first_violation() {
        let baseline = Baseline {
            ad_valorem_rate: 1.0,
            per_unit_cost: -1.0,
            ..Baseline::new(10.0, 5.0, 2.0)
        };
        assert_eq!(
            baseline.validate().unwrap_err(),
            IsoelasticError::InvalidInput {
                field: "ad_valorem_rate",
                value: 1.0,
                reason: "must lie in [0, 1)"
            }
        );
    }

    #[test]
    fn non_finite_inputs_are_invalid() {
        let baseline = Baseline::new(f64::INFINITY, 5.0, 2.0);
        assert!(matches!(
            baseline.validate(),
            Err(IsoelasticError::InvalidInput { field: "price", .. })
        ));
    }

    #[test]
    fn degenerate_bounds_are_rejected_before_search() {
        let optimizer = IsoelasticOptimizer::new(
            PriceBounds {
                lower_multiplier: 1.0,
                upper_multiplier: 1.0,
                min_price: 1e-4,
            },
            ClosedForm,
        );
        assert!(matches!(
            optimizer.optimize(&Baseline::new(10.0, 5.0, 2.0)),
            Err(IsoelasticError::Curve(CurveError::Bounds { .. }))
        ));
    }

    #[test]
    fn inelastic_demand_prices_at_upper_bound() {
        let optimizer = IsoelasticOptimizer::<ClosedForm>::default();
        let solution = optimizer
            .optimize(&Baseline {
                per_unit_cost: 2.0,
                ..Baseline::new(10.0, 100.0, 0.5)
            })
            .unwrap();
        assert_eq!(solution.result.optimal_price, 25.0);
    }
}
