use smartprice_core::{
    models::{GridRecommendation, PricingScenario},
    ports::DemandPredictor,
};

/// Configuration for the grid search
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GridSettings {
    /// The largest grid a scenario may request
    pub max_points: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            max_points: 100_000,
        }
    }
}

/// Recommends a price by sweeping a grid of candidates against a demand model.
///
/// Each candidate is scored by `(price - unit_cost) * max(0, predicted_quantity)`;
/// the first candidate (in ascending price order) with the highest score wins.
#[derive(Debug, Clone, Default)]
pub struct GridSearchOptimizer {
    settings: GridSettings,
}

impl GridSearchOptimizer {
    /// Create an optimizer with the provided settings
    pub fn new(settings: GridSettings) -> Self {
        Self { settings }
    }

    /// Find the most profitable candidate price for the scenario.
    ///
    /// Fails with [`GridSearchError::ModelUnavailable`] before evaluating
    /// anything if the predictor is not usable, and with
    /// [`GridSearchError::InvalidInput`] if the scenario is malformed.
    pub fn optimize<P: DemandPredictor + ?Sized>(
        &self,
        scenario: &PricingScenario,
        predictor: &P,
    ) -> Result<GridRecommendation, GridSearchError> {
        if !predictor.is_available() {
            return Err(GridSearchError::ModelUnavailable);
        }
        self.validate(scenario)?;

        let mut best: Option<(f64, f64, f64)> = None;
        let mut range: Option<(f64, f64)> = None;
        for price in linspace(scenario.min_price, scenario.max_price, scenario.num_points) {
            // candidates ascend, so the first and last seen bound the grid
            range = Some(range.map_or((price, price), |(low, _)| (low, price)));

            // f64::max discards NaN, so an undefined prediction counts as no demand
            let quantity = predictor.predict(&scenario.features_at(price)).max(0.0);
            let profit = (price - scenario.unit_cost) * quantity;
            tracing::trace!(price, quantity, profit, "evaluated candidate");

            // Strict comparison keeps the first of any tied candidates
            if best.is_none_or(|(_, _, incumbent)| profit > incumbent) {
                best = Some((price, quantity, profit));
            }
        }

        // validate() guarantees at least one candidate
        let empty = GridSearchError::InvalidInput {
            field: "num_points",
            value: 0.0,
            reason: "the grid is empty",
        };
        let ((price, quantity, profit), (grid_min, grid_max)) =
            best.zip(range).ok_or(empty)?;

        tracing::info!(
            product_type = %scenario.product_type,
            customer_type = %scenario.customer_type,
            price,
            quantity,
            profit,
            "grid search complete"
        );

        Ok(GridRecommendation {
            recommended_price: price,
            expected_quantity: quantity,
            expected_profit: profit,
            price_grid_min: grid_min,
            price_grid_max: grid_max,
            num_grid_points: scenario.num_points,
        })
    }

    fn validate(&self, scenario: &PricingScenario) -> Result<(), GridSearchError> {
        use GridSearchError::InvalidInput;

        let finite = [
            ("competitor_price", scenario.competitor_price),
            ("unit_cost", scenario.unit_cost),
            ("marketing_spend", scenario.marketing_spend),
            ("economic_index", scenario.economic_index),
            ("trend_index", scenario.trend_index),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(InvalidInput {
                    field,
                    value,
                    reason: "must be finite",
                });
            }
        }

        let base_price = scenario.resolved_base_price();
        if !(base_price.is_finite() && base_price > 0.0) {
            return Err(InvalidInput {
                field: "base_price",
                value: base_price,
                reason: "must be positive and finite",
            });
        }
        if !(1..=12).contains(&scenario.month) {
            return Err(InvalidInput {
                field: "month",
                value: scenario.month.into(),
                reason: "must be between 1 and 12",
            });
        }
        if scenario.day_of_week > 6 {
            return Err(InvalidInput {
                field: "day_of_week",
                value: scenario.day_of_week.into(),
                reason: "must be between 0 and 6",
            });
        }
        if !(scenario.min_price.is_finite() && scenario.min_price > 0.0) {
            return Err(InvalidInput {
                field: "min_price",
                value: scenario.min_price,
                reason: "must be positive and finite",
            });
        }
        if !(scenario.max_price.is_finite() && scenario.max_price >= scenario.min_price) {
            return Err(InvalidInput {
                field: "max_price",
                value: scenario.max_price,
                reason: "must be finite and no less than min_price",
            });
        }
        if scenario.num_points == 0 || scenario.num_points > self.settings.max_points {
            return Err(InvalidInput {
                field: "num_points",
                value: scenario.num_points as f64,
                reason: "must be between 1 and the configured maximum",
            });
        }
        Ok(())
    }
}

/// `n` evenly spaced values from `min` to `max` inclusive.
///
/// A single point grid is `[min]`; the last point of a longer grid is exactly `max`.
pub fn linspace(min: f64, max: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        (max - min) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |i| {
        if n > 1 && i == n - 1 {
            max
        } else {
            min + step * i as f64
        }
    })
}

/// Errors that can occur during a grid search
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum GridSearchError {
    /// The demand model is not loaded or not fitted
    #[error("demand model is unavailable")]
    ModelUnavailable,
    /// A scenario field violates its precondition
    #[error("invalid {field} ({value}): {reason}")]
    InvalidInput {
        /// The offending field
        field: &'static str,
        /// Its value
        value: f64,
        /// The violated precondition
        reason: &'static str,
    },
}
