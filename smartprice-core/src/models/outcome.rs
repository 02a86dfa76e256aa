/// The profit-maximizing price for a row or scenario, along with the demand,
/// margin and profit it implies.
///
/// A row that could not be solved carries an *undefined* result, in which
/// every field is NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult {
    /// The price maximizing total profit
    pub optimal_price: f64,
    /// The demand predicted at the optimal price
    pub optimal_quantity: f64,
    /// The after-tax margin per unit at the optimal price
    pub unit_margin: f64,
    /// Unit margin times quantity
    pub total_profit: f64,
}

impl OptimizationResult {
    /// The all-undefined result
    pub const UNDEFINED: Self = Self {
        optimal_price: f64::NAN,
        optimal_quantity: f64::NAN,
        unit_margin: f64::NAN,
        total_profit: f64::NAN,
    };

    /// Whether every field is undefined
    pub fn is_undefined(&self) -> bool {
        self.optimal_price.is_nan()
            && self.optimal_quantity.is_nan()
            && self.unit_margin.is_nan()
            && self.total_profit.is_nan()
    }

    /// The fields in output-column order
    pub fn values(&self) -> [f64; 4] {
        [
            self.optimal_price,
            self.optimal_quantity,
            self.unit_margin,
            self.total_profit,
        ]
    }
}

/// The outcome of a grid search over candidate prices.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRecommendation {
    /// The winning candidate price
    pub recommended_price: f64,
    /// The (non-negative) demand predicted at the winning price
    pub expected_quantity: f64,
    /// The profit at the winning price
    pub expected_profit: f64,
    /// The smallest price on the grid
    pub price_grid_min: f64,
    /// The largest price on the grid
    pub price_grid_max: f64,
    /// The number of candidates evaluated
    pub num_grid_points: usize,
}
