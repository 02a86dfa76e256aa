use super::FeatureRecord;
use std::f64::consts::PI;

/// The deterministic seasonal effect of a calendar month (1 to 12).
pub fn seasonality_index(month: u32) -> f64 {
    let phase = 2.0 * PI * (f64::from(month) - 1.0) / 12.0;
    0.15 * phase.sin() + 0.05 * phase.cos()
}

/// The list price used to normalize the price gap for known product types.
pub fn default_base_price(product_type: &str) -> Option<f64> {
    match product_type {
        "Diagnostic Kit" => Some(180.0),
        "Reagent" => Some(75.0),
        "Instrument" => Some(2500.0),
        "Consumable" => Some(30.0),
        "Assay Panel" => Some(400.0),
        _ => None,
    }
}

/// Everything the grid search needs to know about a single pricing decision.
///
/// Used once and not persisted. Fields left out of a serialized scenario take
/// the defaults of [`PricingScenario::default`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PricingScenario {
    /// Product segment label
    pub product_type: String,
    /// Customer segment label
    pub customer_type: String,
    /// The competitor's price for a comparable product
    pub competitor_price: f64,
    /// Variable cost of one unit
    pub unit_cost: f64,
    /// Whether a promotion is running
    pub promotion_flag: bool,
    /// Marketing spend over the period
    pub marketing_spend: f64,
    /// A macroeconomic indicator
    pub economic_index: f64,
    /// Calendar month, 1 to 12
    pub month: u32,
    /// Day of week, Monday = 0
    pub day_of_week: u32,
    /// Long-run trend indicator
    pub trend_index: f64,
    /// The list price used to normalize the price gap, if known
    pub base_price: Option<f64>,
    /// The smallest candidate price
    pub min_price: f64,
    /// The largest candidate price
    pub max_price: f64,
    /// The number of evenly spaced candidates
    pub num_points: usize,
}

impl Default for PricingScenario {
    fn default() -> Self {
        Self {
            product_type: String::new(),
            customer_type: String::new(),
            competitor_price: 0.0,
            unit_cost: 0.0,
            promotion_flag: false,
            marketing_spend: 80_000.0,
            economic_index: 0.0,
            month: 6,
            day_of_week: 2,
            trend_index: 0.5,
            base_price: None,
            min_price: 1.0,
            max_price: 5000.0,
            num_points: 200,
        }
    }
}

impl PricingScenario {
    /// A scenario with the given segment, competitor price and unit cost, and
    /// defaults everywhere else
    pub fn new(
        product_type: impl Into<String>,
        customer_type: impl Into<String>,
        competitor_price: f64,
        unit_cost: f64,
    ) -> Self {
        Self {
            product_type: product_type.into(),
            customer_type: customer_type.into(),
            competitor_price,
            unit_cost,
            ..Default::default()
        }
    }

    /// The base price used for the price gap: the explicit value if given,
    /// otherwise the product's list price, otherwise `max(1, competitor_price)`.
    pub fn resolved_base_price(&self) -> f64 {
        self.base_price
            .or_else(|| default_base_price(&self.product_type))
            .unwrap_or_else(|| self.competitor_price.max(1.0))
    }

    /// Build the predictor's feature record for a candidate price
    pub fn features_at(&self, price: f64) -> FeatureRecord {
        FeatureRecord {
            product_type: self.product_type.clone(),
            customer_type: self.customer_type.clone(),
            price,
            competitor_price: self.competitor_price,
            price_gap: (self.competitor_price - price) / self.resolved_base_price(),
            promotion_flag: self.promotion_flag,
            marketing_spend: self.marketing_spend,
            economic_index: self.economic_index,
            seasonality_index: seasonality_index(self.month),
            trend_index: self.trend_index,
            day_of_week: self.day_of_week,
            month: self.month,
        }
    }
}
