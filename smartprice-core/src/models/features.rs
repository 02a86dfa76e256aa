use std::borrow::Cow;

/// The feature record handed to a demand predictor.
///
/// This is the contract an externally trained model must honor: the two
/// segment labels plus the numeric context of a single candidate price.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureRecord {
    /// Product segment label
    pub product_type: String,
    /// Customer segment label
    pub customer_type: String,
    /// The candidate price
    pub price: f64,
    /// The competitor's price for a comparable product
    pub competitor_price: f64,
    /// `(competitor_price - price) / base_price`
    pub price_gap: f64,
    /// Whether a promotion is running
    pub promotion_flag: bool,
    /// Marketing spend over the period
    pub marketing_spend: f64,
    /// A macroeconomic indicator
    pub economic_index: f64,
    /// Deterministic seasonal effect of the calendar month
    pub seasonality_index: f64,
    /// Long-run trend indicator
    pub trend_index: f64,
    /// Day of week, Monday = 0
    pub day_of_week: u32,
    /// Calendar month, 1 to 12
    pub month: u32,
}

impl FeatureRecord {
    /// Look up a numeric feature by its column name
    pub fn numeric(&self, name: &str) -> Option<f64> {
        Some(match name {
            "price" => self.price,
            "competitor_price" => self.competitor_price,
            "price_gap" => self.price_gap,
            "promotion_flag" => f64::from(u8::from(self.promotion_flag)),
            "marketing_spend" => self.marketing_spend,
            "economic_index" => self.economic_index,
            "seasonality_index" => self.seasonality_index,
            "trend_index" => self.trend_index,
            "day_of_week" => f64::from(self.day_of_week),
            "month" => f64::from(self.month),
            _ => return None,
        })
    }

    /// Look up a feature by its column name, rendered as a category label.
    ///
    /// Calendar fields are valid categories as well as numbers.
    pub fn categorical(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "product_type" => Some(Cow::Borrowed(&self.product_type)),
            "customer_type" => Some(Cow::Borrowed(&self.customer_type)),
            "day_of_week" => Some(Cow::Owned(self.day_of_week.to_string())),
            "month" => Some(Cow::Owned(self.month.to_string())),
            "promotion_flag" => Some(Cow::Owned(u8::from(self.promotion_flag).to_string())),
            _ => None,
        }
    }
}
