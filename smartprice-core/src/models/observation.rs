use super::{Map, SegmentKey};

/// One historical sale, as read from the sales history.
///
/// A valid observation has `price > 0` and a non-negative, integer-valued
/// `quantity`. Records that break this are still representable so that the
/// estimator can exclude them explicitly rather than fail on them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    /// The unit price the sale was made at
    pub price: f64,
    /// The number of units sold
    pub quantity: f64,
    /// The segment this sale belongs to
    pub segment: SegmentKey,
    /// Any contextual numeric features carried alongside the sale
    #[cfg_attr(feature = "serde", serde(default))]
    pub features: Map<String, f64>,
}

impl Observation {
    /// Create an observation with no contextual features
    pub fn new(price: f64, quantity: f64, segment: SegmentKey) -> Self {
        Self {
            price,
            quantity,
            segment,
            features: Map::default(),
        }
    }

    /// Whether this record can serve as evidence for an elasticity fit
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0 && self.quantity.is_finite() && self.quantity >= 0.0
    }
}
