use crate::models::FeatureRecord;

/// Interface for a fitted demand model.
///
/// The engine never trains or inspects a model; it only asks for the quantity
/// demanded under a given feature record. Any type exposing this capability,
/// including a plain closure, can drive the grid search.
pub trait DemandPredictor {
    /// Whether the model is loaded and fitted. The grid search refuses to run
    /// against an unavailable predictor.
    fn is_available(&self) -> bool {
        true
    }

    /// Predict the quantity demanded. The value may be negative or NaN; callers
    /// are responsible for flooring it.
    fn predict(&self, features: &FeatureRecord) -> f64;
}

impl<F: Fn(&FeatureRecord) -> f64> DemandPredictor for F {
    fn predict(&self, features: &FeatureRecord) -> f64 {
        self(features)
    }
}
