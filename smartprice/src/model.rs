use serde::{Deserialize, Serialize};
use smartprice_core::{
    models::{FeatureRecord, Map},
    ports::DemandPredictor,
};
use std::{fs::File, io::BufReader, path::Path};

/// One standardized numeric term: contributes `weight * (x - mean) / scale`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericTerm {
    pub weight: f64,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "unit")]
    pub scale: f64,
}

fn unit() -> f64 {
    1.0
}

/// The exported parameters of a linear demand model trained elsewhere.
///
/// Numeric features are standardized before weighting; categorical features are
/// one-hot encoded, so each known level carries its own weight and an unknown
/// level contributes nothing. A model with no coefficients at all has not been
/// fitted and reports itself unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearDemandModel {
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub numeric: Map<String, NumericTerm>,
    #[serde(default)]
    pub categorical: Map<String, Map<String, f64>>,
}

impl LinearDemandModel {
    /// Read a model artifact, validating its feature names.
    ///
    /// A missing file yields an unfitted model, which the grid search rejects
    /// before evaluating any price.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "no demand model found; it must be trained first");
            return Ok(Self::default());
        }
        let model: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        model.validate()?;
        Ok(model)
    }

    /// Check that every coefficient names a known feature
    pub fn validate(&self) -> Result<(), ModelError> {
        let blank = FeatureRecord::default();
        if let Some(name) = self.numeric.keys().find(|name| blank.numeric(name).is_none()) {
            return Err(ModelError::UnknownNumeric(name.clone()));
        }
        if let Some(name) = self
            .categorical
            .keys()
            .find(|name| blank.categorical(name).is_none())
        {
            return Err(ModelError::UnknownCategorical(name.clone()));
        }
        Ok(())
    }
}

impl DemandPredictor for LinearDemandModel {
    fn is_available(&self) -> bool {
        !(self.numeric.is_empty() && self.categorical.is_empty())
    }

    fn predict(&self, features: &FeatureRecord) -> f64 {
        let numeric = self.numeric.iter().map(|(name, term)| {
            let x = features.numeric(name).unwrap_or(term.mean);
            let scale = if term.scale == 0.0 { 1.0 } else { term.scale };
            term.weight * (x - term.mean) / scale
        });
        let categorical = self.categorical.iter().map(|(name, levels)| {
            features
                .categorical(name)
                .and_then(|level| levels.get(level.as_ref()).copied())
                .unwrap_or(0.0)
        });
        self.intercept + numeric.sum::<f64>() + categorical.sum::<f64>()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Unknown numeric feature in model: {0}")]
    UnknownNumeric(String),
    #[error("Unknown categorical feature in model: {0}")]
    UnknownCategorical(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use smartprice_core::models::PricingScenario;

    fn model() -> LinearDemandModel {
        serde_json::from_value(serde_json::json!({
            "intercept": 100.0,
            "numeric": {
                "price": {"weight": -10.0, "mean": 50.0, "scale": 25.0},
                "promotion_flag": {"weight": 4.0},
                "trend_index": {"weight": 2.0, "mean": 0.5, "scale": 0.0}
            },
            "categorical": {
                "customer_type": {"Academia": 5.0, "Pharma": -3.0},
                "month": {"6": 1.5}
            }
        }))
        .unwrap()
    }

    #[test]
    fn predicts_standardized_linear_combination() {
        let scenario = PricingScenario::new("Reagent", "Academia", 80.0, 20.0);
        let model = model();
        model.validate().unwrap();

        // 100 - 10 * (75 - 50) / 25 + 0 + 2 * (0.5 - 0.5) + 5 + 1.5
        assert_abs_diff_eq!(model.predict(&scenario.features_at(75.0)), 96.5, epsilon = 1e-12);

        let promoted = PricingScenario {
            promotion_flag: true,
            ..scenario
        };
        assert_abs_diff_eq!(model.predict(&promoted.features_at(75.0)), 100.5, epsilon = 1e-12);
    }

    #[test]
    fn unknown_levels_contribute_nothing() {
        let scenario = PricingScenario::new("Reagent", "Government", 80.0, 20.0);
        // 100 - 10 * (50 - 50) / 25 + 1.5
        assert_abs_diff_eq!(model().predict(&scenario.features_at(50.0)), 101.5, epsilon = 1e-12);
    }

    #[test]
    fn empty_model_is_unavailable() {
        assert!(!LinearDemandModel::default().is_available());
        assert!(model().is_available());
        assert!(
            !LinearDemandModel::load(Path::new("/nonexistent/model.json"))
                .unwrap()
                .is_available()
        );
    }

    #[test]
    fn unknown_features_are_rejected() {
        let mut model = model();
        model.numeric.insert(
            "shoe_size".to_owned(),
            NumericTerm {
                weight: 1.0,
                mean: 0.0,
                scale: 1.0,
            },
        );
        assert!(matches!(model.validate(), Err(ModelError::UnknownNumeric(name)) if name == "shoe_size"));
    }
}
