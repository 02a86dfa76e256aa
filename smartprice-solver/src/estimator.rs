use smartprice_core::models::{
    Elasticity, ElasticityMap, ElasticitySegment, Map, Observation, SegmentKey, UndefinedReason,
};
use std::{fmt, str::FromStr};

// Matches the absolute tolerance used to decide that a variance is "zero".
const VARIANCE_EPSILON: f64 = 1e-8;

/// The admissible range for the *signed* log-log slope.
///
/// The slope is clipped into `[low, high]` before its absolute value is
/// stored, so the stored magnitude never exceeds `max(|low|, |high|)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipRange {
    /// The most negative slope admitted
    pub low: f64,
    /// The most positive slope admitted
    pub high: f64,
}

impl Default for ClipRange {
    fn default() -> Self {
        Self {
            low: -5.0,
            high: 1.0,
        }
    }
}

impl fmt::Display for ClipRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.low, self.high)
    }
}

// Parses the "min,max" form used on the command line
impl FromStr for ClipRange {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split(',').map(str::trim);
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(low), Some(high), None) => {
                let parse = |x: &str| {
                    x.parse::<f64>()
                        .map_err(|_| EstimatorError::ClipFormat(s.to_owned()))
                };
                Ok(Self {
                    low: parse(low)?,
                    high: parse(high)?,
                })
            }
            _ => Err(EstimatorError::ClipFormat(s.to_owned())),
        }
    }
}

/// Configuration for the elasticity estimator
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EstimatorSettings {
    /// The smallest segment that will be fitted
    pub min_samples: usize,
    /// The admissible range for the signed slope
    pub clip: ClipRange,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            min_samples: 100,
            clip: ClipRange::default(),
        }
    }
}

/// Estimates price elasticity per segment from historical observations.
///
/// For every segment with enough usable observations, the estimator fits an
/// ordinary least squares line of `ln(quantity + 1)` on `ln(price)` and stores
/// the negated, clipped slope as the elasticity magnitude.
#[derive(Debug, Clone)]
pub struct ElasticityEstimator {
    settings: EstimatorSettings,
}

impl Default for ElasticityEstimator {
    fn default() -> Self {
        Self {
            settings: EstimatorSettings::default(),
        }
    }
}

impl ElasticityEstimator {
    /// Create an estimator, validating the settings
    pub fn new(settings: EstimatorSettings) -> Result<Self, EstimatorError> {
        if settings.min_samples < 2 {
            return Err(EstimatorError::MinSamples(settings.min_samples));
        }
        let ClipRange { low, high } = settings.clip;
        if !(low.is_finite() && high.is_finite() && low <= high) {
            return Err(EstimatorError::Clip { low, high });
        }
        Ok(Self { settings })
    }

    /// The settings in use
    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    /// Estimate the elasticity of every segment present in `observations`.
    ///
    /// Observations with a non-positive price (or an otherwise unusable
    /// price/quantity) are excluded before grouping. Segments made up solely of
    /// such observations do not appear in the result.
    pub fn estimate<'a, I: IntoIterator<Item = &'a Observation>>(
        &self,
        observations: I,
    ) -> ElasticityMap {
        let mut excluded = 0usize;
        let mut groups = Map::<&SegmentKey, Vec<(f64, f64)>>::default();

        for observation in observations {
            if !observation.is_valid() {
                excluded += 1;
                continue;
            }
            groups
                .entry(&observation.segment)
                .or_default()
                .push((observation.price.ln(), observation.quantity.ln_1p()));
        }

        if excluded > 0 {
            tracing::debug!(excluded, "excluded invalid observations before grouping");
        }

        let map = ElasticityMap::new(
            groups
                .into_iter()
                .map(|(key, points)| self.estimate_segment(key.clone(), &points)),
        );

        tracing::info!(
            segments = map.len(),
            defined = map.iter().filter(|s| s.elasticity.is_defined()).count(),
            "estimated segment elasticities"
        );

        map
    }

    /// Estimate a single segment from its `(ln price, ln(quantity + 1))` pairs
    pub fn estimate_segment(&self, key: SegmentKey, points: &[(f64, f64)]) -> ElasticitySegment {
        let samples = points.len();

        let elasticity = if samples < self.settings.min_samples {
            Elasticity::Undefined(UndefinedReason::InsufficientData {
                samples,
                required: self.settings.min_samples,
            })
        } else if let Some(slope) = log_log_slope(points) {
            let ClipRange { low, high } = self.settings.clip;
            Elasticity::Estimated(slope.clamp(low, high).abs())
        } else {
            Elasticity::Undefined(UndefinedReason::DegenerateFit)
        };

        match elasticity {
            Elasticity::Estimated(magnitude) => {
                tracing::debug!(segment = %key, samples, magnitude, "fitted segment");
            }
            Elasticity::Undefined(reason) => {
                tracing::warn!(segment = %key, samples, %reason, "segment elasticity undefined");
            }
        }

        ElasticitySegment {
            key,
            elasticity,
            samples,
        }
    }
}

/// The least squares slope of y on x (with intercept), or None if either
/// variable has no variance.
pub fn log_log_slope(points: &[(f64, f64)]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    let (mx, my) = (sx / n, sy / n);

    // A second, centered pass keeps the moments accurate when the logs are large
    let (sxx, syy, sxy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (x, y)| {
        let (dx, dy) = (x - mx, y - my);
        (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
    });

    if sxx / n <= VARIANCE_EPSILON || syy / n <= VARIANCE_EPSILON {
        None
    } else {
        let slope = sxy / sxx;
        slope.is_finite().then_some(slope)
    }
}

/// Errors that can occur when configuring the estimator
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum EstimatorError {
    /// A regression needs at least two observations
    #[error("min_samples must be at least 2, got {0}")]
    MinSamples(usize),
    /// The clip range is empty or not finite
    #[error("clip range [{low}, {high}] must be finite with low <= high")]
    Clip {
        /// The requested lower end
        low: f64,
        /// The requested upper end
        high: f64,
    },
    /// The clip range could not be parsed
    #[error("clip range must be given as 'min,max', got '{0}'")]
    ClipFormat(String),
}
