/// How the feasible price interval is derived from a baseline price.
///
/// The default multipliers (`0.2×` and `2.5×` the baseline) are tuning
/// constants rather than law, so they are configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PriceBounds {
    /// The lower bound as a fraction of the baseline price
    pub lower_multiplier: f64,
    /// The upper bound as a multiple of the baseline price
    pub upper_multiplier: f64,
    /// An absolute floor for the lower bound, keeping it strictly positive
    pub min_price: f64,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            lower_multiplier: 0.2,
            upper_multiplier: 2.5,
            min_price: 1e-4,
        }
    }
}

impl PriceBounds {
    /// The `(lower, upper)` interval around a baseline price
    pub fn around(&self, baseline: f64) -> (f64, f64) {
        (
            self.min_price.max(self.lower_multiplier * baseline),
            self.upper_multiplier * baseline,
        )
    }
}

/// An isoelastic demand curve `quantity(p) = A * p^-E`, calibrated to pass
/// through a baseline observation, together with the feasible price interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemandCurveParams {
    /// The demand scale `A`
    pub a: f64,
    /// The elasticity magnitude `E`
    pub elasticity: f64,
    /// The smallest admissible price
    pub price_lower_bound: f64,
    /// The largest admissible price
    pub price_upper_bound: f64,
}

impl DemandCurveParams {
    /// Calibrate the curve so that `quantity(p0) == q0`.
    ///
    /// The inputs are assumed to have been validated by the caller; this only
    /// checks that the resulting scale and bounds are usable.
    pub fn calibrate(
        p0: f64,
        q0: f64,
        elasticity: f64,
        bounds: &PriceBounds,
    ) -> Result<Self, CurveError> {
        let a = q0 * p0.powf(elasticity);
        if !(a.is_finite() && a > 0.0) {
            return Err(CurveError::Scale(a));
        }

        let (lower, upper) = bounds.around(p0);
        if !(lower.is_finite() && upper.is_finite() && 0.0 < lower && lower < upper) {
            return Err(CurveError::Bounds { lower, upper });
        }

        Ok(Self {
            a,
            elasticity,
            price_lower_bound: lower,
            price_upper_bound: upper,
        })
    }

    /// The demand predicted at `price`
    pub fn quantity(&self, price: f64) -> f64 {
        self.a * price.powf(-self.elasticity)
    }

    /// The after-tax unit margin at `price`, for ad-valorem `rate` and per-unit `cost`
    pub fn unit_margin(price: f64, rate: f64, cost: f64) -> f64 {
        (1.0 - rate) * price - cost
    }

    /// Total profit at `price`: unit margin times predicted demand
    pub fn profit(&self, price: f64, rate: f64, cost: f64) -> f64 {
        Self::unit_margin(price, rate, cost) * self.quantity(price)
    }

    /// Clip a price into the feasible interval
    pub fn clamp(&self, price: f64) -> f64 {
        price.clamp(self.price_lower_bound, self.price_upper_bound)
    }
}

/// Errors that can occur when calibrating a demand curve
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// The demand scale overflowed or vanished
    #[error("demand scale A = {0} is not a positive finite number")]
    Scale(f64),
    /// The feasible interval is empty, non-positive, or not finite
    #[error("price bounds [{lower}, {upper}] are not a positive, non-empty interval")]
    Bounds {
        /// The computed lower bound
        lower: f64,
        /// The computed upper bound
        upper: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_passes_through_baseline() {
        let curve = DemandCurveParams::calibrate(20.0, 50.0, 2.0, &PriceBounds::default()).unwrap();
        assert_eq!(curve.a, 20_000.0);
        assert_eq!(curve.price_lower_bound, 4.0);
        assert_eq!(curve.price_upper_bound, 50.0);
        assert!((curve.quantity(20.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn lower_bound_respects_floor() {
        let (lower, upper) = PriceBounds::default().around(1e-4);
        assert_eq!(lower, 1e-4);
        assert!((upper - 2.5e-4).abs() < 1e-18);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let bounds = PriceBounds {
            lower_multiplier: 3.0,
            upper_multiplier: 2.0,
            min_price: 1e-4,
        };
        assert!(matches!(
            DemandCurveParams::calibrate(10.0, 5.0, 1.5, &bounds),
            Err(CurveError::Bounds { .. })
        ));
    }

    #[test]
    fn overflowing_scale_is_rejected() {
        assert!(matches!(
            DemandCurveParams::calibrate(1e300, 5.0, 4.0, &PriceBounds::default()),
            Err(CurveError::Scale(_))
        ));
    }
}
