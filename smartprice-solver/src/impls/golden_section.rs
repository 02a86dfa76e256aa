use crate::PriceSearch;
use smartprice_core::models::DemandCurveParams;

// 1/φ, the fraction of the bracket kept at every step
const INV_PHI: f64 = 0.618_033_988_749_894_8;

/// Configuration for the golden-section search
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GoldenSectionSettings {
    /// A hard cap on the number of bracket reductions
    pub max_iterations: usize,
    /// Stop once the bracket is narrower than this fraction of its magnitude
    pub tolerance: f64,
}

impl Default for GoldenSectionSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
        }
    }
}

/// Solves the isoelastic program numerically.
///
/// The profit is unimodal in price, so shrinking a bracket by the golden ratio
/// converges to the maximum without any derivative information. The search is
/// capped at `max_iterations`, and the final interior point competes with both
/// bounds so that monotone objectives land exactly on a bound.
#[derive(Debug, Clone, Default)]
pub struct GoldenSection(GoldenSectionSettings);

impl PriceSearch for GoldenSection {
    type Settings = GoldenSectionSettings;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn maximize(&self, curve: &DemandCurveParams, rate: f64, cost: f64) -> f64 {
        let profit = |p: f64| curve.profit(p, rate, cost);
        let (lower, upper) = (curve.price_lower_bound, curve.price_upper_bound);

        let (mut a, mut b) = (lower, upper);
        let mut c = b - INV_PHI * (b - a);
        let mut d = a + INV_PHI * (b - a);
        let (mut fc, mut fd) = (profit(c), profit(d));

        let mut iterations = 0;
        while iterations < self.0.max_iterations && b - a > self.0.tolerance * (a.abs() + b.abs()) {
            if fc >= fd {
                b = d;
                d = c;
                fd = fc;
                c = b - INV_PHI * (b - a);
                fc = profit(c);
            } else {
                a = c;
                c = d;
                fc = fd;
                d = a + INV_PHI * (b - a);
                fd = profit(d);
            }
            iterations += 1;
        }
        tracing::trace!(iterations, width = b - a, "golden-section search finished");

        // The upper bound goes first so that a flat objective agrees with the closed form
        let interior = 0.5 * (a + b);
        [upper, interior, lower]
            .into_iter()
            .fold((f64::NAN, f64::NEG_INFINITY), |best, p| {
                let value = profit(p);
                if value > best.1 { (p, value) } else { best }
            })
            .0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartprice_core::models::PriceBounds;

    #[test]
    fn iteration_cap_is_respected() {
        // A single iteration cannot locate the optimum precisely, but must still
        // return a feasible price.
        let curve = DemandCurveParams::calibrate(20.0, 50.0, 2.0, &PriceBounds::default()).unwrap();
        let search = GoldenSection::new(GoldenSectionSettings {
            max_iterations: 1,
            tolerance: 0.0,
        });
        let p = search.maximize(&curve, 0.0, 10.0);
        assert!(curve.price_lower_bound <= p && p <= curve.price_upper_bound);
    }

    #[test]
    fn converges_to_interior_optimum() {
        let curve = DemandCurveParams::calibrate(20.0, 50.0, 3.0, &PriceBounds::default()).unwrap();
        let p = GoldenSection::default().maximize(&curve, 0.1, 12.0);
        // E*c / ((E-1)(1-r)) = 36 / 1.8
        assert!((p - 20.0).abs() < 1e-5);
    }
}
