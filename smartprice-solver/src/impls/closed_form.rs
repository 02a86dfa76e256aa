use crate::PriceSearch;
use smartprice_core::models::DemandCurveParams;

/// Solves the isoelastic program analytically.
///
/// Setting the derivative of `((1-r)p - c) * A * p^-E` to zero gives a single
/// stationary point `p* = E*c / ((E-1)(1-r))` when `E > 1`, which is the
/// global maximum on the positive reals; clipping it into the bounds gives the
/// constrained maximum. When `E <= 1` the profit is non-decreasing in price on
/// the whole interval, so the upper bound is optimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedForm;

impl PriceSearch for ClosedForm {
    type Settings = ();

    fn new(_: Self::Settings) -> Self {
        Self
    }

    fn maximize(&self, curve: &DemandCurveParams, rate: f64, cost: f64) -> f64 {
        let e = curve.elasticity;
        if e > 1.0 {
            curve.clamp(e * cost / ((e - 1.0) * (1.0 - rate)))
        } else {
            curve.price_upper_bound
        }
    }
}
