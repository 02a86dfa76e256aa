mod curve;
mod elasticity;
mod features;
mod map;
mod observation;
mod outcome;
mod scenario;
mod segment;

pub use curve::{CurveError, DemandCurveParams, PriceBounds};
pub use elasticity::{
    Elasticity, ElasticityMap, ElasticitySegment, SummaryRecord, UndefinedReason,
};
pub use features::FeatureRecord;
pub use map::Map;
pub use observation::Observation;
pub use outcome::{GridRecommendation, OptimizationResult};
pub use scenario::{PricingScenario, default_base_price, seasonality_index};
pub use segment::SegmentKey;
