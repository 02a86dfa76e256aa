use super::{Map, SegmentKey};

/// The price elasticity of a segment, stored as a magnitude.
///
/// Demand is assumed downward-sloping, so a positive magnitude carries the
/// expected sign. `Undefined` is a distinct outcome and must never be read as
/// zero elasticity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Elasticity {
    /// A fitted magnitude, already clipped into the configured range
    Estimated(f64),
    /// No magnitude could be estimated for the segment
    Undefined(UndefinedReason),
}

impl Elasticity {
    /// The estimated magnitude, if there is one
    pub fn magnitude(&self) -> Option<f64> {
        match self {
            Self::Estimated(e) => Some(*e),
            Self::Undefined(_) => None,
        }
    }

    /// Whether a magnitude was estimated
    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Estimated(_))
    }
}

/// Why a segment has no elasticity estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UndefinedReason {
    /// Fewer observations than the configured minimum
    #[error("insufficient data: {samples} samples, at least {required} required")]
    InsufficientData {
        /// The number of usable observations in the segment
        samples: usize,
        /// The configured minimum
        required: usize,
    },
    /// Log price or log quantity has no variance, so the slope is undefined
    #[error("degenerate fit: no variance in log price or log quantity")]
    DegenerateFit,
}

/// The elasticity estimate for a single segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticitySegment {
    /// The segment this estimate applies to
    pub key: SegmentKey,
    /// The estimate itself
    pub elasticity: Elasticity,
    /// The number of observations the estimate was computed from
    pub samples: usize,
}

/// An immutable mapping from segment key to its elasticity estimate.
///
/// Built once per estimation call, iterated in ascending key order, and passed
/// explicitly to whatever needs to join elasticity back onto rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElasticityMap(Map<SegmentKey, ElasticitySegment>);

impl ElasticityMap {
    /// Collect segment estimates into a map ordered by key
    pub fn new<I: IntoIterator<Item = ElasticitySegment>>(segments: I) -> Self {
        Self(
            segments
                .into_iter()
                .map(|segment| (segment.key.clone(), segment))
                .collect::<Map<_, _>>()
                .sorted(),
        )
    }

    /// Look up the estimate for a segment
    pub fn get(&self, key: &SegmentKey) -> Option<&ElasticitySegment> {
        self.0.get(key)
    }

    /// The elasticity magnitude for a segment, or None if the segment is
    /// unknown or its elasticity is undefined
    pub fn magnitude(&self, key: &SegmentKey) -> Option<f64> {
        self.get(key).and_then(|segment| segment.elasticity.magnitude())
    }

    /// The number of distinct segments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no segments were seen at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the segments in key order
    pub fn iter(&self) -> impl Iterator<Item = &ElasticitySegment> {
        self.0.values()
    }

    /// Produce the joinable summary artifact, one record per segment.
    ///
    /// `columns` names the segment key fields in key order. Labels beyond the
    /// number of names given are dropped.
    pub fn summary<S: AsRef<str>>(&self, columns: &[S]) -> Vec<SummaryRecord> {
        self.iter()
            .map(|segment| SummaryRecord {
                segment: columns
                    .iter()
                    .map(|column| column.as_ref().to_owned())
                    .zip(segment.key.labels().iter().cloned())
                    .collect(),
                price_elasticity: segment.elasticity.magnitude(),
            })
            .collect()
    }
}

/// One record of the elasticity summary: the segment's key fields by name,
/// plus its elasticity magnitude (absent when undefined).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryRecord {
    /// Segment column name to label
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub segment: Map<String, String>,
    /// The elasticity magnitude
    pub price_elasticity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(labels: [&str; 2], elasticity: Elasticity) -> ElasticitySegment {
        ElasticitySegment {
            key: SegmentKey::new(labels),
            elasticity,
            samples: 120,
        }
    }

    #[test]
    fn map_is_sorted_by_key() {
        let map = ElasticityMap::new([
            segment(["Reagent", "Academia"], Elasticity::Estimated(1.5)),
            segment(["Consumable", "Academia"], Elasticity::Estimated(2.0)),
        ]);

        let keys = map
            .iter()
            .map(|s| s.key.labels()[0].clone())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["Consumable", "Reagent"]);
    }

    #[test]
    fn undefined_has_no_magnitude() {
        let reason = UndefinedReason::InsufficientData {
            samples: 3,
            required: 100,
        };
        let map = ElasticityMap::new([segment(
            ["Instrument", "Academia"],
            Elasticity::Undefined(reason),
        )]);

        let key = SegmentKey::new(["Instrument", "Academia"]);
        assert!(map.get(&key).is_some());
        assert_eq!(map.magnitude(&key), None);
        assert_eq!(map.magnitude(&SegmentKey::new(["Other", "Academia"])), None);
    }

    #[test]
    fn summary_serializes_flat() {
        let map = ElasticityMap::new([
            segment(["Reagent", "Academia"], Elasticity::Estimated(1.25)),
            segment(
                ["Instrument", "Academia"],
                Elasticity::Undefined(UndefinedReason::DegenerateFit),
            ),
        ]);

        let summary = map.summary(&["product_type", "customer_type"]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {
                    "product_type": "Instrument",
                    "customer_type": "Academia",
                    "price_elasticity": null
                },
                {
                    "product_type": "Reagent",
                    "customer_type": "Academia",
                    "price_elasticity": 1.25
                }
            ])
        );
    }
}
