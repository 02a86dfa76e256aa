use std::fmt;

/// The ordered tuple of categorical attributes that identifies a market segment,
/// e.g. `("Reagent", "Academia")` for product type × customer type.
///
/// Keys compare lexicographically, which gives segment summaries a stable order.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SegmentKey(Vec<String>);

impl SegmentKey {
    /// Construct a key from its labels, in column order
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(labels: I) -> Self {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// The labels making up this key
    pub fn labels(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for SegmentKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}
