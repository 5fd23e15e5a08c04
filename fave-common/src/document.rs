//! Multi-tier annotation document (a TextGrid)

use crate::tier::Tier;
use std::fmt;

/// Ordered tiers sharing one overall time domain
///
/// A new document is empty with domain `[0, 0]`. Appending a tier widens the
/// domain to the union of the current domain and the tier's.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    min: f64,
    max: f64,
    tiers: Vec<Tier>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            tiers: Vec::new(),
        }
    }

    /// Empty document with an explicit domain, as declared by a file header
    pub fn with_domain(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            tiers: Vec::new(),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn append(&mut self, tier: impl Into<Tier>) {
        let tier = tier.into();
        self.cover(tier.min(), tier.max());
        self.tiers.push(tier);
    }

    /// Widen the domain to include `[min, max]`
    pub(crate) fn cover(&mut self, min: f64, max: f64) {
        self.min = self.min.min(min);
        self.max = self.max.max(max);
    }

    /// Pin the document domain; tiers are left as they are
    pub fn set_domain(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    /// Shift the domain and every tier by `delta` seconds
    pub fn offset(&mut self, delta: f64) {
        self.min += delta;
        self.max += delta;
        for tier in &mut self.tiers {
            tier.offset(delta);
        }
    }

    pub fn get(&self, index: usize) -> Option<&Tier> {
        self.tiers.get(index)
    }

    pub fn tier(&self, name: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.name() == name)
    }

    pub fn tier_mut(&mut self, name: &str) -> Option<&mut Tier> {
        self.tiers.iter_mut().find(|t| t.name() == name)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tier> {
        self.tiers.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tier> {
        self.tiers.iter_mut()
    }

    /// Consume the document, yielding its tiers in order
    pub fn into_tiers(self) -> Vec<Tier> {
        self.tiers
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Tier;
    type IntoIter = std::slice::Iter<'a, Tier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<TextGrid with {} tiers>", self.tiers.len())
    }
}
