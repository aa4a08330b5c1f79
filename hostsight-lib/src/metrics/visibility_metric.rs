use super::derive::{Counts, PlatformOverlap, gap_percentage};
use super::platform::Platform;
use crate::classify::{Severity, Tiers};
use std::collections::BTreeMap;

/// Visibility of one entity: how many of its assets are observed, and how healthy that is.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityMetric {
    /// The entity this metric describes, such as `global` or a region name
    pub dimension_key: String,
    pub total_count: u64,
    pub visible_count: u64,
    pub invisible_count: u64,

    /// `visible / total * 100`, or `0` when there are no assets
    pub percentage: f64,

    /// `100 - percentage`
    pub gap_percentage: f64,
    pub severity: Severity,

    /// The same entity as seen by individual platforms
    pub per_platform: BTreeMap<Platform, Self>,

    /// Combination buckets, present when the metric tracks two platforms
    pub overlap: Option<PlatformOverlap>,

    /// Whether the raw counts were inconsistent and had to be clamped
    pub clamped: bool,
}

impl VisibilityMetric {
    /// Build a classified metric from consistent counts.
    #[must_use]
    pub fn new(key: impl Into<String>, counts: Counts, tiers: Tiers) -> Self {
        let percentage = counts.percentage();

        Self {
            dimension_key: key.into(),
            total_count: counts.total,
            visible_count: counts.visible,
            invisible_count: counts.invisible(),
            percentage,
            gap_percentage: gap_percentage(percentage),
            severity: tiers.classify(percentage),
            per_platform: BTreeMap::new(),
            overlap: None,
            clamped: counts.clamped,
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform, metric: Self) -> Self {
        let _ = self.per_platform.insert(platform, metric);
        self
    }

    #[must_use]
    pub fn with_overlap(mut self, overlap: PlatformOverlap) -> Self {
        self.overlap = Some(overlap);
        self
    }

    #[must_use]
    pub fn platform(&self, platform: Platform) -> Option<&Self> {
        self.per_platform.get(&platform)
    }

    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}
