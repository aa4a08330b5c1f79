use crate::classify::{Severity, Tiers};
use crate::metrics::{VisibilityMetric, percentage};

/// Summary of a list of entity metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionAggregate {
    items: Vec<VisibilityMetric>,
    mean_percentage: f64,
    best: Option<usize>,
    worst: Option<usize>,
    critical_count: usize,
    severity: Severity,
}

impl DimensionAggregate {
    /// Summarize `items`, classifying the mean with `tiers`.
    ///
    /// Items keep their order. On ties the first item encountered is reported as
    /// best or worst. An empty list has a mean of `0` and no data.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "item counts are small")]
    pub fn from_items(items: Vec<VisibilityMetric>, tiers: Tiers) -> Self {
        let mut best: Option<usize> = None;
        let mut worst: Option<usize> = None;

        for (index, item) in items.iter().enumerate() {
            if best.is_none_or(|b| item.percentage > items[b].percentage) {
                best = Some(index);
            }

            if worst.is_none_or(|w| item.percentage < items[w].percentage) {
                worst = Some(index);
            }
        }

        let mean_percentage = if items.is_empty() {
            0.0
        } else {
            items.iter().map(|item| item.percentage).sum::<f64>() / items.len() as f64
        };

        Self {
            critical_count: items.iter().filter(|item| item.is_critical()).count(),
            severity: tiers.classify(mean_percentage),
            items,
            mean_percentage,
            best,
            worst,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[VisibilityMetric] {
        &self.items
    }

    /// Unweighted mean of the item percentages.
    #[must_use]
    pub const fn mean_percentage(&self) -> f64 {
        self.mean_percentage
    }

    /// Percentage over all assets of all items, weighting each item by its size.
    #[must_use]
    pub fn weighted_percentage(&self) -> f64 {
        percentage(self.visible_count(), self.total_count())
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.items.iter().map(|item| item.total_count).fold(0, u64::saturating_add)
    }

    #[must_use]
    pub fn visible_count(&self) -> u64 {
        self.items.iter().map(|item| item.visible_count).fold(0, u64::saturating_add)
    }

    #[must_use]
    pub fn best_item(&self) -> Option<&VisibilityMetric> {
        self.best.map(|index| &self.items[index])
    }

    #[must_use]
    pub fn worst_item(&self) -> Option<&VisibilityMetric> {
        self.worst.map(|index| &self.items[index])
    }

    #[must_use]
    pub const fn critical_count(&self) -> usize {
        self.critical_count
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.items.is_empty()
    }

    /// Classification of the mean percentage.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }
}
