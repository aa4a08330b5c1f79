use super::DimensionAggregate;
use crate::classify::{Severity, ThresholdTable};
use crate::metrics::{NormalizedDimension, Primary, VisibilityMetric};
use crate::sources::Dimension;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A secondary breakdown of a dimension, summarized.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceAggregate {
    pub name: &'static str,
    pub aggregate: DimensionAggregate,
}

/// The headline content of a dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionSummary {
    Single(VisibilityMetric),
    Aggregate(DimensionAggregate),
}

/// Everything known about one dimension in a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionView {
    pub dimension: Dimension,
    pub summary: DimensionSummary,
    pub slices: Vec<SliceAggregate>,
    pub highlights: Vec<VisibilityMetric>,
}

impl DimensionView {
    /// Summarize a normalized dimension using the dimension's thresholds.
    #[must_use]
    pub fn from_normalized(normalized: NormalizedDimension, thresholds: &ThresholdTable) -> Self {
        let tiers = thresholds.tiers_for(normalized.dimension);

        let summary = match normalized.primary {
            Primary::Single(metric) => DimensionSummary::Single(metric),
            Primary::Items(items) => DimensionSummary::Aggregate(DimensionAggregate::from_items(items, tiers)),
        };

        let slices = normalized
            .slices
            .into_iter()
            .map(|slice| SliceAggregate {
                name: slice.name,
                aggregate: DimensionAggregate::from_items(slice.items, tiers),
            })
            .collect();

        Self {
            dimension: normalized.dimension,
            summary,
            slices,
            highlights: normalized.highlights,
        }
    }

    /// The percentage standing for the whole dimension, or `None` when it has no data.
    #[must_use]
    pub fn representative_percentage(&self) -> Option<f64> {
        match &self.summary {
            DimensionSummary::Single(metric) => Some(metric.percentage),
            DimensionSummary::Aggregate(aggregate) => aggregate.has_data().then_some(aggregate.mean_percentage()),
        }
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        match &self.summary {
            DimensionSummary::Single(metric) => metric.severity,
            DimensionSummary::Aggregate(aggregate) => aggregate.severity(),
        }
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.representative_percentage().is_some()
    }

    #[must_use]
    pub fn slice(&self, name: &str) -> Option<&DimensionAggregate> {
        self.slices.iter().find(|slice| slice.name == name).map(|slice| &slice.aggregate)
    }

    #[must_use]
    pub fn highlight(&self, name: &str) -> Option<&VisibilityMetric> {
        self.highlights.iter().find(|metric| metric.dimension_key == name)
    }

    #[must_use]
    pub const fn aggregate(&self) -> Option<&DimensionAggregate> {
        match &self.summary {
            DimensionSummary::Aggregate(aggregate) => Some(aggregate),
            DimensionSummary::Single(_) => None,
        }
    }
}

/// One immutable snapshot of visibility across all loaded dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    dimensions: BTreeMap<Dimension, DimensionView>,
    overall_percentage: f64,
    overall_severity: Severity,
    critical_dimension_count: usize,
    generated_at: DateTime<Utc>,
    tick: u64,
}

impl ViewModel {
    /// Merge dimension views into a snapshot.
    ///
    /// The overall percentage is the unweighted mean of the representative
    /// percentages of the dimensions that have data, classified with the default
    /// tiers. Dimensions without data are kept in the snapshot but do not count
    /// toward the overall figures.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "there are only a handful of dimensions")]
    pub fn assemble(
        views: impl IntoIterator<Item = DimensionView>,
        thresholds: &ThresholdTable,
        tick: u64,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let dimensions: BTreeMap<_, _> = views.into_iter().map(|view| (view.dimension, view)).collect();

        let percentages: Vec<f64> = dimensions.values().filter_map(DimensionView::representative_percentage).collect();
        let overall_percentage = if percentages.is_empty() {
            0.0
        } else {
            percentages.iter().sum::<f64>() / percentages.len() as f64
        };

        let critical_dimension_count = dimensions
            .values()
            .filter(|view| view.has_data() && view.severity() == Severity::Critical)
            .count();

        Self {
            overall_severity: thresholds.default_tiers().classify(overall_percentage),
            dimensions,
            overall_percentage,
            critical_dimension_count,
            generated_at,
            tick,
        }
    }

    #[must_use]
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionView> {
        self.dimensions.get(&dimension)
    }

    /// All dimension views, in reporting order.
    pub fn dimensions(&self) -> impl Iterator<Item = &DimensionView> {
        self.dimensions.values()
    }

    #[must_use]
    pub const fn overall_percentage(&self) -> f64 {
        self.overall_percentage
    }

    #[must_use]
    pub const fn overall_severity(&self) -> Severity {
        self.overall_severity
    }

    #[must_use]
    pub const fn critical_dimension_count(&self) -> usize {
        self.critical_dimension_count
    }

    /// Number of dimensions contributing to the overall figures.
    #[must_use]
    pub fn loaded_dimension_count(&self) -> usize {
        self.dimensions.values().filter(|view| view.has_data()).count()
    }

    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Sequence number of the refresh tick that produced this snapshot.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Counts, MetricList, normalize};
    use serde_json::json;

    fn view(dimension: Dimension, body: &serde_json::Value) -> DimensionView {
        let thresholds = ThresholdTable::default();
        DimensionView::from_normalized(normalize(dimension, body, &thresholds).unwrap(), &thresholds)
    }

    #[test]
    fn test_overall_is_mean_of_loaded_dimensions() {
        let views = [
            view(Dimension::Global, &json!({"total_hosts": 1000, "visible_hosts": 300})),
            view(
                Dimension::Regional,
                &json!({"regional_breakdown": [
                    {"region": "A", "total_hosts": 100, "visible_hosts": 90},
                    {"region": "B", "total_hosts": 100, "visible_hosts": 10}
                ]}),
            ),
            view(Dimension::Domain, &json!({"domain_breakdown": []})),
        ];

        let vm = ViewModel::assemble(views, &ThresholdTable::default(), 4, Utc::now());

        assert!((vm.overall_percentage() - 40.0).abs() < 1e-9);
        assert_eq!(vm.overall_severity(), Severity::Warning);
        assert_eq!(vm.loaded_dimension_count(), 2);
        assert_eq!(vm.critical_dimension_count(), 0);
        assert_eq!(vm.tick(), 4);
        assert!(vm.dimension(Dimension::Domain).is_some_and(|d| !d.has_data()));
        assert!(vm.dimension(Dimension::Logging).is_none());
    }

    #[test]
    fn test_empty_view_model() {
        let vm = ViewModel::assemble(Vec::new(), &ThresholdTable::default(), 1, Utc::now());
        assert!(vm.overall_percentage().abs() < f64::EPSILON);
        assert_eq!(vm.loaded_dimension_count(), 0);
        assert_eq!(vm.dimensions().count(), 0);
    }

    #[test]
    fn test_critical_dimensions_are_counted() {
        let views = [
            view(Dimension::Global, &json!({"total_hosts": 0, "visible_hosts": 0})),
            view(Dimension::Domain, &json!({"domain_breakdown": [{"domain": "x", "total_hosts": 10, "visible_hosts": 1}]})),
            view(Dimension::Regional, &json!({"regional_breakdown": [{"region": "y", "total_hosts": 10, "visible_hosts": 9}]})),
        ];

        let vm = ViewModel::assemble(views, &ThresholdTable::default(), 1, Utc::now());
        assert_eq!(vm.critical_dimension_count(), 2);
    }

    #[test]
    fn test_dimensions_are_in_reporting_order() {
        let views = [
            view(Dimension::Domain, &json!({})),
            view(Dimension::Global, &json!({"total_hosts": 1, "visible_hosts": 1})),
            view(Dimension::Logging, &json!({})),
        ];

        let vm = ViewModel::assemble(views, &ThresholdTable::default(), 1, Utc::now());
        let order: Vec<_> = vm.dimensions().map(|d| d.dimension).collect();
        assert_eq!(order, [Dimension::Global, Dimension::Logging, Dimension::Domain]);
    }

    #[test]
    fn test_slices_are_aggregated() {
        let normalized = NormalizedDimension {
            dimension: Dimension::BusinessUnit,
            primary: Primary::Items(Vec::new()),
            slices: vec![MetricList {
                name: "executives",
                items: vec![
                    VisibilityMetric::new("a", Counts::new(10, 10), ThresholdTable::default().default_tiers()),
                    VisibilityMetric::new("b", Counts::new(10, 0), ThresholdTable::default().default_tiers()),
                ],
            }],
            highlights: Vec::new(),
        };

        let view = DimensionView::from_normalized(normalized, &ThresholdTable::default());
        let executives = view.slice("executives").unwrap();
        assert_eq!(executives.worst_item().unwrap().dimension_key, "b");
        assert_eq!(executives.critical_count(), 1);
        assert!(!view.has_data());
        assert!(view.slice("missing").is_none());
    }
}
