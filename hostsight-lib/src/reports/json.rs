use crate::Result;
use crate::aggregate::{DimensionAggregate, DimensionSummary, DimensionView, ViewModel};
use crate::classify::Severity;
use crate::metrics::VisibilityMetric;
use crate::refresh::DashboardState;
use core::fmt::Write;
use serde_json::{Map, Value, json};

pub fn generate<W: Write>(state: &DashboardState, writer: &mut W) -> Result<()> {
    let error = state.error().map(|e| {
        json!({
            "kind": e.kind(),
            "dimension": e.dimension(),
            "message": e.to_string(),
        })
    });

    let output = json!({
        "status": {
            "phase": state.phase.to_string(),
            "freshness": state.freshness().to_string(),
            "ticks_started": state.ticks_started,
            "last_attempt_at": state.last_attempt_at.map(|t| t.to_rfc3339()),
            "last_success_at": state.last_success_at.map(|t| t.to_rfc3339()),
            "error": error,
        },
        "snapshot": state.view_model.as_deref().map(view_model_to_json),
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

#[expect(unused_results, reason = "keys are unique so nothing is overwritten")]
fn view_model_to_json(view_model: &ViewModel) -> Value {
    let mut dimensions = Map::new();
    for view in view_model.dimensions() {
        dimensions.insert(view.dimension.to_string(), dimension_to_json(view));
    }

    json!({
        "tick": view_model.tick(),
        "generated_at": view_model.generated_at().to_rfc3339(),
        "overall_percentage": view_model.overall_percentage(),
        "overall_severity": <&str>::from(view_model.overall_severity()),
        "critical_dimension_count": view_model.critical_dimension_count(),
        "loaded_dimension_count": view_model.loaded_dimension_count(),
        "dimensions": dimensions,
    })
}

#[expect(unused_results, reason = "keys are unique so nothing is overwritten")]
fn dimension_to_json(view: &DimensionView) -> Value {
    let mut object = Map::new();
    object.insert("has_data".to_string(), json!(view.has_data()));
    object.insert("percentage".to_string(), json!(view.representative_percentage()));
    object.insert("severity".to_string(), json!(severity_name(view.has_data(), view.severity())));

    match &view.summary {
        DimensionSummary::Single(metric) => {
            object.insert("metric".to_string(), metric_to_json(metric));
        }
        DimensionSummary::Aggregate(aggregate) => {
            object.insert("aggregate".to_string(), aggregate_to_json(aggregate));
        }
    }

    let mut slices = Map::new();
    for slice in &view.slices {
        slices.insert(slice.name.to_string(), aggregate_to_json(&slice.aggregate));
    }
    object.insert("slices".to_string(), Value::Object(slices));

    object.insert(
        "highlights".to_string(),
        Value::Array(view.highlights.iter().map(metric_to_json).collect()),
    );

    Value::Object(object)
}

fn aggregate_to_json(aggregate: &DimensionAggregate) -> Value {
    json!({
        "has_data": aggregate.has_data(),
        "mean_percentage": aggregate.mean_percentage(),
        "weighted_percentage": aggregate.weighted_percentage(),
        "severity": severity_name(aggregate.has_data(), aggregate.severity()),
        "critical_count": aggregate.critical_count(),
        "best": aggregate.best_item().map(|m| m.dimension_key.as_str()),
        "worst": aggregate.worst_item().map(|m| m.dimension_key.as_str()),
        "items": aggregate.items().iter().map(metric_to_json).collect::<Vec<_>>(),
    })
}

/// A dimension or slice without data has no meaningful classification.
fn severity_name(has_data: bool, severity: Severity) -> Option<&'static str> {
    has_data.then(|| severity.into())
}

fn metric_to_json(metric: &VisibilityMetric) -> Value {
    let per_platform: Map<String, Value> = metric
        .per_platform
        .iter()
        .map(|(platform, sub_metric)| (platform.to_string(), metric_to_json(sub_metric)))
        .collect();

    json!({
        "key": metric.dimension_key,
        "total_count": metric.total_count,
        "visible_count": metric.visible_count,
        "invisible_count": metric.invisible_count,
        "percentage": metric.percentage,
        "gap_percentage": metric.gap_percentage,
        "severity": <&str>::from(metric.severity),
        "clamped": metric.clamped,
        "per_platform": per_platform,
        "overlap": metric.overlap,
    })
}
