use crate::aggregate::{DimensionView, ViewModel};
use crate::classify::ThresholdTable;
use crate::metrics::normalize;
use crate::sources::{Dimension, LoadError, MetricSource};
use chrono::Utc;
use futures_util::future::try_join_all;

const LOG_TARGET: &str = "    refresh";

/// Run one refresh tick: fetch every dimension concurrently and assemble a view model.
///
/// The first dimension to fail aborts the tick and the outstanding requests are dropped.
///
/// # Errors
///
/// Returns the [`LoadError`] of the first dimension that could not be fetched or normalized.
pub async fn load_view_model<S: MetricSource>(
    source: &S,
    dimensions: &[Dimension],
    thresholds: &ThresholdTable,
    tick: u64,
) -> Result<ViewModel, LoadError> {
    log::debug!(target: LOG_TARGET, "Tick {tick}: loading {} dimension(s)", dimensions.len());

    let views = try_join_all(dimensions.iter().map(|&dimension| async move {
        let body = source.fetch(dimension).await?;
        let normalized = normalize(dimension, &body, thresholds).map_err(|e| LoadError::shape(dimension, e))?;
        Ok::<_, LoadError>(DimensionView::from_normalized(normalized, thresholds))
    }))
    .await?;

    let view_model = ViewModel::assemble(views, thresholds, tick, Utc::now());
    log::info!(
        target: LOG_TARGET,
        "Tick {tick}: overall visibility {:.1}% ({}), {} critical dimension(s)",
        view_model.overall_percentage(),
        view_model.overall_severity(),
        view_model.critical_dimension_count()
    );

    Ok(view_model)
}
