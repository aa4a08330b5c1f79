use super::common::{format_overlap, format_percentage, severity_cell};
use crate::Result;
use crate::aggregate::{DimensionAggregate, DimensionSummary, DimensionView, ViewModel};
use crate::metrics::VisibilityMetric;
use crate::refresh::{DashboardState, Freshness};
use core::fmt::Write;
use owo_colors::OwoColorize;

const NAME_WIDTH: usize = 28;

pub fn generate<W: Write>(state: &DashboardState, use_colors: bool, writer: &mut W) -> Result<()> {
    let Some(view_model) = &state.view_model else {
        writeln!(writer, "No visibility data loaded yet ({})", state.phase)?;
        if let Some(e) = state.error() {
            writeln!(writer, "Last refresh failed: {e}")?;
        }
        return Ok(());
    };

    write_overview(view_model, use_colors, writer)?;

    if state.freshness() == Freshness::Stale
        && let Some(e) = state.error()
    {
        let warning = format!("Showing stale data, the last refresh failed: {e}");
        if use_colors {
            writeln!(writer, "{}", warning.yellow())?;
        } else {
            writeln!(writer, "{warning}")?;
        }
    }

    for view in view_model.dimensions() {
        writeln!(writer)?;
        write_dimension(view, use_colors, writer)?;
    }

    Ok(())
}

fn write_overview<W: Write>(view_model: &ViewModel, use_colors: bool, writer: &mut W) -> Result<()> {
    let title = "Overall visibility";
    if use_colors {
        write!(writer, "{} ", title.bold())?;
    } else {
        write!(writer, "{title} ")?;
    }

    writeln!(
        writer,
        "{} {} across {} dimension(s), {} critical",
        format_percentage(view_model.overall_percentage()),
        severity_cell(view_model.overall_severity(), use_colors).trim_end(),
        view_model.loaded_dimension_count(),
        view_model.critical_dimension_count()
    )?;

    writeln!(
        writer,
        "Snapshot from refresh {} at {}",
        view_model.tick(),
        view_model.generated_at().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    Ok(())
}

fn write_dimension<W: Write>(view: &DimensionView, use_colors: bool, writer: &mut W) -> Result<()> {
    let label = view.dimension.label();
    let heading = if use_colors { label.bold().to_string() } else { label.to_string() };
    let padding = NAME_WIDTH.saturating_sub(label.len());

    match &view.summary {
        DimensionSummary::Single(metric) => {
            writeln!(
                writer,
                "{heading}{:padding$}{:>7}  {}  {} of {} hosts visible",
                "",
                format_percentage(metric.percentage),
                severity_cell(metric.severity, use_colors),
                metric.visible_count,
                metric.total_count
            )?;
            write_platforms(metric, use_colors, writer)?;
        }
        DimensionSummary::Aggregate(aggregate) if !aggregate.has_data() => {
            writeln!(writer, "{heading}{:padding$}{:>7}  no data", "", "-")?;
        }
        DimensionSummary::Aggregate(aggregate) => {
            writeln!(
                writer,
                "{heading}{:padding$}{:>7}  {}  mean of {} item(s), {} critical",
                "",
                format_percentage(aggregate.mean_percentage()),
                severity_cell(aggregate.severity(), use_colors),
                aggregate.items().len(),
                aggregate.critical_count()
            )?;

            if let (Some(best), Some(worst)) = (aggregate.best_item(), aggregate.worst_item()) {
                writeln!(
                    writer,
                    "  best {} ({}), worst {} ({})",
                    best.dimension_key,
                    format_percentage(best.percentage),
                    worst.dimension_key,
                    format_percentage(worst.percentage)
                )?;
            }

            for item in aggregate.items() {
                write_metric_line(&item.dimension_key, item, 2, use_colors, writer)?;
            }
        }
    }

    for highlight in &view.highlights {
        write_metric_line(&highlight.dimension_key, highlight, 2, use_colors, writer)?;
        if let Some(overlap) = &highlight.overlap {
            writeln!(writer, "      {}", format_overlap(overlap))?;
        }
    }

    for slice in &view.slices {
        write_slice(slice.name, &slice.aggregate, use_colors, writer)?;
    }

    Ok(())
}

fn write_platforms<W: Write>(metric: &VisibilityMetric, use_colors: bool, writer: &mut W) -> Result<()> {
    for (platform, sub_metric) in &metric.per_platform {
        write_metric_line(platform.label(), sub_metric, 2, use_colors, writer)?;
    }

    if let Some(overlap) = &metric.overlap {
        writeln!(writer, "  {}", format_overlap(overlap))?;
    }

    Ok(())
}

fn write_slice<W: Write>(name: &str, aggregate: &DimensionAggregate, use_colors: bool, writer: &mut W) -> Result<()> {
    let title = name.replace('_', " ");
    let padding = NAME_WIDTH.saturating_sub(title.len() + 2);

    match aggregate.worst_item() {
        Some(worst) => writeln!(
            writer,
            "  {title}{:padding$}{:>7}  {}  {} item(s), worst {} ({})",
            "",
            format_percentage(aggregate.mean_percentage()),
            severity_cell(aggregate.severity(), use_colors),
            aggregate.items().len(),
            worst.dimension_key,
            format_percentage(worst.percentage)
        )?,
        None => writeln!(writer, "  {title}{:padding$}{:>7}  no data", "", "-")?,
    }

    Ok(())
}

fn write_metric_line<W: Write>(name: &str, metric: &VisibilityMetric, indent: usize, use_colors: bool, writer: &mut W) -> Result<()> {
    let name_width = NAME_WIDTH.saturating_sub(indent);
    let marker = if metric.clamped { " *" } else { "" };

    writeln!(
        writer,
        "{:indent$}{:<name_width$}{:>7}  {}  {} of {}{marker}",
        "",
        name,
        format_percentage(metric.percentage),
        severity_cell(metric.severity, use_colors),
        metric.visible_count,
        metric.total_count
    )?;

    Ok(())
}
