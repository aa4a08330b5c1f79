use super::derive::{Counts, KnownOverlap, PlatformOverlap, raw_count};
use super::schema::{CombinedDef, ControlDef, CountFields, EntityLayout, Layout, ListDef, RollupDef, schema_for};
use super::{Platform, VisibilityMetric};
use crate::Result;
use crate::classify::{ThresholdTable, Tiers};
use crate::sources::Dimension;
use ohno::app_err;
use serde_json::{Map, Value};

const LOG_TARGET: &str = "  normalize";

/// Name given to entities whose payload entry carries no usable name.
pub const UNKNOWN_ENTITY: &str = "unknown";

const GLOBAL_KEY: &str = "global";

type Object = Map<String, Value>;

/// A named list of metrics, in payload order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricList {
    pub name: &'static str,
    pub items: Vec<VisibilityMetric>,
}

/// The main content of a dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// The dimension describes one entity
    Single(VisibilityMetric),

    /// The dimension breaks down into entities, in payload order
    Items(Vec<VisibilityMetric>),
}

/// Everything one dimension's payload yields.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDimension {
    pub dimension: Dimension,
    pub primary: Primary,

    /// Secondary breakdowns served by the same endpoint
    pub slices: Vec<MetricList>,

    /// Named roll-ups served by the same endpoint
    pub highlights: Vec<VisibilityMetric>,
}

impl NormalizedDimension {
    /// Look up a secondary breakdown by name.
    #[must_use]
    pub fn slice(&self, name: &str) -> Option<&MetricList> {
        self.slices.iter().find(|slice| slice.name == name)
    }

    /// Look up a roll-up by name.
    #[must_use]
    pub fn highlight(&self, name: &str) -> Option<&VisibilityMetric> {
        self.highlights.iter().find(|metric| metric.dimension_key == name)
    }
}

/// Turn a dimension's raw payload into classified metrics.
///
/// The walk is driven entirely by the dimension's registered layout. Absent or
/// `null` counts read as zero and absent lists read as empty, while values of the
/// wrong JSON type are errors. Percentages carried by the payload next to counts
/// are ignored in favor of recomputing them from the counts.
///
/// # Errors
///
/// Returns an error if the payload is not an object, is the data source's error
/// envelope, or has a field of the wrong type.
pub fn normalize(dimension: Dimension, body: &Value, thresholds: &ThresholdTable) -> Result<NormalizedDimension> {
    let schema = schema_for(dimension).ok_or_else(|| app_err!("no payload layout is registered for {dimension}"))?;
    let root = payload_object(body)?;
    let normalizer = Normalizer {
        dimension,
        tiers: thresholds.tiers_for(dimension),
    };

    let normalized = match &schema.layout {
        Layout::Single {
            counts,
            platform_percentages,
        } => normalizer.single(root, *counts, platform_percentages)?,
        Layout::Breakdown {
            items,
            slices,
            highlights,
        } => normalizer.breakdown(root, items, slices, highlights)?,
        Layout::Controls {
            total,
            controls,
            highlights,
            combined,
        } => normalizer.controls(root, total, controls, highlights, combined.as_ref())?,
    };

    log::debug!(
        target: LOG_TARGET,
        "Normalized {dimension} payload into {} slice(s) and {} highlight(s)",
        normalized.slices.len(),
        normalized.highlights.len()
    );

    Ok(normalized)
}

struct Normalizer {
    dimension: Dimension,
    tiers: Tiers,
}

impl Normalizer {
    fn single(&self, root: &Object, counts: CountFields, platform_percentages: &[(Platform, &str)]) -> Result<NormalizedDimension> {
        let counts = self.counts(root, counts, 0, GLOBAL_KEY)?;
        let mut metric = VisibilityMetric::new(GLOBAL_KEY, counts, self.tiers);

        let mut platform_visible = Vec::with_capacity(platform_percentages.len());
        for (platform, field) in platform_percentages {
            let Some(pct) = optional_number(root, field, GLOBAL_KEY)? else {
                continue;
            };

            let key = platform.to_string();
            let share = Counts::from_percentage(counts.total, pct);
            self.report_clamped(&key, share);
            platform_visible.push(share.visible);
            metric = metric.with_platform(*platform, VisibilityMetric::new(key, share, self.tiers));
        }

        // the global visible count is the union of the two platforms
        if let &[a, b] = platform_visible.as_slice() {
            let known = KnownOverlap {
                both: None,
                either: Some(counts.visible),
            };
            metric = metric.with_overlap(PlatformOverlap::derive(counts.total, a, b, known));
        }

        Ok(NormalizedDimension {
            dimension: self.dimension,
            primary: Primary::Single(metric),
            slices: Vec::new(),
            highlights: Vec::new(),
        })
    }

    fn breakdown(&self, root: &Object, items: &ListDef, slices: &[ListDef], highlights: &[RollupDef]) -> Result<NormalizedDimension> {
        let primary = Primary::Items(self.list(root, items, 0)?);

        let slices = slices
            .iter()
            .map(|def| self.list(root, def, 0).map(|items| MetricList { name: def.name, items }))
            .collect::<Result<Vec<_>>>()?;

        Ok(NormalizedDimension {
            dimension: self.dimension,
            primary,
            slices,
            highlights: self.rollups(root, highlights, 0)?,
        })
    }

    fn controls(
        &self,
        root: &Object,
        total_field: &str,
        controls: &[ControlDef],
        highlights: &[RollupDef],
        combined: Option<&CombinedDef>,
    ) -> Result<NormalizedDimension> {
        let mut items = Vec::with_capacity(controls.len());
        let mut slices = Vec::new();

        for control in controls {
            let Some(object) = nested_object(root, control.field)? else {
                log::debug!(target: LOG_TARGET, "No '{}' object in the {} payload", control.field, self.dimension);
                continue;
            };

            let key = control.platform.to_string();
            let counts = self.counts(object, control.counts, 0, &key)?;

            if let Some(def) = &control.breakdown {
                slices.push(MetricList {
                    name: def.name,
                    items: self.list(object, def, counts.total)?,
                });
            }

            items.push((control.platform, VisibilityMetric::new(key, counts, self.tiers)));
        }

        let total = match optional_number(root, total_field, self.dimension.into())? {
            Some(raw) if raw > 0.0 => raw_count(raw).0,
            _ => items.iter().map(|(_, metric)| metric.total_count).max().unwrap_or_default(),
        };

        let mut highlights = self.rollups(root, highlights, total)?;
        if let Some(def) = combined
            && let Some(metric) = self.combined(root, def, total, &items)?
        {
            highlights.push(metric);
        }

        Ok(NormalizedDimension {
            dimension: self.dimension,
            primary: Primary::Items(items.into_iter().map(|(_, metric)| metric).collect()),
            slices,
            highlights,
        })
    }

    fn combined(
        &self,
        root: &Object,
        def: &CombinedDef,
        total: u64,
        items: &[(Platform, VisibilityMetric)],
    ) -> Result<Option<VisibilityMetric>> {
        let find = |platform: Platform| items.iter().find(|(p, _)| *p == platform).map(|(_, metric)| metric);
        let (Some(a), Some(b)) = (find(def.platforms.0), find(def.platforms.1)) else {
            return Ok(None);
        };

        let known = match nested_object(root, def.field)? {
            Some(buckets) => KnownOverlap {
                both: bucket_count(buckets, def.both, def.count)?,
                either: bucket_count(buckets, def.either, def.count)?,
            },
            None => KnownOverlap::default(),
        };

        let overlap = PlatformOverlap::derive(total, a.visible_count, b.visible_count, known);
        let metric = VisibilityMetric::new(def.name, Counts::new(total, overlap.either), self.tiers)
            .with_platform(def.platforms.0, a.clone())
            .with_platform(def.platforms.1, b.clone())
            .with_overlap(overlap);

        Ok(Some(metric))
    }

    fn list(&self, parent: &Object, def: &ListDef, enclosing_total: u64) -> Result<Vec<VisibilityMetric>> {
        entries(parent, def)?
            .into_iter()
            .map(|(name, entry)| {
                let counts = self.counts(entry, def.counts, enclosing_total, &name)?;
                Ok(VisibilityMetric::new(name, counts, self.tiers))
            })
            .collect()
    }

    fn rollups(&self, root: &Object, defs: &[RollupDef], enclosing_total: u64) -> Result<Vec<VisibilityMetric>> {
        let mut metrics = Vec::with_capacity(defs.len());
        for def in defs {
            if let Some(object) = nested_object(root, def.field)? {
                let counts = self.counts(object, def.counts, enclosing_total, def.name)?;
                metrics.push(VisibilityMetric::new(def.name, counts, self.tiers));
            }
        }

        Ok(metrics)
    }

    fn counts(&self, object: &Object, fields: CountFields, enclosing_total: u64, key: &str) -> Result<Counts> {
        let counts = match fields {
            CountFields::TotalVisible { total, visible } => Counts::from_raw(number(object, total, key)?, number(object, visible, key)?),
            CountFields::Split { covered, uncovered } => Counts::from_split(number(object, covered, key)?, number(object, uncovered, key)?),
            CountFields::Share { covered } => Counts::share_of(enclosing_total, number(object, covered, key)?),
        };

        self.report_clamped(key, counts);
        Ok(counts)
    }

    fn report_clamped(&self, key: &str, counts: Counts) {
        if counts.clamped {
            log::warn!(
                target: LOG_TARGET,
                "Inconsistent counts for '{key}' in the {} payload were clamped to {} visible of {}",
                self.dimension,
                counts.visible,
                counts.total
            );
        }
    }
}

fn payload_object(body: &Value) -> Result<&Object> {
    let Value::Object(root) = body else {
        return Err(app_err!("expected a JSON object, found {}", kind(body)));
    };

    if let Some(Value::String(message)) = root.get("error") {
        return Err(app_err!("the data source reported an error: {message}"));
    }

    Ok(root)
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A numeric field, reading absent and `null` as zero.
fn number(object: &Object, field: &str, context: &str) -> Result<f64> {
    Ok(optional_number(object, field, context)?.unwrap_or_default())
}

fn optional_number(object: &Object, field: &str, context: &str) -> Result<Option<f64>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.as_f64().unwrap_or_default())),
        Some(other) => Err(app_err!("field '{field}' of '{context}' should be a number, found {}", kind(other))),
    }
}

fn nested_object<'a>(parent: &'a Object, field: &str) -> Result<Option<&'a Object>> {
    match parent.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(object)) => Ok(Some(object)),
        Some(other) => Err(app_err!("field '{field}' should be an object, found {}", kind(other))),
    }
}

fn bucket_count(buckets: &Object, bucket: &str, count_field: &str) -> Result<Option<u64>> {
    let Some(object) = nested_object(buckets, bucket)? else {
        return Ok(None);
    };

    Ok(optional_number(object, count_field, bucket)?.map(|raw| raw_count(raw).0))
}

fn entries<'a>(parent: &'a Object, def: &ListDef) -> Result<Vec<(String, &'a Object)>> {
    let field = def.field;

    match (parent.get(field), def.layout) {
        (None | Some(Value::Null), _) => Ok(Vec::new()),
        (Some(Value::Array(values)), EntityLayout::Array { name_key }) => values
            .iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(entry) => Ok((entity_name(entry, name_key), entry)),
                other => Err(app_err!("entry {index} of '{field}' should be an object, found {}", kind(other))),
            })
            .collect(),
        (Some(Value::Object(map)), EntityLayout::Keyed) => map
            .iter()
            .map(|(name, value)| match value {
                Value::Object(entry) => Ok((name.clone(), entry)),
                other => Err(app_err!("entry '{name}' of '{field}' should be an object, found {}", kind(other))),
            })
            .collect(),
        (Some(other), EntityLayout::Array { .. }) => Err(app_err!("field '{field}' should be an array, found {}", kind(other))),
        (Some(other), EntityLayout::Keyed) => Err(app_err!("field '{field}' should be an object, found {}", kind(other))),
    }
}

fn entity_name(entry: &Object, name_key: &str) -> String {
    [name_key, "name"]
        .into_iter()
        .find_map(|key| match entry.get(key) {
            Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN_ENTITY.to_string())
}
