use serde::Serialize;

const LOG_TARGET: &str = "    metrics";

/// A visible count paired with the total it belongs to, with `visible <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub total: u64,
    pub visible: u64,

    /// Whether the raw values were out of range and had to be adjusted
    pub clamped: bool,
}

impl Counts {
    /// Pair two counts, clamping `visible` to `total`.
    #[must_use]
    pub const fn new(total: u64, visible: u64) -> Self {
        if visible > total {
            Self {
                total,
                visible: total,
                clamped: true,
            }
        } else {
            Self {
                total,
                visible,
                clamped: false,
            }
        }
    }

    /// Pair two raw JSON numbers.
    ///
    /// Negative and NaN values become 0 and fractional values are rounded.
    #[must_use]
    pub fn from_raw(total: f64, visible: f64) -> Self {
        let (total, total_adjusted) = raw_count(total);
        Self::share_of(total, visible).flag(total_adjusted)
    }

    /// Build counts from a covered part and an uncovered part, which together make up the total.
    #[must_use]
    pub fn from_split(covered: f64, uncovered: f64) -> Self {
        let (covered, covered_adjusted) = raw_count(covered);
        let (uncovered, uncovered_adjusted) = raw_count(uncovered);
        Self::new(covered.saturating_add(uncovered), covered).flag(covered_adjusted || uncovered_adjusted)
    }

    /// A raw count measured against an already known total.
    #[must_use]
    pub fn share_of(total: u64, visible: f64) -> Self {
        let (visible, adjusted) = raw_count(visible);
        Self::new(total, visible).flag(adjusted)
    }

    /// Reconstruct a visible count from a percentage of `total`.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "host counts stay far below 2^52")]
    pub fn from_percentage(total: u64, percentage: f64) -> Self {
        let in_range = (0.0..=100.0).contains(&percentage);
        let p = if percentage.is_nan() { 0.0 } else { percentage.clamp(0.0, 100.0) };
        Self::share_of(total, (p / 100.0 * total as f64).round()).flag(!in_range)
    }

    #[must_use]
    pub const fn invisible(self) -> u64 {
        self.total.saturating_sub(self.visible)
    }

    #[must_use]
    pub fn percentage(self) -> f64 {
        percentage(self.visible, self.total)
    }

    const fn flag(mut self, adjusted: bool) -> Self {
        self.clamped |= adjusted;
        self
    }
}

/// Convert a raw JSON number into a count, reporting whether it had to be adjusted.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "value is positive and saturates")]
pub(crate) fn raw_count(raw: f64) -> (u64, bool) {
    if raw.is_nan() || raw < 0.0 {
        return (0, true);
    }

    let rounded = raw.round();
    (rounded as u64, raw.fract() != 0.0)
}

/// Percentage of `total` that is visible, `0` when there is nothing to see.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "host counts stay far below 2^52")]
pub fn percentage(visible: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    (visible.min(total) as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// The share of assets that is not visible.
///
/// Applied uniformly, so an entity with no assets reads as a full gap.
#[must_use]
pub fn gap_percentage(percentage: f64) -> f64 {
    (100.0 - percentage).clamp(0.0, 100.0)
}

/// Combination counts supplied directly by a data source, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KnownOverlap {
    pub both: Option<u64>,
    pub either: Option<u64>,
}

/// How two platforms' visible sets combine over the same population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformOverlap {
    /// Assets visible on both platforms
    pub both: u64,

    /// Assets visible on at least one platform
    pub either: u64,

    /// Assets visible on neither platform
    pub neither: u64,

    /// False when the buckets are estimated from per-platform counts alone
    pub exact: bool,
}

impl PlatformOverlap {
    /// Derive the combination buckets for platforms seeing `visible_a` and `visible_b` of `total` assets.
    ///
    /// When the source supplies `both` or `either`, those values are used and the
    /// other is completed by inclusion-exclusion. Otherwise the buckets are
    /// estimated as `both = min(a, b)` and `either = max(a, b)`, since the true
    /// intersection cannot be known from aggregates. Every supplied value is clamped
    /// into its feasible range, so `neither + either == total` always holds.
    #[must_use]
    pub fn derive(total: u64, visible_a: u64, visible_b: u64, known: KnownOverlap) -> Self {
        let a = visible_a.min(total);
        let b = visible_b.min(total);
        let sum = a.saturating_add(b);

        let either_range = (a.max(b), sum.min(total));
        let both_range = (sum.saturating_sub(total), a.min(b));

        let (both, either, exact) = match (known.both, known.either) {
            (None, None) => (a.min(b), a.max(b), false),
            (Some(both), None) => {
                let both = clamp_logged("both", both, both_range);
                (both, sum.saturating_sub(both), true)
            }
            (None, Some(either)) => {
                let either = clamp_logged("either", either, either_range);
                (sum.saturating_sub(either), either, true)
            }
            (Some(both), Some(either)) => (
                clamp_logged("both", both, both_range),
                clamp_logged("either", either, either_range),
                true,
            ),
        };

        Self {
            both,
            either,
            neither: total.saturating_sub(either),
            exact,
        }
    }
}

fn clamp_logged(bucket: &str, value: u64, (low, high): (u64, u64)) -> u64 {
    let clamped = value.clamp(low, high);
    if clamped != value {
        log::warn!(target: LOG_TARGET, "Supplied '{bucket}' count {value} is outside [{low}, {high}], clamped to {clamped}");
    }
    clamped
}
