use super::Severity;
use crate::Result;
use crate::sources::Dimension;
use core::str::FromStr;
use ohno::app_err;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pair of cut-offs splitting `[0, 100]` into three severity tiers.
///
/// Percentages below `critical_below` are critical, percentages at or above
/// `healthy_at` are healthy, and everything in between is a warning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tiers {
    pub critical_below: f64,
    pub healthy_at: f64,
}

impl Tiers {
    pub const DEFAULT: Self = Self {
        critical_below: 30.0,
        healthy_at: 70.0,
    };

    /// Classify a percentage.
    ///
    /// NaN is treated as 0 and out-of-range values are clamped into `[0, 100]`, so
    /// every input yields exactly one severity.
    #[must_use]
    pub fn classify(self, percentage: f64) -> Severity {
        let p = if percentage.is_nan() { 0.0 } else { percentage.clamp(0.0, 100.0) };

        if p < self.critical_below {
            Severity::Critical
        } else if p < self.healthy_at {
            Severity::Warning
        } else {
            Severity::Healthy
        }
    }

    /// Check both cut-offs lie in `[0, 100]` and are ordered.
    ///
    /// # Errors
    ///
    /// Returns an error naming `context` if either value is out of range or the pair is inverted.
    pub fn validate(&self, context: &str) -> Result<()> {
        if !(0.0..=100.0).contains(&self.critical_below) {
            return Err(app_err!(
                "{context}: critical_below must be between 0 and 100, got {}",
                self.critical_below
            ));
        }

        if !(0.0..=100.0).contains(&self.healthy_at) {
            return Err(app_err!("{context}: healthy_at must be between 0 and 100, got {}", self.healthy_at));
        }

        if self.critical_below > self.healthy_at {
            return Err(app_err!(
                "{context}: critical_below ({}) must not exceed healthy_at ({})",
                self.critical_below,
                self.healthy_at
            ));
        }

        Ok(())
    }
}

impl Default for Tiers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn default_critical_below() -> f64 {
    Tiers::DEFAULT.critical_below
}

const fn default_healthy_at() -> f64 {
    Tiers::DEFAULT.healthy_at
}

/// Default tiers plus per-dimension overrides, keyed by dimension name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdTable {
    #[serde(default = "default_critical_below")]
    pub critical_below: f64,

    #[serde(default = "default_healthy_at")]
    pub healthy_at: f64,

    /// Tiers replacing the defaults for specific dimensions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, Tiers>,
}

impl ThresholdTable {
    #[must_use]
    pub const fn default_tiers(&self) -> Tiers {
        Tiers {
            critical_below: self.critical_below,
            healthy_at: self.healthy_at,
        }
    }

    /// Replace the tiers used for `dimension`.
    #[must_use]
    pub fn with_override(mut self, dimension: Dimension, tiers: Tiers) -> Self {
        let _ = self.overrides.insert(dimension.to_string(), tiers);
        self
    }

    /// The tiers that apply to `dimension`.
    #[must_use]
    pub fn tiers_for(&self, dimension: Dimension) -> Tiers {
        self.overrides
            .get(<&'static str>::from(dimension))
            .copied()
            .unwrap_or_else(|| self.default_tiers())
    }

    #[must_use]
    pub fn classify(&self, dimension: Dimension, percentage: f64) -> Severity {
        self.tiers_for(dimension).classify(percentage)
    }

    /// Check the default tiers and every override, and that overrides name known dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid entry.
    pub fn validate(&self) -> Result<()> {
        self.default_tiers().validate("thresholds")?;

        for (name, tiers) in &self.overrides {
            if Dimension::from_str(name).is_err() {
                let known: Vec<_> = Dimension::all().map(|d| d.to_string()).collect();
                return Err(app_err!(
                    "thresholds.overrides: unknown dimension '{name}', expected one of {}",
                    known.join(", ")
                ));
            }
            tiers.validate(&format!("thresholds.overrides.{name}"))?;
        }

        Ok(())
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            critical_below: Tiers::DEFAULT.critical_below,
            healthy_at: Tiers::DEFAULT.healthy_at,
            overrides: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_boundaries() {
        let tiers = Tiers::DEFAULT;
        assert_eq!(tiers.classify(0.0), Severity::Critical);
        assert_eq!(tiers.classify(29.99), Severity::Critical);
        assert_eq!(tiers.classify(30.0), Severity::Warning);
        assert_eq!(tiers.classify(69.99), Severity::Warning);
        assert_eq!(tiers.classify(70.0), Severity::Healthy);
        assert_eq!(tiers.classify(100.0), Severity::Healthy);
    }

    #[test]
    fn test_out_of_range_and_nan_are_clamped() {
        let tiers = Tiers::DEFAULT;
        assert_eq!(tiers.classify(f64::NAN), Severity::Critical);
        assert_eq!(tiers.classify(-5.0), Severity::Critical);
        assert_eq!(tiers.classify(250.0), Severity::Healthy);
        assert_eq!(tiers.classify(f64::INFINITY), Severity::Healthy);
        assert_eq!(tiers.classify(f64::NEG_INFINITY), Severity::Critical);
    }

    #[test]
    fn test_severity_is_monotonic() {
        let tiers = Tiers {
            critical_below: 50.0,
            healthy_at: 80.0,
        };
        let mut previous = Severity::Critical;
        for step in 0..=1000_u32 {
            let p = f64::from(step) / 10.0;
            let severity = tiers.classify(p);
            assert!(severity <= previous, "severity rose at {p}");
            previous = severity;
        }
    }

    #[test]
    fn test_collapsed_warning_band() {
        let tiers = Tiers {
            critical_below: 50.0,
            healthy_at: 50.0,
        };
        assert_eq!(tiers.classify(49.9), Severity::Critical);
        assert_eq!(tiers.classify(50.0), Severity::Healthy);
    }

    #[test]
    fn test_tiers_validate() {
        Tiers::DEFAULT.validate("t").unwrap();
        Tiers {
            critical_below: 0.0,
            healthy_at: 100.0,
        }
        .validate("t")
        .unwrap();
        let _ = Tiers {
            critical_below: -1.0,
            healthy_at: 70.0,
        }
        .validate("t")
        .unwrap_err();
        let _ = Tiers {
            critical_below: 30.0,
            healthy_at: 100.5,
        }
        .validate("t")
        .unwrap_err();
        let _ = Tiers {
            critical_below: 80.0,
            healthy_at: 70.0,
        }
        .validate("t")
        .unwrap_err();
        let _ = Tiers {
            critical_below: f64::NAN,
            healthy_at: 70.0,
        }
        .validate("t")
        .unwrap_err();
    }

    #[test]
    fn test_overrides_apply_per_dimension() {
        let table = ThresholdTable::default().with_override(
            Dimension::Logging,
            Tiers {
                critical_below: 50.0,
                healthy_at: 80.0,
            },
        );

        assert_eq!(table.classify(Dimension::Logging, 45.0), Severity::Critical);
        assert_eq!(table.classify(Dimension::Regional, 45.0), Severity::Warning);
        assert_eq!(table.tiers_for(Dimension::Global), Tiers::DEFAULT);
        table.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_unknown_override() {
        let mut table = ThresholdTable::default();
        let _ = table.overrides.insert("galaxy".to_string(), Tiers::DEFAULT);
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("galaxy"), "{err}");
    }

    #[test]
    fn test_validate_rejects_bad_override() {
        let table = ThresholdTable::default().with_override(
            Dimension::Domain,
            Tiers {
                critical_below: 90.0,
                healthy_at: 10.0,
            },
        );
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("thresholds.overrides.domain"), "{err}");
    }

    #[test]
    fn test_deserialize_from_toml() {
        let table: ThresholdTable = toml::from_str(
            r"
critical_below = 25.0
healthy_at = 75.0

[overrides.business_unit]
critical_below = 50.0
healthy_at = 80.0
",
        )
        .unwrap();

        assert!((table.default_tiers().critical_below - 25.0).abs() < f64::EPSILON);
        assert_eq!(table.classify(Dimension::BusinessUnit, 60.0), Severity::Warning);
        assert_eq!(table.classify(Dimension::BusinessUnit, 45.0), Severity::Critical);
        table.validate().unwrap();
    }

    #[test]
    fn test_deserialize_defaults_when_empty() {
        let table: ThresholdTable = toml::from_str("").unwrap();
        assert_eq!(table, ThresholdTable::default());
    }
}
