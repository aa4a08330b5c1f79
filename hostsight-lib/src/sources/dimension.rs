use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// An organizational axis along which visibility is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    /// The whole inventory as a single entity
    Global,

    /// Infrastructure types such as cloud, on-premise, or SaaS
    Infrastructure,

    /// Geographic regions, with country, data center, and cloud region slices
    Regional,

    /// Business units, with reporting executive and application slices
    BusinessUnit,

    /// System classifications such as web servers or databases
    SystemClassification,

    /// Security controls (EDR, device management, DLP)
    SecurityControl,

    /// Logging platforms (SIEM-A, SIEM-B)
    Logging,

    /// Network domains
    Domain,
}

impl Dimension {
    /// The endpoint path serving this dimension, relative to the data source base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Global => "/api/global_visibility",
            Self::Infrastructure => "/api/infrastructure_visibility",
            Self::Regional => "/api/regional_visibility",
            Self::BusinessUnit => "/api/business_unit_visibility",
            Self::SystemClassification => "/api/system_classification_visibility",
            Self::SecurityControl => "/api/security_control_coverage",
            Self::Logging => "/api/logging_compliance",
            Self::Domain => "/api/domain_visibility",
        }
    }

    /// Human-readable name used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Infrastructure => "Infrastructure",
            Self::Regional => "Regions",
            Self::BusinessUnit => "Business units",
            Self::SystemClassification => "System classifications",
            Self::SecurityControl => "Security controls",
            Self::Logging => "Logging",
            Self::Domain => "Domains",
        }
    }

    /// All dimensions, in reporting order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}
