use serde::Serialize;
use strum::{Display, EnumIter};

/// A monitoring platform whose coverage of the inventory is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    /// The asset inventory itself
    Inventory,

    /// The first log-ingestion platform
    SiemA,

    /// The second log-ingestion platform
    SiemB,

    /// Endpoint detection and response agent
    Edr,

    /// Device management agent
    DeviceManager,

    /// Data loss prevention agent
    Dlp,
}

impl Platform {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inventory => "Inventory",
            Self::SiemA => "SIEM-A",
            Self::SiemB => "SIEM-B",
            Self::Edr => "EDR",
            Self::DeviceManager => "Device management",
            Self::Dlp => "DLP",
        }
    }
}
