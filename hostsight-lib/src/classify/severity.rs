use serde::Serialize;
use strum::{Display, EnumIter, IntoStaticStr};

/// Health tier of a visibility percentage, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, IntoStaticStr, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Healthy,
    Warning,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Severity::Healthy < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn test_display_and_serde_agree() {
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
        assert_eq!(<&str>::from(Severity::Warning), "WARNING");
        assert_eq!(serde_json::to_string(&Severity::Healthy).unwrap(), "\"HEALTHY\"");
    }
}
