use super::Platform;
use crate::sources::Dimension;

/// How an entity's two counts are spelled in a payload.
#[derive(Debug, Clone, Copy)]
pub enum CountFields {
    /// A total and the visible part of it
    TotalVisible { total: &'static str, visible: &'static str },

    /// Covered and uncovered parts which add up to the total
    Split { covered: &'static str, uncovered: &'static str },

    /// A covered count measured against the enclosing object's total
    Share { covered: &'static str },
}

/// Where an entity's name comes from.
#[derive(Debug, Clone, Copy)]
pub enum EntityLayout {
    /// An array of objects, each carrying its name under the given key
    Array { name_key: &'static str },

    /// An object whose keys are the entity names
    Keyed,
}

/// A list of entities inside a payload.
#[derive(Debug)]
pub struct ListDef {
    /// Name the list is reported under
    pub name: &'static str,
    pub field: &'static str,
    pub layout: EntityLayout,
    pub counts: CountFields,
}

/// A single named roll-up object.
#[derive(Debug)]
pub struct RollupDef {
    pub name: &'static str,
    pub field: &'static str,
    pub counts: CountFields,
}

/// The coverage object of one platform.
#[derive(Debug)]
pub struct ControlDef {
    pub platform: Platform,
    pub field: &'static str,
    pub counts: CountFields,

    /// Per-vendor or per-status entities nested inside the coverage object
    pub breakdown: Option<ListDef>,
}

/// Combination buckets for two platforms, supplied by the payload.
#[derive(Debug)]
pub struct CombinedDef {
    pub name: &'static str,
    pub field: &'static str,
    pub platforms: (Platform, Platform),
    pub both: &'static str,
    pub either: &'static str,
    pub count: &'static str,
}

#[derive(Debug)]
pub enum Layout {
    /// A single flat metric, with per-platform percentages beside it
    Single {
        counts: CountFields,
        platform_percentages: &'static [(Platform, &'static str)],
    },

    /// A primary list of entities plus secondary lists and roll-ups
    Breakdown {
        items: ListDef,
        slices: &'static [ListDef],
        highlights: &'static [RollupDef],
    },

    /// One coverage object per platform measured against a shared total
    Controls {
        total: &'static str,
        controls: &'static [ControlDef],
        highlights: &'static [RollupDef],
        combined: Option<CombinedDef>,
    },
}

#[derive(Debug)]
pub struct SchemaDef {
    pub dimension: Dimension,
    pub layout: Layout,
}

const HOST_COUNTS: CountFields = CountFields::TotalVisible {
    total: "total_hosts",
    visible: "visible_hosts",
};

macro_rules! list_def {
    ($name:expr, $field:expr, $name_key:expr) => {
        list_def!($name, $field, $name_key, HOST_COUNTS)
    };
    ($name:expr, $field:expr, $name_key:expr, $counts:expr) => {
        ListDef {
            name: $name,
            field: $field,
            layout: EntityLayout::Array { name_key: $name_key },
            counts: $counts,
        }
    };
}

macro_rules! keyed_def {
    ($name:expr, $field:expr) => {
        ListDef {
            name: $name,
            field: $field,
            layout: EntityLayout::Keyed,
            counts: HOST_COUNTS,
        }
    };
}

pub const SCHEMA_DEFINITIONS: &[SchemaDef] = &[
    SchemaDef {
        dimension: Dimension::Global,
        layout: Layout::Single {
            counts: HOST_COUNTS,
            platform_percentages: &[
                (Platform::SiemA, "splunk_visibility_percentage"),
                (Platform::SiemB, "chronicle_visibility_percentage"),
            ],
        },
    },
    SchemaDef {
        dimension: Dimension::Infrastructure,
        layout: Layout::Breakdown {
            items: list_def!("infrastructure_types", "detailed_breakdown", "infrastructure_type"),
            slices: &[keyed_def!("categories", "category_summary")],
            highlights: &[],
        },
    },
    SchemaDef {
        dimension: Dimension::Regional,
        layout: Layout::Breakdown {
            items: list_def!("regions", "regional_breakdown", "region"),
            slices: &[
                list_def!("countries", "country_breakdown", "country"),
                list_def!("data_centers", "datacenter_breakdown", "data_center"),
                list_def!("cloud_regions", "cloud_region_breakdown", "cloud_region"),
            ],
            highlights: &[],
        },
    },
    SchemaDef {
        dimension: Dimension::BusinessUnit,
        layout: Layout::Breakdown {
            items: list_def!("business_units", "business_unit_breakdown", "business_unit"),
            slices: &[
                list_def!("executives", "cio_breakdown", "cio"),
                list_def!("applications", "apm_breakdown", "apm"),
                list_def!("application_classes", "application_class_breakdown", "application_class"),
            ],
            highlights: &[],
        },
    },
    SchemaDef {
        dimension: Dimension::SystemClassification,
        layout: Layout::Breakdown {
            items: list_def!("system_classifications", "detailed_breakdown", "system_classification"),
            slices: &[keyed_def!("categories", "category_summary")],
            highlights: &[],
        },
    },
    SchemaDef {
        dimension: Dimension::SecurityControl,
        layout: Layout::Controls {
            total: "total_hosts",
            controls: &[
                ControlDef {
                    platform: Platform::Edr,
                    field: "edr_coverage",
                    counts: CountFields::Split {
                        covered: "protected_hosts",
                        uncovered: "unprotected_hosts",
                    },
                    breakdown: Some(list_def!(
                        "edr_vendors",
                        "vendor_breakdown",
                        "vendor",
                        CountFields::Share { covered: "host_count" }
                    )),
                },
                ControlDef {
                    platform: Platform::DeviceManager,
                    field: "tanium_coverage",
                    counts: CountFields::Split {
                        covered: "managed_hosts",
                        uncovered: "unmanaged_hosts",
                    },
                    breakdown: None,
                },
                ControlDef {
                    platform: Platform::Dlp,
                    field: "dlp_coverage",
                    counts: CountFields::Split {
                        covered: "protected_hosts",
                        uncovered: "unprotected_hosts",
                    },
                    breakdown: Some(list_def!(
                        "dlp_vendors",
                        "vendor_breakdown",
                        "vendor",
                        CountFields::Share { covered: "host_count" }
                    )),
                },
            ],
            highlights: &[RollupDef {
                name: "all_controls",
                field: "all_controls_coverage",
                counts: CountFields::Share {
                    covered: "fully_protected_hosts",
                },
            }],
            combined: None,
        },
    },
    SchemaDef {
        dimension: Dimension::Logging,
        layout: Layout::Controls {
            total: "total_hosts",
            controls: &[
                ControlDef {
                    platform: Platform::SiemA,
                    field: "splunk_compliance",
                    counts: CountFields::Split {
                        covered: "compliant_hosts",
                        uncovered: "non_compliant_hosts",
                    },
                    breakdown: Some(list_def!(
                        "siem_a_statuses",
                        "status_breakdown",
                        "status",
                        CountFields::Share { covered: "host_count" }
                    )),
                },
                ControlDef {
                    platform: Platform::SiemB,
                    field: "chronicle_compliance",
                    counts: CountFields::Split {
                        covered: "compliant_hosts",
                        uncovered: "non_compliant_hosts",
                    },
                    breakdown: Some(list_def!(
                        "siem_b_statuses",
                        "status_breakdown",
                        "status",
                        CountFields::Share { covered: "host_count" }
                    )),
                },
            ],
            highlights: &[],
            combined: Some(CombinedDef {
                name: "either_platform",
                field: "combined_compliance",
                platforms: (Platform::SiemA, Platform::SiemB),
                both: "both_platforms",
                either: "either_platform",
                count: "host_count",
            }),
        },
    },
    SchemaDef {
        dimension: Dimension::Domain,
        layout: Layout::Breakdown {
            items: list_def!("domains", "domain_breakdown", "domain"),
            slices: &[],
            highlights: &[
                RollupDef {
                    name: "tdc",
                    field: "tdc_visibility",
                    counts: HOST_COUNTS,
                },
                RollupDef {
                    name: "lead",
                    field: "lead_visibility",
                    counts: HOST_COUNTS,
                },
            ],
        },
    },
];

/// The payload layout registered for `dimension`.
#[must_use]
pub fn schema_for(dimension: Dimension) -> Option<&'static SchemaDef> {
    SCHEMA_DEFINITIONS.iter().find(|def| def.dimension == dimension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_dimension_has_exactly_one_schema() {
        for dimension in Dimension::all() {
            let count = SCHEMA_DEFINITIONS.iter().filter(|def| def.dimension == dimension).count();
            assert_eq!(count, 1, "{dimension} should have exactly one schema");
            assert!(schema_for(dimension).is_some());
        }
    }

    #[test]
    fn test_slice_names_are_unique_per_dimension() {
        for def in SCHEMA_DEFINITIONS {
            let names: Vec<&str> = match &def.layout {
                Layout::Single { .. } => Vec::new(),
                Layout::Breakdown { slices, highlights, .. } => {
                    slices.iter().map(|s| s.name).chain(highlights.iter().map(|h| h.name)).collect()
                }
                Layout::Controls {
                    controls,
                    highlights,
                    combined,
                    ..
                } => controls
                    .iter()
                    .filter_map(|c| c.breakdown.as_ref().map(|b| b.name))
                    .chain(highlights.iter().map(|h| h.name))
                    .chain(combined.iter().map(|c| c.name))
                    .collect(),
            };
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len(), "duplicate names in {} schema", def.dimension);
        }
    }

    #[test]
    fn test_combined_platforms_are_controls() {
        for def in SCHEMA_DEFINITIONS {
            if let Layout::Controls {
                controls,
                combined: Some(combined),
                ..
            } = &def.layout
            {
                let platforms: Vec<_> = controls.iter().map(|c| c.platform).collect();
                assert!(platforms.contains(&combined.platforms.0));
                assert!(platforms.contains(&combined.platforms.1));
            }
        }
    }
}
