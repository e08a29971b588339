use serde::{Deserialize, Serialize};

use crate::state::Feature;

/// Descriptive metadata for a feature: display label, grouping, and whether
/// the feature counts as enabled before any state has been persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureMetadata {
    label: String,
    #[serde(default)]
    enabled_by_default: bool,
    #[serde(default)]
    groups: Vec<String>,
}

impl FeatureMetadata {
    pub fn new(label: impl Into<String>) -> Self {
        FeatureMetadata {
            label: label.into(),
            enabled_by_default: false,
            groups: Vec::new(),
        }
    }

    pub fn enabled_by_default(mut self, enabled: bool) -> Self {
        self.enabled_by_default = enabled;
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    pub fn display_label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled_by_default(&self) -> bool {
        self.enabled_by_default
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

/// Supplies feature metadata to the [FeatureManager](crate::FeatureManager).
/// Consulted only when no persisted state exists for a feature.
pub trait FeatureMetadataSource: Send + Sync {
    fn metadata_for(&self, feature: &Feature) -> Option<FeatureMetadata>;

    /// All features the source knows about, in declaration order.
    fn features(&self) -> Vec<Feature>;
}

/// An explicit, data-driven metadata table, assembled at application start.
#[derive(Clone, Debug, Default)]
pub struct StaticFeatureMetadataSource {
    entries: Vec<(Feature, FeatureMetadata)>,
}

impl StaticFeatureMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a feature to the table.
    pub fn feature(mut self, feature: impl Into<Feature>, metadata: FeatureMetadata) -> Self {
        self.entries.push((feature.into(), metadata));
        self
    }
}

impl FeatureMetadataSource for StaticFeatureMetadataSource {
    fn metadata_for(&self, feature: &Feature) -> Option<FeatureMetadata> {
        self.entries
            .iter()
            .find(|(f, _)| f == feature)
            .map(|(_, metadata)| metadata.clone())
    }

    fn features(&self) -> Vec<Feature> {
        self.entries.iter().map(|(f, _)| f.clone()).collect()
    }
}
