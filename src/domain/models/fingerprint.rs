//! Configuration fingerprints.
//!
//! A fingerprint describes how a test environment was wired: which classes
//! contributed beans, which profiles were active, which loader built it and
//! which property overrides or initializers were applied. Two test units that
//! build equal fingerprints can share one cached environment, so equality is
//! structural over every attribute.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Immutable descriptor of how an environment was built.
///
/// Construct with [`ConfigurationFingerprint::new`] and the `with_*` builder
/// methods. Once handed to a [`CacheTracker`](crate::services::CacheTracker)
/// it is shared behind an [`Arc`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigurationFingerprint {
    /// Wiring classes in declaration order, without duplicates.
    #[serde(default, deserialize_with = "deserialize_wiring_classes")]
    wiring_classes: Vec<String>,

    /// Active profile names.
    #[serde(default)]
    active_profiles: BTreeSet<String>,

    /// Loader type identifier, if known.
    #[serde(default)]
    loader: Option<String>,

    /// Inlined property overrides (`key=value`) in declaration order.
    #[serde(default)]
    property_overrides: Vec<String>,

    /// Initializer class identifiers.
    #[serde(default)]
    initializers: BTreeSet<String>,

    /// Fingerprint of the parent environment in a hierarchy.
    #[serde(default)]
    parent: Option<Arc<ConfigurationFingerprint>>,

    /// Customizer identifiers.
    #[serde(default)]
    customizers: BTreeSet<String>,
}

impl ConfigurationFingerprint {
    /// Creates a fingerprint from its wiring classes.
    ///
    /// Duplicate class identifiers are dropped; the first occurrence keeps its
    /// position.
    pub fn new<I, S>(wiring_classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            wiring_classes: dedup_first_occurrence(wiring_classes.into_iter().map(Into::into)),
            active_profiles: BTreeSet::new(),
            loader: None,
            property_overrides: Vec::new(),
            initializers: BTreeSet::new(),
            parent: None,
            customizers: BTreeSet::new(),
        }
    }

    /// Sets the active profiles.
    #[must_use]
    pub fn with_profiles<I, S>(mut self, profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the loader type identifier.
    #[must_use]
    pub fn with_loader(mut self, loader: impl Into<String>) -> Self {
        self.loader = Some(loader.into());
        self
    }

    /// Sets the property overrides.
    #[must_use]
    pub fn with_property_overrides<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property_overrides = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the initializer classes.
    #[must_use]
    pub fn with_initializers<I, S>(mut self, initializers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initializers = initializers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the customizer identifiers.
    #[must_use]
    pub fn with_customizers<I, S>(mut self, customizers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.customizers = customizers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the parent fingerprint.
    #[must_use]
    pub fn with_parent(mut self, parent: Arc<Self>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn wiring_classes(&self) -> &[String] {
        &self.wiring_classes
    }

    pub fn active_profiles(&self) -> &BTreeSet<String> {
        &self.active_profiles
    }

    pub fn loader(&self) -> Option<&str> {
        self.loader.as_deref()
    }

    pub fn property_overrides(&self) -> &[String] {
        &self.property_overrides
    }

    pub fn initializers(&self) -> &BTreeSet<String> {
        &self.initializers
    }

    pub fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    pub fn customizers(&self) -> &BTreeSet<String> {
        &self.customizers
    }

    /// Condensed, report-friendly view of this fingerprint.
    pub fn summary(&self) -> FingerprintSummary {
        FingerprintSummary {
            wiring_classes: self
                .wiring_classes
                .iter()
                .map(|c| short_name(c).to_string())
                .collect(),
            active_profiles: self.active_profiles.iter().cloned().collect(),
            loader: self.loader.as_deref().map(|l| short_name(l).to_string()),
            property_count: self.property_overrides.len(),
            initializers: self
                .initializers
                .iter()
                .map(|i| short_name(i).to_string())
                .collect(),
            customizers: self.customizers.iter().cloned().collect(),
            has_parent: self.parent.is_some(),
        }
    }
}

/// Summary of a fingerprint for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerprintSummary {
    pub wiring_classes: Vec<String>,
    pub active_profiles: Vec<String>,
    pub loader: Option<String>,
    pub property_count: usize,
    pub initializers: Vec<String>,
    pub customizers: Vec<String>,
    pub has_parent: bool,
}

/// Returns the part of a qualified identifier after its last `.` or `::`.
///
/// `com.example.OrderServiceTest` becomes `OrderServiceTest`;
/// `app::tests::orders` becomes `orders`.
pub fn short_name(identifier: &str) -> &str {
    identifier
        .rsplit(|c| c == '.' || c == ':')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(identifier)
}

fn dedup_first_occurrence(classes: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for class in classes {
        if !unique.contains(&class) {
            unique.push(class);
        }
    }
    unique
}

fn deserialize_wiring_classes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer).map(dedup_first_occurrence)
}
