//! Similarity scoring between configuration fingerprints.
//!
//! The score is an unnormalized sum that privileges structural similarity:
//! every shared wiring class is worth more than all the value-level terms
//! combined.

use std::collections::HashSet;

use crate::domain::models::ConfigurationFingerprint;

/// Points per wiring class present in both fingerprints.
pub const SHARED_CLASS_WEIGHT: u32 = 10;
/// Points when the active profile sets are identical.
pub const EQUAL_PROFILES_WEIGHT: u32 = 5;
/// Points when both loaders are known and identical.
pub const SAME_LOADER_WEIGHT: u32 = 3;
/// Points per property override present in both fingerprints.
pub const SHARED_PROPERTY_WEIGHT: u32 = 1;
/// Points when the initializer sets are identical and non-empty.
pub const EQUAL_INITIALIZERS_WEIGHT: u32 = 2;

/// Scores how similar two fingerprints are. Higher is more similar; 0 means
/// nothing in common.
///
/// Every term is an intersection or equality test, so the score is
/// symmetric.
pub fn score(a: &ConfigurationFingerprint, b: &ConfigurationFingerprint) -> u32 {
    let mut score = SHARED_CLASS_WEIGHT * common_count(a.wiring_classes(), b.wiring_classes());

    if a.active_profiles() == b.active_profiles() {
        score += EQUAL_PROFILES_WEIGHT;
    }

    if let (Some(left), Some(right)) = (a.loader(), b.loader()) {
        if left == right {
            score += SAME_LOADER_WEIGHT;
        }
    }

    score += SHARED_PROPERTY_WEIGHT * common_count(a.property_overrides(), b.property_overrides());

    // Two environments without initializers share nothing here.
    if !a.initializers().is_empty() && a.initializers() == b.initializers() {
        score += EQUAL_INITIALIZERS_WEIGHT;
    }

    score
}

fn common_count(left: &[String], right: &[String]) -> u32 {
    let left: HashSet<&str> = left.iter().map(String::as_str).collect();
    let right: HashSet<&str> = right.iter().map(String::as_str).collect();
    u32::try_from(left.intersection(&right).count()).unwrap_or(u32::MAX)
}
