//! Recorded test-run traces.
//!
//! A trace declares the fingerprints a run used under short names and lists
//! the lifecycle calls the host runner made, in order. Replaying a trace
//! into a fresh tracker reproduces the run's cache state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::fingerprint::ConfigurationFingerprint;

/// A complete trace document (JSON or YAML).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceDocument {
    /// Fingerprints keyed by the name events refer to them with.
    #[serde(default)]
    pub fingerprints: BTreeMap<String, ConfigurationFingerprint>,

    /// Lifecycle calls in the order the runner made them.
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

/// One recorded lifecycle call.
///
/// Timestamps are optional; events without one are stamped with the replay
/// clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A test unit resolved its fingerprint.
    Register {
        fingerprint: String,
        test_unit: String,
    },
    /// A test method ran against the unit's environment.
    Method {
        fingerprint: String,
        test_unit: String,
        method: String,
    },
    /// The environment was built.
    Created {
        fingerprint: String,
        load_ms: u64,
        #[serde(default)]
        heap_used_bytes: Option<u64>,
        #[serde(default)]
        available_parallelism: Option<usize>,
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    /// The environment was reused from the cache.
    Hit {
        fingerprint: String,
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    /// The units the environment defined.
    SizeProxy {
        fingerprint: String,
        units: Vec<String>,
    },
    /// A test unit obtained its environment; the replay decides between
    /// creation and hit the way a host runner does.
    Load {
        fingerprint: String,
        test_unit: String,
        load_ms: u64,
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
}

impl TraceEvent {
    /// Name of the fingerprint the event refers to.
    pub fn fingerprint(&self) -> &str {
        match self {
            Self::Register { fingerprint, .. }
            | Self::Method { fingerprint, .. }
            | Self::Created { fingerprint, .. }
            | Self::Hit { fingerprint, .. }
            | Self::SizeProxy { fingerprint, .. }
            | Self::Load { fingerprint, .. } => fingerprint,
        }
    }
}
