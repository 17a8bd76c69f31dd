//! Cache entries: the lifecycle record of one fingerprint.
//!
//! An entry starts as a placeholder when the first test unit registers
//! against its fingerprint, becomes `created` when the environment is
//! actually built, and then accumulates hits for every reuse. All mutable
//! fields live behind one per-entry mutex so that readers always see a
//! consistent combination of timestamps, duration and counters.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::fingerprint::ConfigurationFingerprint;

/// Resource cost observed when an environment was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CostSnapshot {
    /// Heap bytes in use at creation, when the host can report it.
    pub heap_used_bytes: Option<u64>,
    /// Available parallelism at creation.
    pub available_parallelism: Option<usize>,
}

impl CostSnapshot {
    pub const fn new(heap_used_bytes: u64, available_parallelism: usize) -> Self {
        Self {
            heap_used_bytes: Some(heap_used_bytes),
            available_parallelism: Some(available_parallelism),
        }
    }

    /// Captures what the current process can observe about itself.
    ///
    /// Heap usage is left empty: a native process has no portable view of
    /// it, so hosts that know it pass it through [`CostSnapshot::new`].
    pub fn capture() -> Self {
        Self {
            heap_used_bytes: None,
            available_parallelism: std::thread::available_parallelism()
                .ok()
                .map(std::num::NonZeroUsize::get),
        }
    }
}

/// A (test unit, method) pair that ran against an environment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MethodConsumer {
    pub test_unit: String,
    pub method: String,
}

impl MethodConsumer {
    /// `Unit.method` form used in logs and reports.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.test_unit, self.method)
    }
}

#[derive(Debug, Default)]
struct EntryState {
    consumers: Vec<String>,
    method_consumers: BTreeSet<MethodConsumer>,
    created: bool,
    creation_seq: Option<u64>,
    created_at: Option<DateTime<Utc>>,
    first_used_at: Option<DateTime<Utc>>,
    last_used_at: Option<DateTime<Utc>>,
    access_times: Vec<DateTime<Utc>>,
    hit_count: u64,
    load_duration_ms: u64,
    cost: CostSnapshot,
    nearest: Option<Arc<ConfigurationFingerprint>>,
    nearest_score: Option<u32>,
    size_proxy_names: BTreeSet<String>,
    size_proxy_count: usize,
}

/// Mutable lifecycle record for one fingerprint.
///
/// Owned by the tracker. Callers read it through [`CacheEntry::snapshot`]
/// or the individual accessors, each of which takes the entry lock once.
#[derive(Debug)]
pub struct CacheEntry {
    fingerprint: Arc<ConfigurationFingerprint>,
    context_id: String,
    registration_seq: u64,
    state: Mutex<EntryState>,
}

impl CacheEntry {
    pub(crate) fn new(
        fingerprint: Arc<ConfigurationFingerprint>,
        registration_seq: u64,
    ) -> Self {
        Self {
            fingerprint,
            context_id: format!("context-{registration_seq}"),
            registration_seq,
            state: Mutex::new(EntryState::default()),
        }
    }

    pub fn fingerprint(&self) -> &Arc<ConfigurationFingerprint> {
        &self.fingerprint
    }

    /// Human-readable identifier (`context-0`, `context-1`, ...) in
    /// registration order.
    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn is_created(&self) -> bool {
        self.state.lock().created
    }

    pub fn hit_count(&self) -> u64 {
        self.state.lock().hit_count
    }

    /// Nearest earlier fingerprint and its similarity score, read together.
    pub fn nearest_link(&self) -> Option<(Arc<ConfigurationFingerprint>, u32)> {
        let state = self.state.lock();
        state.nearest.clone().zip(state.nearest_score)
    }

    /// Adds a consuming test unit. Returns `false` if it was already known.
    pub(crate) fn add_consumer(&self, test_unit: &str) -> bool {
        let mut state = self.state.lock();
        if state.consumers.iter().any(|c| c == test_unit) {
            return false;
        }
        state.consumers.push(test_unit.to_string());
        true
    }

    pub(crate) fn add_method_consumer(&self, test_unit: &str, method: &str) {
        self.state.lock().method_consumers.insert(MethodConsumer {
            test_unit: test_unit.to_string(),
            method: method.to_string(),
        });
    }

    /// Marks the entry created at `at`.
    ///
    /// Returns `true` on the first transition. A repeated call overwrites the
    /// timing fields and cost but keeps the original creation sequence.
    pub(crate) fn mark_created(
        &self,
        at: DateTime<Utc>,
        load_duration_ms: u64,
        cost: CostSnapshot,
        creation_seq: u64,
    ) -> bool {
        let mut state = self.state.lock();
        let first = !state.created;
        state.created = true;
        if first {
            state.creation_seq = Some(creation_seq);
        }
        state.created_at = Some(at);
        state.first_used_at = Some(at);
        state.last_used_at = Some(at);
        state.access_times.push(at);
        state.load_duration_ms = load_duration_ms;
        state.cost = cost;
        first
    }

    /// Records a reuse at `at`. Returns `false` (and changes nothing) when
    /// the entry has not been created yet.
    pub(crate) fn record_hit(&self, at: DateTime<Utc>) -> bool {
        let mut state = self.state.lock();
        if !state.created {
            return false;
        }
        state.hit_count += 1;
        // Out-of-order timestamps must not move last-used backwards.
        let last = state.last_used_at.map_or(at, |last| last.max(at));
        state.last_used_at = Some(last);
        state.access_times.push(at);
        true
    }

    pub(crate) fn set_nearest(&self, nearest: Arc<ConfigurationFingerprint>, score: u32) {
        let mut state = self.state.lock();
        state.nearest = Some(nearest);
        state.nearest_score = Some(score);
    }

    pub(crate) fn set_size_proxy(&self, unit_names: BTreeSet<String>) {
        let mut state = self.state.lock();
        state.size_proxy_count = unit_names.len();
        state.size_proxy_names = unit_names;
    }

    pub(crate) const fn registration_seq(&self) -> u64 {
        self.registration_seq
    }

    /// Consistent, owned copy of the entry taken under one lock.
    pub fn snapshot(&self) -> EntrySnapshot {
        let state = self.state.lock();
        EntrySnapshot {
            context_id: self.context_id.clone(),
            fingerprint: Arc::clone(&self.fingerprint),
            consumers: state.consumers.clone(),
            method_consumers: state.method_consumers.iter().cloned().collect(),
            created: state.created,
            creation_seq: state.creation_seq,
            created_at: state.created_at,
            first_used_at: state.first_used_at,
            last_used_at: state.last_used_at,
            access_times: state.access_times.clone(),
            hit_count: state.hit_count,
            load_duration_ms: state.load_duration_ms,
            cost: state.cost,
            nearest: state.nearest.clone(),
            nearest_score: state.nearest_score,
            size_proxy_count: state.size_proxy_count,
            size_proxy_names: state.size_proxy_names.iter().cloned().collect(),
        }
    }
}

/// Read-only view of a [`CacheEntry`] at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct EntrySnapshot {
    pub context_id: String,
    pub fingerprint: Arc<ConfigurationFingerprint>,
    /// Consuming test units in registration order.
    pub consumers: Vec<String>,
    pub method_consumers: Vec<MethodConsumer>,
    pub created: bool,
    /// Position in the tracker's creation order, once created.
    pub creation_seq: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub first_used_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub access_times: Vec<DateTime<Utc>>,
    pub hit_count: u64,
    pub load_duration_ms: u64,
    pub cost: CostSnapshot,
    pub nearest: Option<Arc<ConfigurationFingerprint>>,
    /// Similarity score of the nearest link.
    pub nearest_score: Option<u32>,
    /// Number of units (beans) the environment defined.
    pub size_proxy_count: usize,
    pub size_proxy_names: Vec<String>,
}

impl EntrySnapshot {
    pub const fn is_created(&self) -> bool {
        self.created
    }

    /// First registered consumer, used as the entry's representative.
    pub fn representative_consumer(&self) -> Option<&str> {
        self.consumers.first().map(String::as_str)
    }

    /// Milliseconds between first and last use; 0 if used once or never.
    pub fn lifespan_ms(&self) -> i64 {
        match (self.first_used_at, self.last_used_at) {
            (Some(first), Some(last)) => (last - first).num_milliseconds(),
            _ => 0,
        }
    }

    /// Milliseconds since creation, or `None` if not created.
    pub fn age_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        self.created_at.map(|at| (now - at).num_milliseconds())
    }

    /// Milliseconds since the last use, or `None` if never used.
    pub fn idle_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_used_at.map(|at| (now - at).num_milliseconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry() -> CacheEntry {
        CacheEntry::new(Arc::new(ConfigurationFingerprint::new(["A"])), 3)
    }

    #[test]
    fn test_placeholder_state() {
        let entry = entry();
        let snap = entry.snapshot();
        assert_eq!(snap.context_id, "context-3");
        assert!(!snap.created);
        assert!(snap.created_at.is_none());
        assert_eq!(snap.hit_count, 0);
        assert_eq!(snap.lifespan_ms(), 0);
    }

    #[test]
    fn test_hit_before_creation_is_ignored() {
        let entry = entry();
        assert!(!entry.record_hit(Utc::now()));
        assert_eq!(entry.hit_count(), 0);
        assert!(entry.snapshot().access_times.is_empty());
    }

    #[test]
    fn test_creation_sets_timestamps() {
        let entry = entry();
        let at = Utc::now();
        assert!(entry.mark_created(at, 1200, CostSnapshot::new(1024, 8), 0));

        let snap = entry.snapshot();
        assert!(snap.created);
        assert_eq!(snap.created_at, Some(at));
        assert_eq!(snap.first_used_at, Some(at));
        assert_eq!(snap.last_used_at, Some(at));
        assert_eq!(snap.load_duration_ms, 1200);
        assert_eq!(snap.cost.heap_used_bytes, Some(1024));
        assert_eq!(snap.creation_seq, Some(0));
    }

    #[test]
    fn test_second_creation_overwrites_timing_but_not_sequence() {
        let entry = entry();
        let at = Utc::now();
        assert!(entry.mark_created(at, 100, CostSnapshot::default(), 4));
        assert!(!entry.mark_created(at + Duration::seconds(1), 300, CostSnapshot::default(), 9));

        let snap = entry.snapshot();
        assert_eq!(snap.load_duration_ms, 300);
        assert_eq!(snap.creation_seq, Some(4));
    }

    #[test]
    fn test_hits_extend_lifespan() {
        let entry = entry();
        let at = Utc::now();
        entry.mark_created(at, 100, CostSnapshot::default(), 0);
        assert!(entry.record_hit(at + Duration::milliseconds(250)));
        assert!(entry.record_hit(at + Duration::milliseconds(750)));

        let snap = entry.snapshot();
        assert_eq!(snap.hit_count, 2);
        assert_eq!(snap.access_times.len(), 3);
        assert_eq!(snap.lifespan_ms(), 750);
        assert_eq!(snap.age_ms(at + Duration::seconds(2)), Some(2000));
    }

    #[test]
    fn test_idle_time_counts_from_last_use() {
        let entry = entry();
        let at = Utc::now();
        assert_eq!(entry.snapshot().idle_ms(at), None);

        entry.mark_created(at, 100, CostSnapshot::default(), 0);
        entry.record_hit(at + Duration::milliseconds(400));

        let snap = entry.snapshot();
        assert_eq!(snap.idle_ms(at + Duration::seconds(1)), Some(600));
        assert_eq!(snap.age_ms(at + Duration::seconds(1)), Some(1000));
    }

    #[test]
    fn test_nearest_link_reads_fingerprint_and_score_together() {
        let entry = entry();
        assert!(entry.nearest_link().is_none());

        let nearest = Arc::new(ConfigurationFingerprint::new(["A", "B"]));
        entry.set_nearest(Arc::clone(&nearest), 10);
        assert_eq!(entry.nearest_link(), Some((nearest, 10)));
    }

    #[test]
    fn test_hit_count_is_wide() {
        let entry = entry();
        entry.mark_created(Utc::now(), 1, CostSnapshot::default(), 0);
        entry.state.lock().hit_count = u64::from(u32::MAX);
        assert!(entry.record_hit(Utc::now()));
        assert_eq!(entry.hit_count(), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_out_of_order_hit_keeps_last_used_monotonic() {
        let entry = entry();
        let at = Utc::now();
        entry.mark_created(at, 100, CostSnapshot::default(), 0);
        entry.record_hit(at + Duration::seconds(5));
        entry.record_hit(at + Duration::seconds(1));

        let snap = entry.snapshot();
        assert_eq!(snap.last_used_at, Some(at + Duration::seconds(5)));
        assert!(snap.last_used_at >= snap.first_used_at);
    }

    #[test]
    fn test_consumers_are_deduplicated_in_order() {
        let entry = entry();
        assert!(entry.add_consumer("b.SecondTest"));
        assert!(entry.add_consumer("a.FirstTest"));
        assert!(!entry.add_consumer("b.SecondTest"));

        let snap = entry.snapshot();
        assert_eq!(snap.consumers, vec!["b.SecondTest", "a.FirstTest"]);
        assert_eq!(snap.representative_consumer(), Some("b.SecondTest"));
    }

    #[test]
    fn test_method_consumers() {
        let entry = entry();
        entry.add_method_consumer("OrderTest", "creates");
        entry.add_method_consumer("OrderTest", "creates");
        entry.add_method_consumer("OrderTest", "deletes");

        let snap = entry.snapshot();
        assert_eq!(snap.method_consumers.len(), 2);
        assert_eq!(snap.method_consumers[0].qualified(), "OrderTest.creates");
    }

    #[test]
    fn test_size_proxy() {
        let entry = entry();
        entry.set_size_proxy(["a", "b", "c"].iter().map(|s| (*s).to_string()).collect());
        let snap = entry.snapshot();
        assert_eq!(snap.size_proxy_count, 3);
        assert_eq!(snap.size_proxy_names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_capture_reports_parallelism() {
        let cost = CostSnapshot::capture();
        assert!(cost.heap_used_bytes.is_none());
        assert!(cost.available_parallelism.unwrap_or(1) >= 1);
    }
}
