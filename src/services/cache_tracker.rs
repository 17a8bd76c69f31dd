//! Concurrent registry of test-environment cache entries.
//!
//! The host test runner reports every lifecycle step of every test unit to a
//! shared [`CacheTracker`]: which fingerprint a unit resolved, whether the
//! environment had to be built (a miss) or was reused (a hit), and how
//! expensive the build was. At suite end the tracker's entries feed the
//! [`OptimizationAnalyzer`](super::OptimizationAnalyzer) and the
//! [`TimelineBuilder`](super::TimelineBuilder).
//!
//! Every recording method can be called from any thread without external
//! locking. The map uses insert-if-absent so concurrent first registrations
//! of the same fingerprint produce exactly one entry. Caller-contract
//! violations (hits before creation, methods before registration) are
//! ignored rather than reported; instrumentation must never fail the suite
//! it observes.
//!
//! Lock order is creation order, then entry. The nearest-fingerprint scan
//! copies the creation order before visiting entries.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace};

use super::similarity;
use crate::domain::models::{
    CacheEntry, CacheStatistics, ConfigurationFingerprint, CostSnapshot, EntrySnapshot,
};

/// Tracks environment creation and reuse for one test-suite run.
///
/// Construct one per run and share it by [`Arc`]; dropping it or calling
/// [`clear`](Self::clear) ends the run's bookkeeping.
#[derive(Debug, Default)]
pub struct CacheTracker {
    entries: DashMap<Arc<ConfigurationFingerprint>, Arc<CacheEntry>>,
    unit_to_fingerprint: DashMap<String, Arc<ConfigurationFingerprint>>,
    creation_order: RwLock<Vec<Arc<ConfigurationFingerprint>>>,
    next_registration_seq: AtomicU64,
    total_created: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Recording
    // -------------------------------------------------------------------------

    /// Associates `test_unit` with `fingerprint`, creating the placeholder
    /// entry if this is the fingerprint's first registration.
    ///
    /// Idempotent. A unit that re-registers with a different fingerprint is
    /// remapped to the latest one.
    pub fn register_consumer(&self, fingerprint: &ConfigurationFingerprint, test_unit: &str) {
        let entry = self.entry_or_insert(fingerprint);
        self.unit_to_fingerprint
            .insert(test_unit.to_string(), Arc::clone(entry.fingerprint()));

        if entry.add_consumer(test_unit) {
            debug!(
                context_id = entry.context_id(),
                test_unit, "registered test unit for context"
            );
        }
    }

    /// Records that `method` of `test_unit` ran against `fingerprint`.
    ///
    /// Ignored if the fingerprint was never registered.
    pub fn register_method_consumer(
        &self,
        fingerprint: &ConfigurationFingerprint,
        test_unit: &str,
        method: &str,
    ) {
        match self.lookup(fingerprint) {
            Some(entry) => {
                entry.add_method_consumer(test_unit, method);
                trace!(
                    context_id = entry.context_id(),
                    test_unit,
                    method,
                    "recorded test method for context"
                );
            }
            None => trace!(test_unit, method, "method for unregistered context ignored"),
        }
    }

    /// Records that the environment for `fingerprint` was built now.
    pub fn record_creation(
        &self,
        fingerprint: &ConfigurationFingerprint,
        load_duration_ms: u64,
        cost: CostSnapshot,
    ) {
        self.record_creation_at(fingerprint, load_duration_ms, cost, Utc::now());
    }

    /// Records that the environment for `fingerprint` was built at `at`.
    ///
    /// Counts a cache miss. On the first creation of a fingerprint the
    /// entry joins the creation order and the created-contexts counter is
    /// bumped; a repeated call only overwrites timing and cost. Once more
    /// than one environment exists, the most similar earlier one is linked
    /// as the entry's nearest neighbour.
    ///
    /// Ignored if the fingerprint was never registered.
    pub fn record_creation_at(
        &self,
        fingerprint: &ConfigurationFingerprint,
        load_duration_ms: u64,
        cost: CostSnapshot,
        at: DateTime<Utc>,
    ) {
        let Some(entry) = self.lookup(fingerprint) else {
            debug!(load_duration_ms, "creation for unregistered context ignored");
            return;
        };

        let (first, created_before) = {
            let mut order = self.creation_order.write();
            let created_before = order.len();
            let first = entry.mark_created(at, load_duration_ms, cost, created_before as u64);
            if first {
                order.push(Arc::clone(entry.fingerprint()));
            }
            (first, created_before)
        };

        self.misses.fetch_add(1, Ordering::Relaxed);
        if first {
            self.total_created.fetch_add(1, Ordering::Relaxed);
        }

        debug!(
            context_id = entry.context_id(),
            load_duration_ms,
            first_creation = first,
            "context created"
        );

        if first && created_before > 0 {
            if let Some((nearest, score)) = self.find_nearest(entry.fingerprint(), created_before)
            {
                if let Some(nearest_entry) = self.lookup(&nearest) {
                    info!(
                        context_id = entry.context_id(),
                        nearest_context_id = nearest_entry.context_id(),
                        score,
                        load_duration_ms,
                        "new context is most similar to an existing context"
                    );
                }
                entry.set_nearest(nearest, score);
            }
        }
    }

    /// Records a reuse of the environment for `fingerprint` now.
    pub fn record_hit(&self, fingerprint: &ConfigurationFingerprint) {
        self.record_hit_at(fingerprint, Utc::now());
    }

    /// Records a reuse of the environment for `fingerprint` at `at`.
    ///
    /// Ignored if the fingerprint is unknown or its environment has not
    /// been created yet.
    pub fn record_hit_at(&self, fingerprint: &ConfigurationFingerprint, at: DateTime<Utc>) {
        let Some(entry) = self.lookup(fingerprint) else {
            trace!("hit for unregistered context ignored");
            return;
        };

        if entry.record_hit(at) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(context_id = entry.context_id(), "context cache hit");
        } else {
            debug!(
                context_id = entry.context_id(),
                "hit before creation ignored"
            );
        }
    }

    /// Stores the names of the units (beans) the environment defined.
    ///
    /// Ignored if the fingerprint was never registered.
    pub fn record_size_proxy<I, S>(&self, fingerprint: &ConfigurationFingerprint, unit_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(entry) = self.lookup(fingerprint) {
            let names: BTreeSet<String> = unit_names.into_iter().map(Into::into).collect();
            debug!(
                context_id = entry.context_id(),
                unit_count = names.len(),
                "recorded unit definitions for context"
            );
            entry.set_size_proxy(names);
        }
    }

    /// Drops every entry and resets all counters.
    ///
    /// Must not run concurrently with recording calls; the caller quiesces
    /// the test runner first.
    pub fn clear(&self) {
        self.entries.clear();
        self.unit_to_fingerprint.clear();
        self.creation_order.write().clear();
        self.next_registration_seq.store(0, Ordering::Relaxed);
        self.total_created.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        debug!("cache tracker cleared");
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// All entries, placeholders included, in registration order.
    pub fn all_entries(&self) -> Vec<EntrySnapshot> {
        let mut entries = self.entry_handles();
        entries.sort_by_key(|e| e.registration_seq());
        entries.iter().map(|e| e.snapshot()).collect()
    }

    /// Created entries in creation order.
    pub fn created_entries(&self) -> Vec<EntrySnapshot> {
        let mut created: Vec<EntrySnapshot> = self
            .entry_handles()
            .iter()
            .map(|e| e.snapshot())
            .filter(EntrySnapshot::is_created)
            .collect();
        created.sort_by_key(|e| e.creation_seq);
        created
    }

    pub fn entry_for(&self, fingerprint: &ConfigurationFingerprint) -> Option<EntrySnapshot> {
        self.lookup(fingerprint).map(|e| e.snapshot())
    }

    /// Whether the environment for `fingerprint` has been built. This is the
    /// check a runner makes to choose between a creation and a hit.
    pub fn is_created(&self, fingerprint: &ConfigurationFingerprint) -> bool {
        self.lookup(fingerprint).is_some_and(|e| e.is_created())
    }

    pub fn fingerprint_for_test_unit(&self, test_unit: &str) -> Option<Arc<ConfigurationFingerprint>> {
        self.unit_to_fingerprint
            .get(test_unit)
            .map(|fp| Arc::clone(fp.value()))
    }

    /// Nearest earlier environment for `fingerprint` and its score, if one
    /// was linked when it was created.
    pub fn nearest_for(
        &self,
        fingerprint: &ConfigurationFingerprint,
    ) -> Option<(Arc<ConfigurationFingerprint>, u32)> {
        self.lookup(fingerprint)?.nearest_link()
    }

    /// Number of distinct fingerprints whose environment was built.
    pub fn total_contexts_created(&self) -> u64 {
        self.total_created.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            contexts_created: self.total_contexts_created(),
            hits: self.cache_hits(),
            misses: self.cache_misses(),
        }
    }

    /// Earliest creation time across created entries.
    pub fn earliest_creation_time(&self) -> Option<DateTime<Utc>> {
        self.entry_handles()
            .iter()
            .filter_map(|e| e.snapshot().created_at)
            .min()
    }

    /// Latest access time across all entries.
    pub fn latest_access_time(&self) -> Option<DateTime<Utc>> {
        self.entry_handles()
            .iter()
            .filter_map(|e| e.snapshot().last_used_at)
            .max()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn lookup(&self, fingerprint: &ConfigurationFingerprint) -> Option<Arc<CacheEntry>> {
        self.entries.get(fingerprint).map(|e| Arc::clone(e.value()))
    }

    fn entry_or_insert(&self, fingerprint: &ConfigurationFingerprint) -> Arc<CacheEntry> {
        if let Some(entry) = self.lookup(fingerprint) {
            return entry;
        }

        let key = Arc::new(fingerprint.clone());
        let entry = self
            .entries
            .entry(Arc::clone(&key))
            .or_insert_with(|| {
                let seq = self.next_registration_seq.fetch_add(1, Ordering::Relaxed);
                let entry = CacheEntry::new(key, seq);
                debug!(context_id = entry.context_id(), "created context cache entry");
                Arc::new(entry)
            });
        Arc::clone(entry.value())
    }

    /// Clones the entry handles so no map shard stays locked while entries
    /// are inspected.
    fn entry_handles(&self) -> Vec<Arc<CacheEntry>> {
        self.entries.iter().map(|e| Arc::clone(e.value())).collect()
    }

    /// Finds the created fingerprint most similar to `target` among the
    /// first `created_before` entries of the creation order.
    ///
    /// Candidates are visited in creation order and the first of equally
    /// scored candidates wins. A best score of 0 yields no link. Entries
    /// created after `target` are never considered, so a link always points
    /// to an earlier creation.
    fn find_nearest(
        &self,
        target: &ConfigurationFingerprint,
        created_before: usize,
    ) -> Option<(Arc<ConfigurationFingerprint>, u32)> {
        let candidates: Vec<_> = self
            .creation_order
            .read()
            .iter()
            .take(created_before)
            .cloned()
            .collect();

        let mut nearest = None;
        let mut highest = 0;
        for candidate in candidates {
            if *candidate == *target {
                continue;
            }
            // Skip candidates cleared or not yet built mid-scan.
            if !self.lookup(&candidate).is_some_and(|e| e.is_created()) {
                continue;
            }

            let score = similarity::score(target, &candidate);
            if score > highest {
                highest = score;
                nearest = Some(candidate);
            }
        }

        nearest.map(|fp| (fp, highest))
    }
}
