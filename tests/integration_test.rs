//! End-to-end scenarios through the public API: a host runner driving the
//! tracker, then the analyzer and timeline summarizing it.

mod common;

use common::{batch, distinct, web, web_integration};
use ctxprof::{
    CacheTracker, CostSnapshot, OptimizationAnalyzer, RecommendationKind, TimelineBuilder,
};

/// How a runner reports one test unit obtaining its environment.
fn load(tracker: &CacheTracker, fp: &ctxprof::ConfigurationFingerprint, unit: &str, ms: u64) {
    tracker.register_consumer(fp, unit);
    if tracker.is_created(fp) {
        tracker.record_hit(fp);
    } else {
        tracker.record_creation(fp, ms, CostSnapshot::capture());
    }
}

#[test]
fn test_single_fingerprint_reuse() {
    let tracker = CacheTracker::new();
    load(&tracker, &web(), "app.OrderControllerTest", 1500);
    load(&tracker, &web(), "app.CustomerControllerTest", 0);
    load(&tracker, &web(), "app.InvoiceControllerTest", 0);

    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.total_contexts_created(), 1);
    assert_eq!(tracker.cache_hits(), 2);
    assert_eq!(tracker.cache_misses(), 1);

    let entry = tracker.entry_for(&web()).unwrap();
    assert_eq!(entry.consumers.len(), 3);
    assert_eq!(entry.hit_count, 2);
    assert!(entry.nearest.is_none());

    let stats = tracker.statistics();
    assert!((stats.hit_rate() - 200.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_nearest_fingerprint_linkage() {
    let tracker = CacheTracker::new();
    load(&tracker, &web(), "app.WebTest", 1200);
    load(&tracker, &web_integration(), "app.WebIT", 2200);
    load(&tracker, &batch(), "app.BatchTest", 700);

    let (nearest, score) = tracker.nearest_for(&web_integration()).unwrap();
    assert_eq!(nearest.as_ref(), &web());
    assert_eq!(score, 30);
    assert!(tracker.nearest_for(&batch()).is_none());
    assert!(tracker.nearest_for(&web()).is_none());

    let stats = OptimizationAnalyzer::default().analyze(&tracker);
    assert_eq!(stats.total_context_creation_time_ms, 4100);
    assert_eq!(stats.potential_time_savings_ms, 2200);
    assert_eq!(stats.wasted_time_ms, 200 + 1200);

    let top = &stats.top_opportunities[0];
    assert_eq!(top.load_duration_ms, 2200);
    assert_eq!(top.kind, RecommendationKind::Harmonize);
    assert_eq!(top.test_unit, "app.WebIT");
}

#[test]
fn test_opportunity_ranking_and_wasted_time() {
    let tracker = CacheTracker::new();
    for (i, ms) in [2500, 1800, 600, 400, 5000].into_iter().enumerate() {
        load(&tracker, &distinct(i), &format!("app.Suite{i}Test"), ms);
    }

    let stats = OptimizationAnalyzer::default().analyze(&tracker);
    let ranked: Vec<u64> = stats
        .top_opportunities
        .iter()
        .map(|o| o.load_duration_ms)
        .collect();
    assert_eq!(ranked, vec![5000, 2500, 1800, 600]);
    assert_eq!(stats.wasted_time_ms, 4000 + 1500 + 800);
    assert_eq!(stats.contexts_created, 5);
}

#[test]
fn test_timeline_follows_creation_times() {
    let tracker = CacheTracker::new();
    load(&tracker, &web(), "com.acme.web.OrderControllerTest", 1500);
    load(&tracker, &batch(), "com.acme.batch.NightlyJobTest", 300);
    load(&tracker, &web(), "com.acme.web.CustomerControllerTest", 0);

    let timeline = TimelineBuilder::new().build(&tracker);
    assert_eq!(timeline.events.len(), 2);
    assert_eq!(timeline.events[0].label, "OrderControllerTest");
    assert_eq!(timeline.events[0].consumer_count, 2);
    assert_eq!(timeline.events[0].hit_count, 1);
    assert_eq!(timeline.events[1].label, "NightlyJobTest");
    assert!(timeline.start <= timeline.end);
    assert_eq!(timeline.start, tracker.earliest_creation_time());
    assert_eq!(timeline.end, tracker.latest_access_time());
}

#[test]
fn test_clear_starts_a_new_run() {
    let tracker = CacheTracker::new();
    load(&tracker, &web(), "app.WebTest", 1200);
    tracker.clear();

    assert!(tracker.is_empty());
    assert_eq!(tracker.statistics(), ctxprof::CacheStatistics::default());

    load(&tracker, &batch(), "app.BatchTest", 300);
    assert_eq!(tracker.all_entries()[0].context_id, "context-0");
    assert!(tracker.nearest_for(&batch()).is_none());
}
