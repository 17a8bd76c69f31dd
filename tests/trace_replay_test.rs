//! Trace files replayed through the CLI command layer.

mod common;

use common::{write_trace, SUITE_TRACE};
use ctxprof::cli::commands::{analyze, entries, similarity, timeline};
use ctxprof::cli::output::CommandOutput;
use ctxprof::services::trace_replay;
use ctxprof::{AnalysisConfig, RecommendationKind, TraceDocument, TraceError};

#[test]
fn test_replay_suite_trace() {
    let file = write_trace(SUITE_TRACE, ".yaml");
    let document = trace_replay::load_trace(file.path()).unwrap();
    let tracker = trace_replay::replay(&document).unwrap();

    assert_eq!(tracker.len(), 3);
    assert_eq!(tracker.total_contexts_created(), 3);
    assert_eq!(tracker.cache_hits(), 1);
    assert_eq!(tracker.cache_misses(), 3);

    let web = tracker.entry_for(&document.fingerprints["web"]).unwrap();
    assert_eq!(web.consumers, vec![
        "com.acme.OrderControllerTest",
        "com.acme.CustomerControllerTest",
    ]);
    assert_eq!(web.method_consumers.len(), 1);
    assert_eq!(web.size_proxy_count, 3);
    assert_eq!(web.lifespan_ms(), 3000);

    let batch = tracker.entry_for(&document.fingerprints["batch"]).unwrap();
    assert_eq!(batch.cost.available_parallelism, Some(8));
    assert!(batch.nearest.is_none());
}

#[test]
fn test_analyze_command_output() {
    let file = write_trace(SUITE_TRACE, ".yaml");
    let report = analyze::run(file.path(), &AnalysisConfig::default()).unwrap();

    assert_eq!(report.cache.contexts_created, 3);
    assert_eq!(report.statistics.total_context_creation_time_ms, 4700);
    assert_eq!(report.statistics.potential_time_savings_ms, 1800);
    assert_eq!(report.statistics.wasted_time_ms, 1500 + 800);

    let kinds: Vec<RecommendationKind> = report
        .statistics
        .top_opportunities
        .iter()
        .map(|o| o.kind)
        .collect();
    assert_eq!(kinds, vec![RecommendationKind::SlowLoad, RecommendationKind::Harmonize]);

    let json = report.to_json();
    assert_eq!(json["statistics"]["wasted_time_ms"], 2300);
    assert_eq!(json["cache"]["hits"], 1);

    let human = report.to_human();
    assert!(human.contains("Contexts created:       3"));
    assert!(human.contains("Top opportunities:"));
}

#[test]
fn test_timeline_command_output() {
    let file = write_trace(SUITE_TRACE, ".yaml");
    let report = timeline::run(file.path()).unwrap();

    let labels: Vec<&str> = report.timeline.events.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["OrderControllerTest", "CheckoutIT", "NightlyJobTest"]);
    let starts: Vec<i64> = report
        .timeline
        .events
        .iter()
        .map(|e| e.relative_start_secs)
        .collect();
    assert_eq!(starts, vec![0, 5, 9]);

    let json = report.to_json();
    assert_eq!(json["entries"][1]["start_ms"], 5000);
    assert_eq!(json["entries"][1]["end_ms"], 6800);
    assert_eq!(json["start"], "2025-03-01T12:00:00Z");
}

#[test]
fn test_entries_command_output() {
    let file = write_trace(SUITE_TRACE, ".yaml");
    let all = entries::run(file.path(), false).unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.entries[0].context_id, "context-0");

    let json = all.to_json();
    assert_eq!(json["entries"][1]["nearest_score"], 30);
}

#[test]
fn test_similarity_command_output() {
    let file = write_trace(SUITE_TRACE, ".yaml");
    let report = similarity::run(file.path(), "web", "web_it").unwrap();
    assert_eq!(report.score, 30);
    assert!(report.to_human().starts_with("Similarity score: 30"));

    assert_eq!(similarity::run(file.path(), "web", "batch").unwrap().score, 0);
    assert!(similarity::run(file.path(), "web", "missing").is_err());
}

#[test]
fn test_json_trace_round_trip() {
    let yaml = write_trace(SUITE_TRACE, ".yaml");
    let document = trace_replay::load_trace(yaml.path()).unwrap();
    let json = write_trace(&serde_json::to_string(&document).unwrap(), ".json");

    let report = analyze::run(json.path(), &AnalysisConfig::default()).unwrap();
    assert_eq!(report.statistics.total_context_creation_time_ms, 4700);
}

#[test]
fn test_unknown_fingerprint_in_trace() {
    let document: TraceDocument =
        serde_yaml::from_str("events:\n  - event: register\n    fingerprint: nope\n    test_unit: T\n")
            .unwrap();
    let err = trace_replay::replay(&document).unwrap_err();
    assert!(matches!(err, TraceError::UnknownFingerprint { index: 0, .. }));

    let file = write_trace("events:\n  - event: hit\n    fingerprint: nope\n", ".yml");
    let err = analyze::run(file.path(), &AnalysisConfig::default()).unwrap_err();
    assert!(format!("{err:#}").contains("unknown fingerprint 'nope'"));
}
