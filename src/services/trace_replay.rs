//! Loading recorded traces and replaying them into a tracker.

use chrono::Utc;
use std::path::Path;

use super::CacheTracker;
use crate::domain::models::{CostSnapshot, TraceDocument, TraceEvent};
use crate::domain::TraceError;

/// Reads a trace document, choosing the parser from the file extension.
pub fn load_trace(path: impl AsRef<Path>) -> Result<TraceDocument, TraceError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document: TraceDocument = match extension.as_str() {
        "json" => serde_json::from_str(&content)?,
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        other => return Err(TraceError::UnsupportedFormat(other.to_string())),
    };

    tracing::debug!(
        path = %path.display(),
        fingerprints = document.fingerprints.len(),
        events = document.events.len(),
        "loaded trace"
    );
    Ok(document)
}

/// Replays every event into a fresh tracker.
///
/// Every event is checked against the declared fingerprints before anything
/// is recorded, so a bad trace never yields a half-populated tracker.
pub fn replay(document: &TraceDocument) -> Result<CacheTracker, TraceError> {
    for (index, event) in document.events.iter().enumerate() {
        if !document.fingerprints.contains_key(event.fingerprint()) {
            return Err(TraceError::UnknownFingerprint {
                index,
                name: event.fingerprint().to_string(),
            });
        }
    }

    let tracker = CacheTracker::new();
    for event in &document.events {
        // Presence checked above.
        let Some(fingerprint) = document.fingerprints.get(event.fingerprint()) else {
            continue;
        };

        match event {
            TraceEvent::Register { test_unit, .. } => {
                tracker.register_consumer(fingerprint, test_unit);
            }
            TraceEvent::Method {
                test_unit, method, ..
            } => {
                tracker.register_method_consumer(fingerprint, test_unit, method);
            }
            TraceEvent::Created {
                load_ms,
                heap_used_bytes,
                available_parallelism,
                at,
                ..
            } => {
                let cost = CostSnapshot {
                    heap_used_bytes: *heap_used_bytes,
                    available_parallelism: *available_parallelism,
                };
                tracker.record_creation_at(
                    fingerprint,
                    *load_ms,
                    cost,
                    at.unwrap_or_else(Utc::now),
                );
            }
            TraceEvent::Hit { at, .. } => {
                tracker.record_hit_at(fingerprint, at.unwrap_or_else(Utc::now));
            }
            TraceEvent::SizeProxy { units, .. } => {
                tracker.record_size_proxy(fingerprint, units.iter().cloned());
            }
            TraceEvent::Load {
                test_unit,
                load_ms,
                at,
                ..
            } => {
                let at = at.unwrap_or_else(Utc::now);
                tracker.register_consumer(fingerprint, test_unit);
                if tracker.is_created(fingerprint) {
                    tracker.record_hit_at(fingerprint, at);
                } else {
                    tracker.record_creation_at(fingerprint, *load_ms, CostSnapshot::default(), at);
                }
            }
        }
    }

    tracing::info!(
        contexts_created = tracker.total_contexts_created(),
        hits = tracker.cache_hits(),
        misses = tracker.cache_misses(),
        "trace replayed"
    );
    Ok(tracker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRACE: &str = r"
fingerprints:
  web:
    wiring_classes: [app.WebConfig, app.DataConfig]
    active_profiles: [test]
  web_it:
    wiring_classes: [app.WebConfig, app.DataConfig]
    active_profiles: [test, integration]
events:
  - event: load
    fingerprint: web
    test_unit: app.OrderControllerTest
    load_ms: 1800
    at: 2025-03-01T12:00:00Z
  - event: load
    fingerprint: web
    test_unit: app.CustomerControllerTest
    load_ms: 0
    at: 2025-03-01T12:00:04Z
  - event: load
    fingerprint: web_it
    test_unit: app.CheckoutIT
    load_ms: 2600
    at: 2025-03-01T12:00:07Z
";

    #[test]
    fn test_replay_load_events() {
        let doc: TraceDocument = serde_yaml::from_str(TRACE).unwrap();
        let tracker = replay(&doc).unwrap();

        assert_eq!(tracker.total_contexts_created(), 2);
        assert_eq!(tracker.cache_hits(), 1);
        assert_eq!(tracker.cache_misses(), 2);

        let web_it = &doc.fingerprints["web_it"];
        let (nearest, score) = tracker.nearest_for(web_it).unwrap();
        assert_eq!(nearest.as_ref(), &doc.fingerprints["web"]);
        assert_eq!(score, 20);
    }

    #[test]
    fn test_repeated_wiring_classes_share_one_entry() {
        let doc: TraceDocument = serde_yaml::from_str(
            r"
fingerprints:
  doubled:
    wiring_classes: [app.WebConfig, app.WebConfig]
  single:
    wiring_classes: [app.WebConfig]
events:
  - event: load
    fingerprint: doubled
    test_unit: app.OrderControllerTest
    load_ms: 900
  - event: load
    fingerprint: single
    test_unit: app.CustomerControllerTest
    load_ms: 0
",
        )
        .unwrap();
        let tracker = replay(&doc).unwrap();

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.total_contexts_created(), 1);
        assert_eq!(tracker.cache_hits(), 1);
    }

    #[test]
    fn test_replay_rejects_unknown_fingerprint() {
        let doc: TraceDocument = serde_yaml::from_str(
            "events:\n  - event: hit\n    fingerprint: ghost\n",
        )
        .unwrap();
        let err = replay(&doc).unwrap_err();
        assert!(matches!(err, TraceError::UnknownFingerprint { index: 0, ref name } if name == "ghost"));
    }

    #[test]
    fn test_load_trace_by_extension() {
        let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        yaml.write_all(TRACE.as_bytes()).unwrap();
        let doc = load_trace(yaml.path()).unwrap();
        assert_eq!(doc.events.len(), 3);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(serde_json::to_string(&doc).unwrap().as_bytes()).unwrap();
        assert_eq!(load_trace(json.path()).unwrap().events, doc.events);
    }

    #[test]
    fn test_load_trace_errors() {
        let txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            load_trace(txt.path()),
            Err(TraceError::UnsupportedFormat(ext)) if ext == "txt"
        ));

        assert!(matches!(
            load_trace("/nonexistent/trace.yaml"),
            Err(TraceError::Io { .. })
        ));

        let mut bad = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        bad.write_all(b"{not json").unwrap();
        assert!(matches!(load_trace(bad.path()), Err(TraceError::Json(_))));
    }
}
