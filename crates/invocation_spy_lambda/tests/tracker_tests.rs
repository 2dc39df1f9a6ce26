use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use invocation_spy_lambda::adapters::memory::InMemoryObjectStore;
use invocation_spy_lambda::adapters::object_store::ObjectStore;
use invocation_spy_lambda::handlers::tracker::Tracker;
use invocation_spy_lambda::runtime::contract::{
    InvocationContext, InvocationDescriptor, TrackError, TrackedArtifact,
};
use serde_json::{json, Value};

struct RejectingStore {
    attempts: Mutex<usize>,
}

impl ObjectStore for RejectingStore {
    async fn put_object(&self, _bucket: &str, _artifact: &TrackedArtifact) -> Result<(), String> {
        *self.attempts.lock().expect("poisoned mutex") += 1;
        Err("simulated network error".to_string())
    }
}

fn invocation(event: Value, request_id: Option<&str>) -> InvocationDescriptor {
    InvocationDescriptor::new(
        event,
        InvocationContext {
            request_id: request_id.map(str::to_string),
            function_name: Some("function name".to_string()),
            ..InvocationContext::default()
        },
    )
}

fn parse_body(store: &InMemoryObjectStore, key: &str) -> Value {
    serde_json::from_slice(&store.body(key).expect("body should be stored"))
        .expect("stored body should be json")
}

#[tokio::test]
async fn distinct_request_ids_produce_distinct_prefixed_keys() {
    let tracker = Tracker::new("bucket name", "myFn", InMemoryObjectStore::new());

    tracker
        .track(&invocation(json!({"foo": "bar"}), Some("123")))
        .await
        .expect("first track should succeed");
    tracker
        .track(&invocation(json!({"foo": "bar"}), Some("456")))
        .await
        .expect("second track should succeed");

    let keys = tracker.store().keys();
    assert_eq!(keys.len(), 2);
    for key in &keys {
        assert!(key.starts_with("myFn/"));
        assert!(key.ends_with(".json"));
    }
    assert_ne!(keys[0], keys[1]);
}

#[tokio::test]
async fn identical_invocations_are_stored_twice() {
    let tracker = Tracker::new("bucket name", "myFn", InMemoryObjectStore::new());
    let same = invocation(json!({"foo": "bar"}), Some("123"));

    let first = tracker.track(&same).await.expect("first track should succeed");
    let second = tracker.track(&same).await.expect("second track should succeed");

    assert_ne!(first.key, second.key);
    assert_eq!(tracker.store().write_count(), 2);
}

#[tokio::test]
async fn missing_request_id_still_yields_unique_keys() {
    let tracker = Tracker::new("bucket name", "myFn", InMemoryObjectStore::new());

    for _ in 0..50 {
        tracker
            .track(&invocation(json!({}), None))
            .await
            .expect("track should succeed");
    }

    let keys: HashSet<String> = tracker.store().keys().into_iter().collect();
    assert_eq!(keys.len(), 50);
    assert!(keys.iter().all(|key| key.starts_with("myFn/anon-")));
}

#[tokio::test]
async fn empty_function_name_is_accepted() {
    let tracker = Tracker::new("bucket name", "", InMemoryObjectStore::new());

    let artifact = tracker
        .track(&invocation(json!(1), Some("123")))
        .await
        .expect("track should succeed");

    assert!(artifact.key.starts_with("/123-"));
    assert!(artifact.key.ends_with(".json"));
}

#[tokio::test]
async fn body_holds_event_only() {
    let tracker = Tracker::new("bucket name", "function name", InMemoryObjectStore::new());

    let artifact = tracker
        .track(&invocation(json!({"foo": "bar"}), Some("123")))
        .await
        .expect("track should succeed");

    let body = parse_body(tracker.store(), &artifact.key);
    assert_eq!(body, json!({"event": {"foo": "bar"}}));
    assert!(!String::from_utf8_lossy(&artifact.body).contains("function name"));
}

#[tokio::test]
async fn one_write_per_call_with_bucket_and_content_type() {
    let tracker = Tracker::new("bucket name", "myFn", InMemoryObjectStore::new());

    tracker
        .track(&invocation(json!({"foo": "bar"}), Some("123")))
        .await
        .expect("track should succeed");

    let objects = tracker.store().objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].bucket, "bucket name");
    assert_eq!(objects[0].content_type, "application/json");
}

#[tokio::test]
async fn backend_rejection_fails_track_after_single_attempt() {
    let tracker = Tracker::new(
        "bucket name",
        "myFn",
        RejectingStore {
            attempts: Mutex::new(0),
        },
    );

    let error = tracker
        .track(&invocation(json!({"foo": "bar"}), Some("123")))
        .await
        .expect_err("rejected write should fail track");

    assert_eq!(*tracker.store().attempts.lock().expect("poisoned mutex"), 1);
    match error {
        TrackError::StorageWrite {
            bucket,
            key,
            message,
        } => {
            assert_eq!(bucket, "bucket name");
            assert!(key.starts_with("myFn/123-"));
            assert_eq!(message, "simulated network error");
        }
        other => panic!("expected storage write error, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_calls_do_not_cross_contaminate() {
    let tracker = Tracker::new("bucket name", "myFn", InMemoryObjectStore::new());
    let first = invocation(json!({"call": 1}), Some("123"));
    let second = invocation(json!({"call": 2}), Some("123"));

    let (first_artifact, second_artifact) =
        tokio::join!(tracker.track(&first), tracker.track(&second));
    let first_artifact = first_artifact.expect("first track should succeed");
    let second_artifact = second_artifact.expect("second track should succeed");

    assert_ne!(first_artifact.key, second_artifact.key);
    assert_eq!(
        parse_body(tracker.store(), &first_artifact.key),
        json!({"event": {"call": 1}})
    );
    assert_eq!(
        parse_body(tracker.store(), &second_artifact.key),
        json!({"event": {"call": 2}})
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_tracker_across_tasks_never_collides() {
    let tracker = Arc::new(Tracker::new(
        "bucket name",
        "myFn",
        InMemoryObjectStore::new(),
    ));

    let handles: Vec<_> = (0..64)
        .map(|index| {
            let tracker = Arc::clone(&tracker);
            tokio::spawn(async move {
                tracker
                    .track(&invocation(json!({ "index": index }), Some("same-request")))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle
            .await
            .expect("track task panicked")
            .expect("track should succeed");
    }

    let keys: HashSet<String> = tracker.store().keys().into_iter().collect();
    assert_eq!(keys.len(), 64);
    assert_eq!(tracker.store().write_count(), 64);
}
