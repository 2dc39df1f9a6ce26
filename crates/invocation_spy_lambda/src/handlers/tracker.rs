use serde::Serialize;
use serde_json::json;

use crate::adapters::object_store::ObjectStore;
use crate::runtime::contract::{build_artifact, InvocationDescriptor, TrackError, TrackedArtifact};

/// Records invocations as JSON artifacts under `<function_name>/` in one bucket.
///
/// A tracker holds nothing but its bucket, function name and store handle, so
/// a single instance can serve any number of concurrent `track` calls.
#[derive(Debug, Clone)]
pub struct Tracker<S> {
    bucket: String,
    function_name: String,
    store: S,
}

impl<S: ObjectStore> Tracker<S> {
    pub fn new(bucket: impl Into<String>, function_name: impl Into<String>, store: S) -> Self {
        Self {
            bucket: bucket.into(),
            function_name: function_name.into(),
            store,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Writes one artifact for `invocation` and returns it once the store acks.
    ///
    /// Every call produces a new key, even for identical input. Failures are
    /// returned as-is; there are no retries.
    pub async fn track<E: Serialize>(
        &self,
        invocation: &InvocationDescriptor<E>,
    ) -> Result<TrackedArtifact, TrackError> {
        let artifact = build_artifact(&self.function_name, invocation).inspect_err(|error| {
            log_tracker_error(
                "artifact_serialization_failed",
                json!({
                    "bucket": self.bucket.clone(),
                    "function_name": self.function_name.clone(),
                    "error": error.to_string(),
                }),
            );
        })?;

        if let Err(message) = self.store.put_object(&self.bucket, &artifact).await {
            let error = TrackError::StorageWrite {
                bucket: self.bucket.clone(),
                key: artifact.key.clone(),
                message,
            };
            log_tracker_error(
                "artifact_track_failed",
                json!({
                    "bucket": self.bucket.clone(),
                    "key": artifact.key.clone(),
                    "error": error.to_string(),
                }),
            );
            return Err(error);
        }

        log_tracker_info(
            "artifact_tracked",
            json!({
                "bucket": self.bucket.clone(),
                "key": artifact.key.clone(),
                "request_id": invocation.context.uniqueness_token(),
                "bytes": artifact.body.len(),
            }),
        );
        Ok(artifact)
    }
}

fn log_tracker_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "tracker",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_tracker_error(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "tracker",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
