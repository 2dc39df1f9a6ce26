use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage_keys::{artifact_object_key, unique_segment};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Execution metadata for one observed invocation.
///
/// Only the request id feeds into artifact keys. Everything else is carried so
/// callers can deserialize a full runtime context without losing fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationContext {
    #[serde(default, alias = "awsRequestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoked_function_arn: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InvocationContext {
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            ..Self::default()
        }
    }

    pub fn uniqueness_token(&self) -> Option<&str> {
        self.request_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvocationDescriptor<E = Value> {
    pub event: E,
    #[serde(default)]
    pub context: InvocationContext,
}

impl<E> InvocationDescriptor<E> {
    pub fn new(event: E, context: InvocationContext) -> Self {
        Self { event, context }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedArtifact {
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Serialize)]
struct ArtifactBody<'a, E> {
    event: &'a E,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    Serialization {
        message: String,
    },
    StorageWrite {
        bucket: String,
        key: String,
        message: String,
    },
}

impl TrackError {
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Serialization { .. } => None,
            Self::StorageWrite { key, .. } => Some(key),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Serialization { message } | Self::StorageWrite { message, .. } => message,
        }
    }
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialization { message } => {
                write!(f, "failed to serialize invocation event: {message}")
            }
            Self::StorageWrite {
                bucket,
                key,
                message,
            } => write!(
                f,
                "failed to write artifact '{key}' to bucket '{bucket}': {message}"
            ),
        }
    }
}

impl std::error::Error for TrackError {}

pub fn serialize_artifact_body<E: Serialize>(event: &E) -> Result<Vec<u8>, TrackError> {
    serde_json::to_vec(&ArtifactBody { event }).map_err(|error| TrackError::Serialization {
        message: error.to_string(),
    })
}

/// Derives the key and body for one invocation without touching storage.
///
/// The body is serialized first so an unserializable event never consumes a
/// key sequence number.
pub fn build_artifact<E: Serialize>(
    function_name: &str,
    invocation: &InvocationDescriptor<E>,
) -> Result<TrackedArtifact, TrackError> {
    let body = serialize_artifact_body(&invocation.event)?;
    let key = artifact_object_key(
        function_name,
        &unique_segment(invocation.context.uniqueness_token()),
    );

    Ok(TrackedArtifact {
        key,
        body,
        content_type: JSON_CONTENT_TYPE.to_string(),
    })
}
