use std::future::Future;

use serde::Serialize;
use serde_json::json;

use crate::adapters::object_store::ObjectStore;
use crate::handlers::tracker::Tracker;
use crate::runtime::contract::{InvocationDescriptor, TrackError, TrackedArtifact};

pub const SPY_BUCKET_ENV: &str = "INVOCATION_SPY_BUCKET";
pub const SPY_FUNCTION_NAME_ENV: &str = "INVOCATION_SPY_FUNCTION_NAME";
pub const LAMBDA_FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";
pub const DEFAULT_FUNCTION_NAME: &str = "unknown-function";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpyConfig {
    pub bucket: Option<String>,
    pub function_name: String,
}

impl SpyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the spy settings from an environment-like lookup.
    ///
    /// A missing or blank bucket disables tracking.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            bucket: non_blank(SPY_BUCKET_ENV),
            function_name: non_blank(SPY_FUNCTION_NAME_ENV)
                .or_else(|| non_blank(LAMBDA_FUNCTION_NAME_ENV))
                .unwrap_or_else(|| DEFAULT_FUNCTION_NAME.to_string()),
        }
    }
}

pub enum Spy<S> {
    Tracking(Tracker<S>),
    Disabled,
}

impl<S: ObjectStore> Spy<S> {
    pub fn from_config(config: &SpyConfig, store: S) -> Self {
        match &config.bucket {
            Some(bucket) => Self::Tracking(Tracker::new(
                bucket.clone(),
                config.function_name.clone(),
                store,
            )),
            None => {
                log_spy_info(
                    "spy_disabled",
                    json!({
                        "function_name": config.function_name.clone(),
                        "reason": format!("{SPY_BUCKET_ENV} is not configured"),
                    }),
                );
                Self::Disabled
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Tracking(_))
    }

    pub async fn observe<E: Serialize>(
        &self,
        invocation: &InvocationDescriptor<E>,
    ) -> Result<Option<TrackedArtifact>, TrackError> {
        match self {
            Self::Tracking(tracker) => tracker.track(invocation).await.map(Some),
            Self::Disabled => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpyHandlerError {
    Track(TrackError),
    App(String),
}

impl std::fmt::Display for SpyHandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Track(error) => write!(f, "{error}"),
            Self::App(message) => write!(f, "spied handler failed: {message}"),
        }
    }
}

impl std::error::Error for SpyHandlerError {}

impl From<TrackError> for SpyHandlerError {
    fn from(error: TrackError) -> Self {
        Self::Track(error)
    }
}

/// Records the invocation, then runs `app` with it.
///
/// The app only runs after the artifact is durably stored; a tracking failure
/// is returned without invoking it.
pub async fn handle_spied_invocation<S, E, F, Fut, R>(
    spy: &Spy<S>,
    invocation: InvocationDescriptor<E>,
    app: F,
) -> Result<(Option<TrackedArtifact>, R), SpyHandlerError>
where
    S: ObjectStore,
    E: Serialize,
    F: FnOnce(InvocationDescriptor<E>) -> Fut,
    Fut: Future<Output = Result<R, String>>,
{
    let artifact = spy.observe(&invocation).await?;
    let response = app(invocation).await.map_err(SpyHandlerError::App)?;
    Ok((artifact, response))
}

fn log_spy_info(event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": "spy",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
