use std::future::Future;

use crate::runtime::contract::TrackedArtifact;

/// Key-addressed write capability used to persist tracked artifacts.
///
/// The returned future resolves once the backend has acknowledged or rejected
/// the write.
pub trait ObjectStore {
    fn put_object(
        &self,
        bucket: &str,
        artifact: &TrackedArtifact,
    ) -> impl Future<Output = Result<(), String>> + Send;
}
