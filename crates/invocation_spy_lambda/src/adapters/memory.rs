use std::sync::Mutex;

use crate::adapters::object_store::ObjectStore;
use crate::runtime::contract::TrackedArtifact;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Object store that keeps every write in memory, in call order.
///
/// Stands in for S3 in tests and local runs of the spy.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<Vec<StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().expect("poisoned mutex").clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .iter()
            .map(|object| object.key.clone())
            .collect()
    }

    pub fn body(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .iter()
            .find(|object| object.key == key)
            .map(|object| object.body.clone())
    }

    pub fn write_count(&self) -> usize {
        self.objects.lock().expect("poisoned mutex").len()
    }
}

impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, bucket: &str, artifact: &TrackedArtifact) -> Result<(), String> {
        self.objects
            .lock()
            .map_err(|_| "in-memory object store mutex poisoned".to_string())?
            .push(StoredObject {
                bucket: bucket.to_string(),
                key: artifact.key.clone(),
                body: artifact.body.clone(),
                content_type: artifact.content_type.clone(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(key: &str) -> TrackedArtifact {
        TrackedArtifact {
            key: key.to_string(),
            body: br#"{"event":1}"#.to_vec(),
            content_type: "application/json".to_string(),
        }
    }

    #[tokio::test]
    async fn records_writes_in_call_order() {
        let store = InMemoryObjectStore::new();
        store
            .put_object("bucket", &artifact("fn/a.json"))
            .await
            .expect("first write should succeed");
        store
            .put_object("bucket", &artifact("fn/b.json"))
            .await
            .expect("second write should succeed");

        assert_eq!(store.keys(), vec!["fn/a.json", "fn/b.json"]);
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.objects()[0].bucket, "bucket");
        assert_eq!(
            store.body("fn/b.json").expect("body should exist"),
            br#"{"event":1}"#.to_vec()
        );
        assert!(store.body("fn/missing.json").is_none());
    }
}
