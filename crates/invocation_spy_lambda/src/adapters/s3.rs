use aws_sdk_s3::primitives::ByteStream;

use crate::adapters::object_store::ObjectStore;
use crate::runtime::contract::TrackedArtifact;

#[derive(Clone)]
pub struct S3ObjectStore {
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(s3_client: aws_sdk_s3::Client) -> Self {
        Self { s3_client }
    }

    /// Builds a client from the default AWS credential and region chain.
    pub async fn from_default_config() -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&aws_config))
    }
}

impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, artifact: &TrackedArtifact) -> Result<(), String> {
        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(&artifact.key)
            .content_type(&artifact.content_type)
            .body(ByteStream::from(artifact.body.clone()))
            .send()
            .await
            .map(|_| ())
            .map_err(|error| format!("failed to write object to s3: {error}"))
    }
}
