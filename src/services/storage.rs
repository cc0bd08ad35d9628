use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The store answered the listing but reported no contents at all.
    #[error("No contents in storage listing for prefix '{prefix}'")]
    EmptyListing { prefix: String },

    #[error("Failed to store object '{key}': {reason}")]
    Put { key: String, reason: String },

    #[error("Failed to list objects under '{prefix}': {reason}")]
    List { prefix: String, reason: String },

    #[error("Failed to fetch object '{key}': {reason}")]
    Get { key: String, reason: String },

    #[error("Failed to presign object '{key}': {reason}")]
    Presign { key: String, reason: String },

    #[error("Bucket '{bucket}' is unavailable: {reason}")]
    Unavailable { bucket: String, reason: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoObject {
    pub key: String,
    pub last_modified: Option<DateTime<Utc>>,
}

impl VideoObject {
    /// Key with `prefix` removed, or the full key when it lives elsewhere.
    pub fn display_name(&self, prefix: &str) -> String {
        self.key
            .strip_prefix(prefix)
            .unwrap_or(&self.key)
            .to_string()
    }
}

pub struct ObjectBody {
    pub body: ByteStream,
    pub content_type: Option<String>,
    pub content_length: Option<i64>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, body: ByteStream, content_type: &str)
    -> StorageResult<()>;
    async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<VideoObject>>;
    async fn get_object(&self, key: &str) -> StorageResult<ObjectBody>;
    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;
    async fn check_bucket(&self) -> StorageResult<()>;
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: ByteStream,
        content_type: &str,
    ) -> StorageResult<()> {
        let size = body.size_hint().1.unwrap_or_default();
        let res = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                reason: DisplayErrorContext(e).to_string(),
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size,
            e_tag = res.e_tag().unwrap_or_default(),
            "S3 upload successful"
        );
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<VideoObject>> {
        let mut objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let res = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token)
                .send()
                .await
                .map_err(|e| StorageError::List {
                    prefix: prefix.to_string(),
                    reason: DisplayErrorContext(e).to_string(),
                })?;

            if let Some(contents) = res.contents {
                for object in contents {
                    if let Some(key) = object.key {
                        let last_modified = object.last_modified.and_then(|d| {
                            DateTime::from_timestamp(d.secs(), d.subsec_nanos())
                        });
                        objects.push(VideoObject { key, last_modified });
                    }
                }
            }

            if res.is_truncated.unwrap_or(false) {
                continuation_token = res.next_continuation_token;
            } else {
                break;
            }
        }

        if objects.is_empty() {
            return Err(StorageError::EmptyListing {
                prefix: prefix.to_string(),
            });
        }

        Ok(objects)
    }

    async fn get_object(&self, key: &str) -> StorageResult<ObjectBody> {
        let res = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Get {
                key: key.to_string(),
                reason: DisplayErrorContext(e).to_string(),
            })?;

        Ok(ObjectBody {
            content_type: res.content_type,
            content_length: res.content_length,
            body: res.body,
        })
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        let presign_err = |reason: String| StorageError::Presign {
            key: key.to_string(),
            reason,
        };

        let presigning_config =
            PresigningConfig::expires_in(expires_in).map_err(|e| presign_err(e.to_string()))?;

        let presigned_request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| presign_err(DisplayErrorContext(e).to_string()))?;

        Ok(presigned_request.uri().to_string())
    }

    async fn check_bucket(&self) -> StorageResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| StorageError::Unavailable {
                bucket: self.bucket.clone(),
                reason: DisplayErrorContext(e).to_string(),
            })?;
        Ok(())
    }
}
