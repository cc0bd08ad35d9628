#![allow(dead_code)]

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use rust_video_backend::config::AppConfig;
use rust_video_backend::services::pages::PageRenderer;
use rust_video_backend::services::staging::StagingArea;
use rust_video_backend::services::storage::{
    ObjectBody, ObjectStore, StorageError, StorageResult, VideoObject,
};
use rust_video_backend::{AppState, create_app};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub struct StoredObject {
    pub content: Vec<u8>,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

/// In-memory bucket. Listings come back in key order, like S3.
pub struct MockObjectStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    clock: AtomicI64,
    fail_puts: AtomicBool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            clock: AtomicI64::new(1_700_000_000),
            fail_puts: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, key: &str, content: &[u8], last_modified_secs: i64) {
        let last_modified = Utc
            .timestamp_opt(last_modified_secs, 0)
            .single()
            .unwrap();
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                content: content.to_vec(),
                content_type: "video/mp4".to_string(),
                last_modified,
            },
        );
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn content(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.content.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: ByteStream,
        content_type: &str,
    ) -> StorageResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Put {
                key: key.to_string(),
                reason: "AccessDenied".to_string(),
            });
        }
        let content = body
            .collect()
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                reason: e.to_string(),
            })?
            .into_bytes()
            .to_vec();
        let secs = self.clock.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                content,
                content_type: content_type.to_string(),
                last_modified: Utc.timestamp_opt(secs, 0).single().unwrap(),
            },
        );
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<VideoObject>> {
        let objects: Vec<VideoObject> = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, o)| VideoObject {
                key: key.clone(),
                last_modified: Some(o.last_modified),
            })
            .collect();

        if objects.is_empty() {
            return Err(StorageError::EmptyListing {
                prefix: prefix.to_string(),
            });
        }
        Ok(objects)
    }

    async fn get_object(&self, key: &str) -> StorageResult<ObjectBody> {
        let objects = self.objects.lock().unwrap();
        let object = objects.get(key).ok_or_else(|| StorageError::Get {
            key: key.to_string(),
            reason: "NoSuchKey: The specified key does not exist.".to_string(),
        })?;

        Ok(ObjectBody {
            body: ByteStream::from(object.content.clone()),
            content_type: Some(object.content_type.clone()),
            content_length: Some(object.content.len() as i64),
        })
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        Ok(format!(
            "https://mock-bucket.s3.amazonaws.com/{}?X-Amz-Expires={}",
            key,
            expires_in.as_secs()
        ))
    }

    async fn check_bucket(&self) -> StorageResult<()> {
        Ok(())
    }
}

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MockObjectStore>,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn staged_files(&self) -> usize {
        count_entries(self.staging_dir.path())
    }
}

pub async fn setup_app() -> TestApp {
    let store = Arc::new(MockObjectStore::new());
    let staging_dir = tempfile::tempdir().unwrap();

    let mut config = AppConfig::development();
    config.upload_dir = staging_dir.path().to_path_buf();
    config.public_dir = staging_dir.path().join("public");

    let staging = StagingArea::new(&config.upload_dir).await.unwrap();
    let state = AppState::new(
        store.clone(),
        staging,
        PageRenderer::new().unwrap(),
        config,
    );

    TestApp {
        app: create_app(state),
        store,
        staging_dir,
    }
}

pub fn multipart_body(boundary: &str, field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
            Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
            Content-Type: video/mp4\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
