use crate::services::storage::{ObjectBody, ObjectStore, StorageResult, VideoObject};
use aws_sdk_s3::primitives::ByteStream;
use std::sync::Arc;
use std::time::Duration;

/// Key prefix under which every uploaded video is stored.
pub const VIDEO_PREFIX: &str = "rawvideo/";
/// Only keys with this exact (case-sensitive) suffix are catalog entries.
pub const VIDEO_EXTENSION: &str = ".mp4";
/// Lifetime of pre-signed download URLs.
pub const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(3600);

pub struct VideoCatalog {
    store: Arc<dyn ObjectStore>,
}

impl VideoCatalog {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Display names of all videos, in the order the store listed them.
    ///
    /// An empty bucket prefix surfaces as [`StorageError::EmptyListing`];
    /// a prefix holding only non-video keys yields an empty list.
    ///
    /// [`StorageError::EmptyListing`]: crate::services::storage::StorageError::EmptyListing
    pub async fn list_videos(&self) -> StorageResult<Vec<String>> {
        let objects = self.store.list_objects(VIDEO_PREFIX).await?;
        Ok(videos(&objects)
            .map(|o| o.display_name(VIDEO_PREFIX))
            .collect())
    }

    /// Display name of the most recently modified video, if any.
    pub async fn latest_video(&self) -> StorageResult<Option<String>> {
        let objects = self.store.list_objects(VIDEO_PREFIX).await?;
        Ok(latest(&objects).map(|o| o.display_name(VIDEO_PREFIX)))
    }

    /// Stores `body` as `rawvideo/<file_name>` and returns the key.
    pub async fn publish(
        &self,
        file_name: &str,
        body: ByteStream,
        content_type: &str,
    ) -> StorageResult<String> {
        let key = video_key(file_name);
        self.store.put_object(&key, body, content_type).await?;
        Ok(key)
    }

    pub async fn open(&self, file_name: &str) -> StorageResult<ObjectBody> {
        self.store.get_object(&video_key(file_name)).await
    }

    pub async fn download_url(&self, file_name: &str) -> StorageResult<String> {
        self.store
            .presigned_get_url(&video_key(file_name), DOWNLOAD_URL_TTL)
            .await
    }
}

pub fn video_key(file_name: &str) -> String {
    format!("{VIDEO_PREFIX}{file_name}")
}

fn videos(objects: &[VideoObject]) -> impl Iterator<Item = &VideoObject> {
    objects.iter().filter(|o| o.key.ends_with(VIDEO_EXTENSION))
}

/// Newest video by last-modified time. Ties go to the earliest listed
/// entry; objects without a timestamp rank below any dated one.
fn latest(objects: &[VideoObject]) -> Option<&VideoObject> {
    videos(objects).fold(None, |best, candidate| match best {
        Some(current) if current.last_modified >= candidate.last_modified => Some(current),
        _ => Some(candidate),
    })
}
