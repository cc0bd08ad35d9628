use aws_sdk_s3::primitives::ByteStream;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// On-disk landing area for uploads on their way to object storage.
///
/// Every staged file gets its own randomly named temporary file inside the
/// staging directory. The file is removed when the [`StagedUpload`] is
/// released or dropped, so a failed forward does not leave it behind.
pub struct StagingArea {
    dir: PathBuf,
}

pub struct StagedUpload {
    file: NamedTempFile,
    original_filename: String,
    mime_type: String,
    size: u64,
}

impl StagingArea {
    pub async fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn stage<R>(
        &self,
        original_filename: &str,
        mime_type: &str,
        mut reader: R,
    ) -> io::Result<StagedUpload>
    where
        R: AsyncRead + Unpin + Send,
    {
        let temp_file = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(&self.dir)?;
        let mut writer = tokio::fs::File::from_std(temp_file.reopen()?);

        let size = tokio::io::copy(&mut reader, &mut writer).await?;
        writer.flush().await?;

        tracing::debug!(
            "Staged {} ({} bytes) at {}",
            original_filename,
            size,
            temp_file.path().display()
        );

        Ok(StagedUpload {
            file: temp_file,
            original_filename: original_filename.to_string(),
            mime_type: mime_type.to_string(),
            size,
        })
    }
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Streams the staged file from disk without loading it into memory.
    pub async fn body(&self) -> io::Result<ByteStream> {
        ByteStream::from_path(self.file.path())
            .await
            .map_err(io::Error::other)
    }

    /// Deletes the temporary file, reporting any failure.
    pub fn release(self) -> io::Result<()> {
        self.file.close()
    }
}

/// Reduces a client-supplied filename to its final path component.
///
/// Returns `None` when nothing usable is left.
pub fn upload_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    async fn staged_bytes(staged: &StagedUpload) -> Vec<u8> {
        let body = staged.body().await.unwrap();
        body.collect().await.unwrap().into_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_stage_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).await.unwrap();

        let staged = staging
            .stage("clip.mp4", "video/mp4", &b"frame data"[..])
            .await
            .unwrap();

        assert_eq!(staged.original_filename(), "clip.mp4");
        assert_eq!(staged.mime_type(), "video/mp4");
        assert_eq!(staged.size(), 10);
        assert!(staged.path().starts_with(dir.path()));
        assert_eq!(staged_bytes(&staged).await, b"frame data");
        assert_eq!(entries(dir.path()), 1);

        staged.release().unwrap();
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).await.unwrap();

        let staged = staging
            .stage("clip.mp4", "video/mp4", &b"abc"[..])
            .await
            .unwrap();
        assert_eq!(entries(dir.path()), 1);

        drop(staged);
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_concurrent_stages_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).await.unwrap();

        let first = staging.stage("same.mp4", "video/mp4", &b"one"[..]);
        let second = staging.stage("same.mp4", "video/mp4", &b"two"[..]);
        let (first, second) = tokio::join!(first, second);
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_ne!(first.path(), second.path());
        assert_eq!(staged_bytes(&first).await, b"one");
        assert_eq!(staged_bytes(&second).await, b"two");
    }

    #[tokio::test]
    async fn test_new_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads").join("inner");
        let staging = StagingArea::new(&nested).await.unwrap();
        assert!(staging.dir().is_dir());
    }

    #[test]
    fn test_upload_file_name() {
        assert_eq!(upload_file_name("clip.mp4").as_deref(), Some("clip.mp4"));
        assert_eq!(
            upload_file_name("C:\\Users\\me\\clip.mp4").as_deref(),
            Some("clip.mp4")
        );
        assert_eq!(upload_file_name("dir/sub/clip.mp4").as_deref(), Some("clip.mp4"));
        assert_eq!(upload_file_name(""), None);
        assert_eq!(upload_file_name("dir/"), None);
        assert_eq!(upload_file_name(".."), None);
    }
}
