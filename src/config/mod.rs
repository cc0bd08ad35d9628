use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8500;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Object storage connection settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket region (REGION_S)
    pub region: String,
    /// Access key id (ID_S)
    pub access_key_id: String,
    /// Secret access key (SECRET_S)
    pub secret_access_key: String,
    /// Bucket name (BUCKET_NAME_S)
    pub bucket: String,
    /// Custom endpoint for S3-compatible stores such as MinIO (S3_ENDPOINT)
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,

    /// Listening port (default: 8500)
    pub port: u16,

    /// Directory where uploads are staged before forwarding (default: "uploads")
    pub upload_dir: PathBuf,

    /// Directory served for unmatched paths (default: "public")
    pub public_dir: PathBuf,

    /// Maximum upload body size in bytes (default: 1 GB)
    pub max_file_size: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let storage = StorageConfig {
            region: required("REGION_S")?,
            access_key_id: required("ID_S")?,
            secret_access_key: required("SECRET_S")?,
            bucket: required("BUCKET_NAME_S")?,
            endpoint_url: lookup("S3_ENDPOINT").filter(|v| !v.trim().is_empty()),
        };

        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: v,
            })?,
            None => DEFAULT_PORT,
        };

        let max_file_size = match lookup("MAX_FILE_SIZE") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "MAX_FILE_SIZE",
                value: v,
            })?,
            None => 1024 * 1024 * 1024, // 1 GB
        };

        Ok(Self {
            storage,
            port,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            max_file_size,
        })
    }

    /// Config for tests and local runs against a fake store
    pub fn development() -> Self {
        Self {
            storage: StorageConfig {
                region: "us-east-1".to_string(),
                access_key_id: "minioadmin".to_string(),
                secret_access_key: "minioadmin".to_string(),
                bucket: "videos".to_string(),
                endpoint_url: Some("http://127.0.0.1:9000".to_string()),
            },
            port: DEFAULT_PORT,
            upload_dir: PathBuf::from("uploads"),
            public_dir: PathBuf::from("public"),
            max_file_size: 1024 * 1024 * 1024,
        }
    }
}
