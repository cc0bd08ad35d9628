use crate::config::StorageConfig;
use crate::services::storage::{ObjectStore, S3ObjectStore};
use aws_sdk_s3::config::{Credentials, Region};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn setup_storage(config: &StorageConfig) -> Arc<S3ObjectStore> {
    let endpoint = config.endpoint_url.as_deref().unwrap_or("AWS default");
    info!(
        "☁️  S3 Storage: {} (Region: {}, Bucket: {})",
        endpoint, config.region, config.bucket
    );

    let mut loader = aws_config::from_env()
        .region(Region::new(config.region.clone()))
        .credentials_provider(Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "static",
        ));
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let aws_config = loader.load().await;

    // Self-hosted S3 implementations generally expect path-style addressing.
    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();

    let store = S3ObjectStore::new(aws_sdk_s3::Client::from_conf(s3_config), config.bucket.clone());

    match store.check_bucket().await {
        Ok(()) => info!("✅ Bucket '{}' is ready", store.bucket()),
        Err(e) => warn!("⚠️  {}", e),
    }

    Arc::new(store)
}
