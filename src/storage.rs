//! Image upload relay: forwards an in-memory buffer to blob storage and
//! returns the public URL the stored object is reachable under.

use aws_sdk_s3::primitives::ByteStream;
use url::Url;
use uuid::Uuid;

use crate::{config::Config, error::AppError};

#[derive(Clone)]
pub struct ImageStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: Url,
}

impl ImageStore {
    /// Builds the relay from configuration. Returns `None` when the bucket is
    /// not configured, in which case the rest of the API keeps working and
    /// only requests that actually carry a file fail.
    pub async fn from_config(config: &Config) -> Option<Self> {
        let bucket = config.s3_bucket.clone()?;
        // `Url::join` drops the last path segment without a trailing slash.
        let mut base = config.s3_public_url.clone()?;
        if !base.ends_with('/') {
            base.push('/');
        }
        let public_base = Url::parse(&base).ok()?;

        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_s3::Client::new(&sdk_config);

        Some(Self {
            client,
            bucket,
            public_base,
        })
    }

    /// Uploads one image and returns its public URL.
    ///
    /// The caller sequences this before the database insert that references
    /// the URL: an upload failure fails the whole request, and a later insert
    /// failure at worst orphans the blob.
    pub async fn store(
        &self,
        prefix: &str,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, AppError> {
        let key = object_key(prefix, file_name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Blob upload failed for {}: {:?}", key, e);
                AppError::InternalServerError(format!("Blob upload failed: {}", e))
            })?;

        let url = self
            .public_base
            .join(&key)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        tracing::info!("Image uploaded: {}", url);
        Ok(url.to_string())
    }
}

/// Unique object key under a container prefix. The original file name is kept
/// as a readable suffix with path separators stripped.
fn object_key(prefix: &str, file_name: &str) -> String {
    let safe_name: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}/{}-{}", prefix, Uuid::new_v4(), safe_name)
}
