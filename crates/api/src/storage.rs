//! Backing object store for note content.
//!
//! Built on OpenDAL so local filesystem and S3-compatible stores share one
//! `Operator` API. The subsystem only ever reads: uploads land in the store
//! through the separate upload service.

use opendal::{FuturesBytesStream, Operator};

use crate::config::StorageConfig;

/// Read-only handle to the content store, exposing exactly the primitives
/// the streaming controller needs: size lookup, full reads, ranged reads.
#[derive(Clone)]
pub struct ObjectStore {
    op: Operator,
}

impl ObjectStore {
    /// Build a store from configuration.
    pub fn from_config(config: &StorageConfig) -> Result<Self, opendal::Error> {
        match config {
            StorageConfig::Fs { root } => Self::new_fs(root),
            StorageConfig::S3 {
                bucket,
                endpoint,
                region,
                access_key_id,
                secret_access_key,
            } => {
                let builder = opendal::services::S3::default()
                    .bucket(bucket)
                    .endpoint(endpoint)
                    .region(region)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key);
                Ok(Self {
                    op: Operator::new(builder)?.finish(),
                })
            }
        }
    }

    /// Build a local-filesystem store rooted at `root`.
    pub fn new_fs(root: &str) -> Result<Self, opendal::Error> {
        let builder = opendal::services::Fs::default().root(root);
        Ok(Self {
            op: Operator::new(builder)?.finish(),
        })
    }

    /// Size of the object in bytes.
    pub async fn stat(&self, object_key: &str) -> Result<u64, opendal::Error> {
        Ok(self.op.stat(object_key).await?.content_length())
    }

    /// Stream the whole object.
    pub async fn read_full(&self, object_key: &str) -> Result<FuturesBytesStream, opendal::Error> {
        let reader = self.op.reader(object_key).await?;
        reader.into_bytes_stream(..).await
    }

    /// Stream `length` bytes starting at byte `offset`.
    pub async fn read_range(
        &self,
        object_key: &str,
        offset: u64,
        length: u64,
    ) -> Result<FuturesBytesStream, opendal::Error> {
        let reader = self.op.reader(object_key).await?;
        reader.into_bytes_stream(offset..offset + length).await
    }
}
