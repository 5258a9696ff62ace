//! Local filesystem implementation of `MediaStore`.
//!
//! Uploads are stored under their SHA-256 hash (sharded two levels deep).
//! This automatically deduplicates identical pictures.

use std::path::PathBuf;

use async_trait::async_trait;
use domains::ports::MediaStore;
use sha2::{Digest, Sha256};
use tokio::fs;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/media")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/media")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix,
        }
    }

    /// "ab/cd/abcdef....ext" relative to the root.
    fn sharded(media_id: &str) -> String {
        format!("{}/{}/{}", &media_id[0..2], &media_id[2..4], media_id)
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save_picture(&self, data: Vec<u8>, content_type: &str) -> anyhow::Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let hash = hex::encode(hasher.finalize());

        let ext = mime_guess::get_mime_extensions_str(content_type)
            .and_then(|exts| exts.first())
            .copied()
            .unwrap_or("bin");
        let media_id = format!("{hash}.{ext}");

        let target = self.root_path.join(Self::sharded(&media_id));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        if !fs::try_exists(&target).await.unwrap_or(false) {
            fs::write(&target, &data).await?;
        }

        Ok(media_id)
    }

    fn picture_url(&self, media_id: &str) -> String {
        format!("{}/{}", self.url_prefix, Self::sharded(media_id))
    }
}
