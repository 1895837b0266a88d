use super::AttachmentStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::{io::ErrorKind, path::PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

/// Stores attachments as files in one directory.
pub struct LocalAttachmentStore {
    root: PathBuf,
}

impl LocalAttachmentStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!("Attachment directory ready: {}", root.display());
        Ok(Self { root })
    }
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        let path = self.root.join(key);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => Error::AttachmentExists {
                    key: key.to_string(),
                },
                _ => Error::Io(e),
            })?;
        file.write_all(bytes).await?;
        file.flush().await?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path.to_string_lossy().to_string())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.root.join(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
