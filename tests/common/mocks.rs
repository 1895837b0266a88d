use async_trait::async_trait;
use patient_helpdesk::{Error, Result, attachments::AttachmentStore};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Attachment store that keeps blobs in memory.
#[derive(Default, Clone)]
pub struct MockAttachmentStore {
    pub blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

#[async_trait]
impl AttachmentStore for MockAttachmentStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        let mut blobs = self.blobs.lock().unwrap();
        if blobs.contains_key(key) {
            return Err(Error::AttachmentExists {
                key: key.to_string(),
            });
        }
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(format!("memory/{key}"))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }
}
