mod local;

pub use local::LocalAttachmentStore;

use crate::{Error, Result};
use async_trait::async_trait;
use std::path::Path;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "txt"];

/// Write-once blob storage for inquiry attachments.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Stores `bytes` under `key` and returns the path it was written to.
    /// Fails with [`Error::AttachmentExists`] if the key is already taken.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String>;

    /// Deletes the blob under `key`. A missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Builds the storage key `<patient_id>_<policy_id>_<file name>`.
///
/// Only the last path component of `file_name` is kept, and path separators in
/// the ids are replaced, so the key never escapes the store's directory.
pub fn attachment_key(patient_id: &str, policy_id: &str, file_name: &str) -> Result<String> {
    let base_name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::UnsupportedAttachment {
            file_name: file_name.to_string(),
        })?;

    let extension = Path::new(base_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(Error::UnsupportedAttachment {
                file_name: base_name.to_string(),
            });
        }
    }

    Ok(format!(
        "{}_{}_{}",
        strip_separators(patient_id),
        strip_separators(policy_id),
        base_name
    ))
}

fn strip_separators(value: &str) -> String {
    value.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_key_layout() {
        assert_eq!(
            attachment_key("12345", "POL-1", "letter.pdf").unwrap(),
            "12345_POL-1_letter.pdf"
        );
    }

    #[rstest]
    #[case("scan.PNG")]
    #[case("photo.jpg")]
    #[case("notes.txt")]
    fn test_allowed_extensions(#[case] file_name: &str) {
        assert!(attachment_key("p", "q", file_name).is_ok());
    }

    #[rstest]
    #[case("malware.exe")]
    #[case("archive.tar.gz")]
    #[case("README")]
    #[case("")]
    #[case("..")]
    fn test_rejected_names(#[case] file_name: &str) {
        assert!(matches!(
            attachment_key("p", "q", file_name),
            Err(Error::UnsupportedAttachment { .. })
        ));
    }

    #[test]
    fn test_key_strips_directories() {
        assert_eq!(
            attachment_key("../12345", "a/b", "../../etc/letter.pdf").unwrap(),
            ".._12345_a_b_letter.pdf"
        );
    }
}
