//! Disk store for KYC uploads.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::ServerError;

/// URL prefix under which `storage_dir` is served.
pub const PUBLIC_PREFIX: &str = "/storage";

#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one KYC file as `kyc_<user>_<kind>_<name>` and return its
    /// public path.
    pub async fn save_kyc_file(
        &self,
        user_id: Uuid,
        kind: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, ServerError> {
        let name = format!(
            "kyc_{user_id}_{kind}_{}",
            sanitize_file_name(original_name.unwrap_or_default())
        );

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| io_error("create storage directory", err))?;
        tokio::fs::write(self.root.join(&name), bytes)
            .await
            .map_err(|err| io_error("write upload", err))?;

        tracing::debug!(file = %name, size = bytes.len(), "stored kyc file");
        Ok(format!("{PUBLIC_PREFIX}/{name}"))
    }

    /// Delete files previously returned by [`FileStore::save_kyc_file`].
    /// Failures are logged, not returned.
    pub async fn discard(&self, public_paths: &[String]) {
        for path in public_paths {
            let Some(name) = path
                .strip_prefix(PUBLIC_PREFIX)
                .and_then(|rest| rest.strip_prefix('/'))
            else {
                tracing::warn!(path = %path, "not a stored upload, leaving it alone");
                continue;
            };
            if let Err(err) = tokio::fs::remove_file(self.root.join(name)).await {
                tracing::warn!(file = %name, "failed to remove upload: {err}");
            }
        }
    }
}

fn io_error(what: &str, err: std::io::Error) -> ServerError {
    tracing::error!("failed to {what}: {err}");
    ServerError::Generic("failed to store uploaded file".to_string())
}

/// Keep only the final path component and a conservative character set.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\my id.pdf"), "my_id.pdf");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[tokio::test]
    async fn saves_under_prefixed_name() {
        let dir = std::env::temp_dir().join(format!("agrimarket-store-{}", Uuid::new_v4()));
        let store = FileStore::new(&dir);
        let user = Uuid::new_v4();

        let path = store
            .save_kyc_file(user, "selfie", Some("me.jpg"), b"jpeg")
            .await
            .unwrap();

        assert_eq!(path, format!("/storage/kyc_{user}_selfie_me.jpg"));
        let written = tokio::fs::read(dir.join(format!("kyc_{user}_selfie_me.jpg")))
            .await
            .unwrap();
        assert_eq!(written, b"jpeg");
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn discard_removes_only_stored_uploads() {
        let dir = std::env::temp_dir().join(format!("agrimarket-store-{}", Uuid::new_v4()));
        let store = FileStore::new(&dir);
        let user = Uuid::new_v4();

        let path = store
            .save_kyc_file(user, "national_id", Some("id.pdf"), b"pdf")
            .await
            .unwrap();
        let on_disk = dir.join(format!("kyc_{user}_national_id_id.pdf"));
        assert!(tokio::fs::try_exists(&on_disk).await.unwrap());

        store
            .discard(&[path, "/elsewhere/secret.txt".to_string()])
            .await;

        assert!(!tokio::fs::try_exists(&on_disk).await.unwrap());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
