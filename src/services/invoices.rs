use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tokio::{fs, task};
use tracing::debug;

use crate::{
    error::AppError,
    models::invoice::{InvoiceRef, InvoiceUpload},
};

/// Content-addressed blob directory for invoice attachments.
#[derive(Clone)]
pub struct InvoiceStore {
    root: Arc<PathBuf>,
}

impl InvoiceStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.root()).await?;
        Ok(())
    }

    fn blob_path(&self, digest: &str) -> Result<PathBuf, AppError> {
        if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AppError::NotFound);
        }
        Ok(self.root().join(digest))
    }

    /// Writes the blob unless identical content is already stored.
    pub async fn store(&self, upload: &InvoiceUpload) -> Result<InvoiceRef, AppError> {
        let digest = hex::encode(Sha256::digest(&upload.bytes));
        let path = self.blob_path(&digest)?;
        if fs::try_exists(&path).await? {
            debug!("invoice blob {digest} already stored");
        } else {
            self.ensure_structure().await?;
            write_blob(self.root().to_path_buf(), path, upload.bytes.clone()).await?;
            debug!("stored invoice blob {digest} ({} bytes)", upload.bytes.len());
        }

        Ok(InvoiceRef {
            digest,
            file_name: upload.file_name.clone(),
            content_type: upload.content_type.clone(),
            size: upload.bytes.len() as u64,
            uploaded_at: Utc::now(),
        })
    }

    pub async fn read(&self, invoice: &InvoiceRef) -> Result<Vec<u8>, AppError> {
        let path = self.blob_path(&invoice.digest)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound),
            Err(err) => Err(err.into()),
        }
    }
}

/// Writes through a uniquely named temp file so concurrent uploads of the
/// same content never share a staging path.
async fn write_blob(root: PathBuf, path: PathBuf, bytes: Vec<u8>) -> Result<(), AppError> {
    task::spawn_blocking(move || -> Result<(), AppError> {
        let mut tmp = NamedTempFile::new_in(&root)?;
        tmp.write_all(&bytes)?;
        tmp.persist(&path).map_err(|err| AppError::Io(err.error))?;
        Ok(())
    })
    .await
    .map_err(|err| AppError::Other(err.into()))?
}
