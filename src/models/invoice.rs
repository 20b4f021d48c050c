use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pointer from a trip record to an invoice blob held by the invoice store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRef {
    /// Hex-encoded sha256 of the blob; also its file name on disk.
    pub digest: String,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl InvoiceRef {
    pub fn content_disposition(&self) -> String {
        let name: String = self
            .file_name
            .chars()
            .map(|c| if c == '"' || c.is_control() { '_' } else { c })
            .collect();
        format!("attachment; filename=\"{name}\"")
    }
}

/// A file picked in the form but not yet written to the invoice store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl InvoiceUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}
