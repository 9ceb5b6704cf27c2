//! Uploaded-file metadata returned by the backend.

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    pub size: u64,
    /// Download location, when the backend exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}
