use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use palaver_protocol::Assistant;
use palaver_protocol::Model;
use palaver_protocol::PromptTemplate;
use palaver_protocol::Provider;
use palaver_protocol::UploadedFile;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A file picked by the user, before any network round trip.
///
/// Validation (size cap, image support) happens on this value client-side so
/// rejected files never reach [`Backend::upload_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// When set, the backend translates into the session's configured input
    /// language and `target_language` is ignored.
    pub use_input_target_language: bool,
}

/// Incremental translation output.
///
/// Chunks arrive in order and are concatenated by the consumer; a terminal
/// `Done` or `Failed` always follows the last chunk. Text streamed before a
/// failure is intentionally kept by consumers (partial output is better than
/// none for a lossy affordance like translation).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranslationEvent {
    Chunk { text: String },
    Done,
    Failed { message: String },
}

/// The remote collaborator, abstracted.
///
/// Catalog calls are read-only lookups. Override persistence is deliberately
/// NOT part of this trait: the override synchronizer hands the merged value
/// to a caller-supplied callback and stays ignorant of the wire format.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_models(&self) -> Result<Vec<Model>, BackendError>;

    async fn list_providers(&self) -> Result<Vec<Provider>, BackendError>;

    async fn get_assistant(&self, id: &str) -> Result<Assistant, BackendError>;

    async fn list_prompt_templates(&self) -> Result<Vec<PromptTemplate>, BackendError>;

    async fn upload_file(
        &self,
        session_id: &str,
        upload: FileUpload,
    ) -> Result<UploadedFile, BackendError>;

    /// Stream a translation of `request.text`.
    ///
    /// Chunks are delivered through `events` as they arrive. A failure before
    /// the stream opens is returned as `Err`; a failure mid-stream is
    /// delivered as [`TranslationEvent::Failed`] so partial output already
    /// sent stays usable.
    async fn translate_text(
        &self,
        request: TranslateRequest,
        events: UnboundedSender<TranslationEvent>,
    ) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn translation_events_decode_from_tagged_json() {
        let chunk: TranslationEvent =
            serde_json::from_str(r#"{"type":"chunk","text":"hola"}"#).unwrap();
        assert_eq!(
            chunk,
            TranslationEvent::Chunk {
                text: "hola".to_string()
            }
        );
        let done: TranslationEvent = serde_json::from_str(r#"{"type":"done"}"#).unwrap();
        assert_eq!(done, TranslationEvent::Done);
    }

    #[test]
    fn file_upload_classifies_images_by_mime_type() {
        let upload = FileUpload {
            filename: "shot.png".to_string(),
            mime_type: Some("image/png".to_string()),
            bytes: vec![0u8; 16],
        };
        assert!(upload.is_image());
        assert_eq!(upload.size(), 16);

        let upload = FileUpload {
            filename: "notes.txt".to_string(),
            mime_type: None,
            bytes: Vec::new(),
        };
        assert!(!upload.is_image());
    }
}
