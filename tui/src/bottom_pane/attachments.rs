//! Client-side attachment validation and batch upload.
//!
//! Rejections that can be decided locally (size cap, image support) never
//! reach the network. Accepted files upload one at a time; a failure is
//! reported for that file and the loop moves on, so one bad file cannot sink
//! the rest of a multi-select.

use std::sync::Arc;

use palaver_backend_client::Backend;
use palaver_backend_client::FileUpload;
use palaver_protocol::Model;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;

/// Files larger than this are rejected before any upload attempt.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("file is {size} bytes; the limit is {MAX_ATTACHMENT_BYTES}")]
    TooLarge { size: u64 },
    #[error("the current model does not accept images")]
    ImageUnsupported,
}

/// Validate a picked file against the size cap and the active model's input
/// modalities. `active_model: None` (catalog still loading) only enforces the
/// size cap.
pub fn validate(upload: &FileUpload, active_model: Option<&Model>) -> Result<(), AttachmentError> {
    if upload.size() > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge {
            size: upload.size(),
        });
    }
    if upload.is_image() && active_model.is_some_and(|m| !m.supports_vision()) {
        return Err(AttachmentError::ImageUnsupported);
    }
    Ok(())
}

/// Upload one file-selection batch sequentially.
///
/// Every accepted file produces an [`AppEvent::AttachmentUploaded`]; every
/// rejection or upload failure produces an [`AppEvent::AttachmentFailed`] for
/// that file alone. Already-successful uploads are never rolled back.
pub async fn upload_batch(
    backend: Arc<dyn Backend>,
    session_id: &str,
    files: Vec<FileUpload>,
    active_model: Option<&Model>,
    app_event_tx: &AppEventSender,
) {
    for file in files {
        let filename = file.filename.clone();
        if let Err(err) = validate(&file, active_model) {
            app_event_tx.send(AppEvent::AttachmentFailed {
                filename,
                message: err.to_string(),
            });
            continue;
        }
        match backend.upload_file(session_id, file).await {
            Ok(uploaded) => app_event_tx.send(AppEvent::AttachmentUploaded(uploaded)),
            Err(err) => {
                tracing::warn!("upload of {filename} failed: {err}");
                app_event_tx.send(AppEvent::AttachmentFailed {
                    filename,
                    message: err.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use palaver_backend_client::BackendError;
    use palaver_backend_client::TranslateRequest;
    use palaver_backend_client::TranslationEvent;
    use palaver_protocol::Assistant;
    use palaver_protocol::InputModality;
    use palaver_protocol::PromptTemplate;
    use palaver_protocol::Provider;
    use palaver_protocol::UploadedFile;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tokio::sync::mpsc::UnboundedSender;
    use tokio::sync::mpsc::unbounded_channel;

    fn text_file(name: &str, bytes: usize) -> FileUpload {
        FileUpload {
            filename: name.to_string(),
            mime_type: Some("text/plain".to_string()),
            bytes: vec![b'x'; bytes],
        }
    }

    fn image_file(name: &str) -> FileUpload {
        FileUpload {
            filename: name.to_string(),
            mime_type: Some("image/png".to_string()),
            bytes: vec![0u8; 64],
        }
    }

    fn model(modalities: Vec<InputModality>) -> Model {
        Model {
            id: "m1".to_string(),
            display_name: "M1".to_string(),
            provider_id: "p1".to_string(),
            input_modalities: modalities,
            enabled: true,
        }
    }

    /// Uploads succeed unless the filename contains "bad".
    struct FlakyBackend {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Backend for FlakyBackend {
        async fn list_models(&self) -> Result<Vec<Model>, BackendError> {
            unimplemented!()
        }
        async fn list_providers(&self) -> Result<Vec<Provider>, BackendError> {
            unimplemented!()
        }
        async fn get_assistant(&self, _id: &str) -> Result<Assistant, BackendError> {
            unimplemented!()
        }
        async fn list_prompt_templates(&self) -> Result<Vec<PromptTemplate>, BackendError> {
            unimplemented!()
        }
        async fn upload_file(
            &self,
            _session_id: &str,
            upload: FileUpload,
        ) -> Result<UploadedFile, BackendError> {
            self.calls.lock().unwrap().push(upload.filename.clone());
            if upload.filename.contains("bad") {
                return Err(BackendError::Api {
                    status: 502,
                    message: "upstream".to_string(),
                });
            }
            Ok(UploadedFile {
                id: format!("id-{}", upload.filename),
                filename: upload.filename,
                mime_type: upload.mime_type.unwrap_or_default(),
                size: upload.bytes.len() as u64,
                url: None,
            })
        }
        async fn translate_text(
            &self,
            _request: TranslateRequest,
            _events: UnboundedSender<TranslationEvent>,
        ) -> Result<(), BackendError> {
            unimplemented!()
        }
    }

    #[test]
    fn oversized_file_is_rejected() {
        let file = text_file("big.txt", (MAX_ATTACHMENT_BYTES + 1) as usize);
        assert_eq!(
            validate(&file, None),
            Err(AttachmentError::TooLarge {
                size: MAX_ATTACHMENT_BYTES + 1
            })
        );
    }

    #[test]
    fn image_rejected_without_vision_support() {
        let text_only = model(vec![InputModality::Text]);
        assert_eq!(
            validate(&image_file("shot.png"), Some(&text_only)),
            Err(AttachmentError::ImageUnsupported)
        );

        let vision = model(vec![InputModality::Text, InputModality::Image]);
        assert_eq!(validate(&image_file("shot.png"), Some(&vision)), Ok(()));
        // Non-images are fine either way.
        assert_eq!(validate(&text_file("a.txt", 10), Some(&text_only)), Ok(()));
    }

    #[tokio::test]
    async fn batch_continues_past_a_failed_file() {
        let backend = Arc::new(FlakyBackend {
            calls: Mutex::new(Vec::new()),
        });
        let (tx, mut rx) = unbounded_channel();
        let events = AppEventSender::new(tx);

        upload_batch(
            backend,
            "s1",
            vec![
                text_file("one.txt", 10),
                text_file("bad.txt", 10),
                text_file("two.txt", 10),
            ],
            None,
            &events,
        )
        .await;

        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event);
        }
        assert_eq!(received.len(), 3);
        assert!(matches!(&received[0], AppEvent::AttachmentUploaded(f) if f.filename == "one.txt"));
        assert!(
            matches!(&received[1], AppEvent::AttachmentFailed { filename, .. } if filename == "bad.txt")
        );
        assert!(matches!(&received[2], AppEvent::AttachmentUploaded(f) if f.filename == "two.txt"));
    }

    #[tokio::test]
    async fn rejected_files_never_reach_the_backend() {
        let backend = Arc::new(FlakyBackend {
            calls: Mutex::new(Vec::new()),
        });
        let (tx, mut rx) = unbounded_channel();
        let events = AppEventSender::new(tx);

        upload_batch(
            backend.clone(),
            "s1",
            vec![
                text_file("huge.txt", (MAX_ATTACHMENT_BYTES + 1) as usize),
                text_file("ok.txt", 10),
            ],
            None,
            &events,
        )
        .await;

        let calls = backend.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["ok.txt".to_string()]);
        assert!(
            matches!(rx.try_recv().unwrap(), AppEvent::AttachmentFailed { filename, .. } if filename == "huge.txt")
        );
    }
}
