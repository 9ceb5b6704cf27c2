//! Application-level events used to coordinate UI actions.
//!
//! `AppEvent` is the internal message bus between composer components and the
//! top-level event loop. Background work (uploads, translation streams) emits
//! events to request state changes that must be applied on the UI side,
//! without needing direct access to the composer.

use palaver_backend_client::TranslationEvent;
use palaver_protocol::UploadedFile;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A file from an upload batch finished uploading.
    AttachmentUploaded(UploadedFile),

    /// A file from an upload batch was rejected or failed to upload.
    /// Surfaced to the user as a per-file notification.
    AttachmentFailed { filename: String, message: String },

    /// Incremental output from an in-flight translation request.
    Translation(TranslationEvent),
}
