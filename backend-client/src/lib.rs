//! Async client for the Palaver backend.
//!
//! The UI layer programs against the [`Backend`] trait so tests can swap in
//! an in-memory fake; [`client::Client`] is the reqwest-backed implementation
//! used by the real application.

pub mod backend;
pub mod client;

pub use backend::Backend;
pub use backend::BackendError;
pub use backend::FileUpload;
pub use backend::TranslateRequest;
pub use backend::TranslationEvent;
pub use client::Client;
