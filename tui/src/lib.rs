// Forbid accidental stdout/stderr writes in the composer layer; everything
// user-visible goes through the event bus or tracing.
#![deny(clippy::print_stdout, clippy::print_stderr)]

//! Composer layer of the Palaver chat client.
//!
//! Everything here is view state decoupled from rendering: the message
//! composer and its popups, the template store, the override draft
//! synchronizer, and the bridge that lets non-UI callers push content into
//! the live composer. The remote API stays behind
//! [`palaver_backend_client::Backend`].

mod app_event;
mod app_event_sender;
pub mod bottom_pane;
mod capabilities;
mod composer_bridge;
mod override_sync;
mod prefs;
mod reasoning;
mod template_store;

pub use app_event::AppEvent;
pub use app_event_sender::AppEventSender;
pub use capabilities::active_model;
pub use capabilities::active_provider_class;
pub use capabilities::field_supported;
pub use capabilities::visible_fields;
pub use composer_bridge::Completion;
pub use composer_bridge::ComposerAction;
pub use composer_bridge::ComposerBridge;
pub use composer_bridge::ComposerHandle;
pub use override_sync::DEBOUNCE_WINDOW;
pub use override_sync::OverrideDraftSynchronizer;
pub use override_sync::OverrideSaver;
pub use override_sync::PROP_SYNC_SUPPRESS_WINDOW;
pub use prefs::FilePrefs;
pub use prefs::MemoryPrefs;
pub use prefs::PrefsStore;
pub use reasoning::ReasoningDisplay;
pub use reasoning::ReasoningSection;
pub use template_store::MAX_RECENT_TEMPLATES;
pub use template_store::TemplateStore;
pub use template_store::TemplatesLoadState;
