//! The bottom pane is the interactive footer of the chat UI.
//!
//! The pane owns the [`ChatComposer`] (editable prompt input) and its
//! transient popups. Input routing is layered: the composer decides which
//! local surface receives a key (template menu, slash popup, or the textarea
//! itself), while higher-level intent like "interrupt" stays with the parent
//! widget.

mod attachments;
mod blocks;
mod chat_composer;
mod chat_composer_history;
mod scroll_state;
mod slash_command;
mod template_menu;
mod template_popup;
mod textarea;

pub use attachments::AttachmentError;
pub use attachments::MAX_ATTACHMENT_BYTES;
pub use attachments::upload_batch;
pub use attachments::validate;
pub use blocks::BlockKind;
pub use blocks::ChatBlock;
pub use chat_composer::ChatComposer;
pub use chat_composer::InputResult;
pub use chat_composer::SharedComposer;
pub use chat_composer::UserMessage;
pub use slash_command::SlashCommandMatch;
pub use slash_command::find_slash_command;
