//! Editable message input: free text plus blocks, attachments, template
//! popups, and streamed translation output.
//!
//! Key routing is layered by active popup, mirroring how the pane decides
//! which surface consumes a key before the composer sees it. The slash popup
//! has no search field of its own; the composer's key handler drives it and
//! re-syncs it against the token under the caret after every text change and
//! every cursor movement.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use palaver_backend_client::Backend;
use palaver_backend_client::FileUpload;
use palaver_backend_client::TranslateRequest;
use palaver_backend_client::TranslationEvent;
use palaver_protocol::Model;
use palaver_protocol::PromptTemplate;
use palaver_protocol::UploadedFile;

use super::attachments;
use super::blocks::ChatBlock;
use super::chat_composer_history::ChatComposerHistory;
use super::slash_command::find_slash_command;
use super::template_menu::MenuOutcome;
use super::template_menu::TemplateMenu;
use super::template_popup::TemplatePopup;
use super::textarea::TextArea;
use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::composer_bridge::ComposerAction;
use crate::composer_bridge::ComposerHandle;
use crate::template_store::TemplateStore;

/// Result of dispatching a key event into the composer.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    Submitted(UserMessage),
    None,
}

/// A fully assembled outgoing message.
#[derive(Debug, Clone, PartialEq)]
pub struct UserMessage {
    pub text: String,
    pub attachments: Vec<UploadedFile>,
}

/// Popup state. At most one is visible at any time; the template menu takes
/// precedence over the caret-following slash popup.
enum ActivePopup {
    None,
    Command(TemplatePopup),
    Menu(TemplateMenu),
}

pub struct ChatComposer {
    textarea: TextArea,
    active_popup: ActivePopup,
    app_event_tx: AppEventSender,
    backend: Arc<dyn Backend>,
    templates: Arc<Mutex<TemplateStore>>,
    history: ChatComposerHistory,
    session_id: String,
    blocks: Vec<ChatBlock>,
    next_block_id: u64,
    attachments: Vec<UploadedFile>,
    /// Capability source for attachment validation; `None` until the catalog
    /// loads.
    active_model: Option<Model>,
    translating: bool,
    has_focus: bool,
}

impl ChatComposer {
    pub fn new(
        app_event_tx: AppEventSender,
        backend: Arc<dyn Backend>,
        templates: Arc<Mutex<TemplateStore>>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            textarea: TextArea::new(),
            active_popup: ActivePopup::None,
            app_event_tx,
            backend,
            templates,
            history: ChatComposerHistory::new(),
            session_id: session_id.into(),
            blocks: Vec::new(),
            next_block_id: 1,
            attachments: Vec::new(),
            active_model: None,
            translating: false,
            has_focus: true,
        }
    }

    pub fn text(&self) -> &str {
        self.textarea.text()
    }

    pub fn cursor(&self) -> usize {
        self.textarea.cursor()
    }

    pub fn blocks(&self) -> &[ChatBlock] {
        &self.blocks
    }

    pub fn attachments(&self) -> &[UploadedFile] {
        &self.attachments
    }

    pub fn is_translating(&self) -> bool {
        self.translating
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn set_focus(&mut self, focus: bool) {
        self.has_focus = focus;
    }

    pub fn set_active_model(&mut self, model: Option<Model>) {
        self.active_model = model;
    }

    pub fn slash_popup_visible(&self) -> bool {
        matches!(self.active_popup, ActivePopup::Command(_))
    }

    pub fn template_menu_visible(&self) -> bool {
        matches!(self.active_popup, ActivePopup::Menu(_))
    }

    #[expect(clippy::unwrap_used)]
    fn templates(&self) -> MutexGuard<'_, TemplateStore> {
        self.templates.lock().unwrap()
    }

    // ------------------------------------------------------------------
    // Key routing
    // ------------------------------------------------------------------

    /// Returns the input result plus whether the visible state changed.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> (InputResult, bool) {
        if key_event.kind == KeyEventKind::Release {
            return (InputResult::None, false);
        }
        match &self.active_popup {
            ActivePopup::Menu(_) => self.handle_key_event_with_menu(key_event),
            ActivePopup::Command(_) => self.handle_key_event_with_slash_popup(key_event),
            ActivePopup::None => self.handle_key_event_without_popup(key_event),
        }
    }

    fn handle_key_event_with_menu(&mut self, key_event: KeyEvent) -> (InputResult, bool) {
        let ActivePopup::Menu(menu) = &mut self.active_popup else {
            unreachable!();
        };
        let outcome = {
            #[expect(clippy::unwrap_used)]
            let store = self.templates.lock().unwrap();
            menu.handle_key_event(&store, key_event)
        };
        match outcome {
            MenuOutcome::Handled => (InputResult::None, true),
            MenuOutcome::Dismiss => {
                self.active_popup = ActivePopup::None;
                (InputResult::None, true)
            }
            MenuOutcome::Insert(template) => {
                self.active_popup = ActivePopup::None;
                self.insert_template_at_caret(&template);
                (InputResult::None, true)
            }
        }
    }

    fn handle_key_event_with_slash_popup(&mut self, key_event: KeyEvent) -> (InputResult, bool) {
        let ActivePopup::Command(popup) = &mut self.active_popup else {
            unreachable!();
        };
        match key_event {
            KeyEvent {
                code: KeyCode::Up, ..
            } => {
                popup.move_up();
                (InputResult::None, true)
            }
            KeyEvent {
                code: KeyCode::Down,
                ..
            } => {
                popup.move_down();
                (InputResult::None, true)
            }
            KeyEvent {
                code: KeyCode::Esc, ..
            } => {
                // Dismiss the popup; the input is left untouched.
                self.active_popup = ActivePopup::None;
                (InputResult::None, true)
            }
            KeyEvent {
                code: KeyCode::Enter,
                modifiers,
                ..
            } if !modifiers.contains(KeyModifiers::SHIFT) => {
                let selected = popup.selected().cloned();
                let token = popup.token().clone();
                match selected {
                    Some(template) => {
                        self.active_popup = ActivePopup::None;
                        self.textarea
                            .replace_range(token.start, token.end, &template.content);
                        self.templates().mark_used(&template.id);
                        self.sync_command_popup();
                        (InputResult::None, true)
                    }
                    // No matches to accept: Enter falls through to send.
                    None => self.handle_submission(),
                }
            }
            _ => {
                let redraw = self.handle_input_basic(key_event);
                self.sync_command_popup();
                (InputResult::None, redraw)
            }
        }
    }

    fn handle_key_event_without_popup(&mut self, key_event: KeyEvent) -> (InputResult, bool) {
        match key_event {
            KeyEvent {
                code: KeyCode::Up | KeyCode::Down,
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                if self
                    .history
                    .should_handle_navigation(self.textarea.text(), self.textarea.cursor())
                {
                    let replacement = match key_event.code {
                        KeyCode::Up => self.history.navigate_up(),
                        _ => self.history.navigate_down(),
                    };
                    if let Some(text) = replacement {
                        self.textarea.set_text(&text);
                        self.sync_command_popup();
                        return (InputResult::None, true);
                    }
                }
                (InputResult::None, false)
            }
            KeyEvent {
                code: KeyCode::Enter,
                modifiers,
                ..
            } if !modifiers.contains(KeyModifiers::SHIFT) => self.handle_submission(),
            _ => {
                let redraw = self.handle_input_basic(key_event);
                self.sync_command_popup();
                (InputResult::None, redraw)
            }
        }
    }

    /// Plain editing keys shared by every popup state.
    fn handle_input_basic(&mut self, key_event: KeyEvent) -> bool {
        match key_event.code {
            KeyCode::Char(c)
                if !key_event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut buf = [0u8; 4];
                self.textarea.insert_str(c.encode_utf8(&mut buf));
                true
            }
            // Shift+Enter always inserts a newline, never submits.
            KeyCode::Enter => {
                self.textarea.insert_str("\n");
                true
            }
            KeyCode::Backspace => {
                self.textarea.delete_backward();
                true
            }
            KeyCode::Delete => {
                self.textarea.delete_forward();
                true
            }
            KeyCode::Left => {
                self.textarea.move_left();
                true
            }
            KeyCode::Right => {
                self.textarea.move_right();
                true
            }
            KeyCode::Home => {
                self.textarea.move_to_start();
                true
            }
            KeyCode::End => {
                self.textarea.move_to_end();
                true
            }
            _ => false,
        }
    }

    /// Bracketed paste lands at the caret like typed input, then re-syncs the
    /// popup (pasted text can create or destroy an active slash token).
    pub fn handle_paste(&mut self, pasted: String) -> bool {
        self.textarea.insert_str(&pasted);
        self.sync_command_popup();
        true
    }

    /// Move the caret; recomputes the slash popup because entering or leaving
    /// a token with a click must show or dismiss the menu just like typing.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.textarea.set_cursor(cursor);
        self.sync_command_popup();
    }

    // ------------------------------------------------------------------
    // Slash popup synchronization
    // ------------------------------------------------------------------

    /// Synchronize the slash popup with the token under the caret. Must run
    /// after every modification that can change the text or the cursor.
    fn sync_command_popup(&mut self) {
        // The explicit template menu keeps priority over caret tracking.
        if matches!(self.active_popup, ActivePopup::Menu(_)) {
            return;
        }
        let Some(token) = find_slash_command(self.textarea.text(), self.textarea.cursor()) else {
            if matches!(self.active_popup, ActivePopup::Command(_)) {
                self.active_popup = ActivePopup::None;
            }
            return;
        };
        if let ActivePopup::Command(popup) = &mut self.active_popup {
            #[expect(clippy::unwrap_used)]
            let store = self.templates.lock().unwrap();
            popup.on_token_change(&store, token);
        } else {
            let popup = {
                #[expect(clippy::unwrap_used)]
                let store = self.templates.lock().unwrap();
                TemplatePopup::new(&store, token)
            };
            self.active_popup = ActivePopup::Command(popup);
        }
    }

    // ------------------------------------------------------------------
    // Template insertion
    // ------------------------------------------------------------------

    /// Open the general insert-template menu.
    pub fn open_template_menu(&mut self) {
        let menu = {
            let store = self.templates();
            TemplateMenu::new(&store)
        };
        self.active_popup = ActivePopup::Menu(menu);
    }

    fn insert_template_at_caret(&mut self, template: &PromptTemplate) {
        self.textarea.insert_str(&template.content);
        self.templates().mark_used(&template.id);
        self.sync_command_popup();
    }

    // ------------------------------------------------------------------
    // Text entry points used by the bridge
    // ------------------------------------------------------------------

    pub fn insert_str(&mut self, text: &str) {
        self.textarea.insert_str(text);
        self.sync_command_popup();
    }

    pub fn append_text(&mut self, text: &str) {
        self.textarea.append_str(text);
        self.sync_command_popup();
    }

    // ------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------

    /// Adopt a block, reassigning its id so ids stay unique per composer.
    pub fn push_block(&mut self, mut block: ChatBlock) -> u64 {
        block.id = self.next_block_id;
        self.next_block_id += 1;
        let id = block.id;
        self.blocks.push(block);
        id
    }

    pub fn remove_block(&mut self, id: u64) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        self.blocks.len() != before
    }

    pub fn block_mut(&mut self, id: u64) -> Option<&mut ChatBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    // ------------------------------------------------------------------
    // Attachments
    // ------------------------------------------------------------------

    /// Kick off a sequential upload of one file-selection batch. Results
    /// arrive as [`AppEvent`]s and are applied via
    /// [`Self::on_attachment_uploaded`].
    pub fn attach_files(&self, files: Vec<FileUpload>) {
        let backend = self.backend.clone();
        let session_id = self.session_id.clone();
        let model = self.active_model.clone();
        let app_event_tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            attachments::upload_batch(backend, &session_id, files, model.as_ref(), &app_event_tx)
                .await;
        });
    }

    /// Append a completed upload, keeping display names unique.
    pub fn on_attachment_uploaded(&mut self, mut file: UploadedFile) {
        let base = file.filename.clone();
        let mut n = 1;
        while self.attachments.iter().any(|a| a.filename == file.filename) {
            n += 1;
            file.filename = format!("{base} ({n})");
        }
        self.attachments.push(file);
    }

    pub fn remove_attachment(&mut self, id: &str) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|a| a.id != id);
        self.attachments.len() != before
    }

    // ------------------------------------------------------------------
    // Translation
    // ------------------------------------------------------------------

    /// Translate the current input. Output streams back through the app
    /// event loop and is appended to the input as it arrives.
    pub fn begin_translation(&mut self, target_language: Option<String>) {
        if self.translating || self.textarea.is_empty() {
            return;
        }
        self.translating = true;
        let request = TranslateRequest {
            text: self.textarea.text().to_string(),
            use_input_target_language: target_language.is_none(),
            target_language,
            model_id: self.active_model.as_ref().map(|m| m.id.clone()),
        };
        let backend = self.backend.clone();
        let app_event_tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
            let forward = app_event_tx.clone();
            let pump = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    forward.send(AppEvent::Translation(event));
                }
            });
            if let Err(err) = backend.translate_text(request, tx).await {
                app_event_tx.send(AppEvent::Translation(TranslationEvent::Failed {
                    message: err.to_string(),
                }));
            }
            let _ = pump.await;
        });
    }

    /// Apply one streamed translation event. Failures keep whatever partial
    /// output already reached the input.
    pub fn on_translation_event(&mut self, event: TranslationEvent) {
        match event {
            TranslationEvent::Chunk { text } => {
                self.textarea.append_str(&text);
                self.sync_command_popup();
            }
            TranslationEvent::Done => self.translating = false,
            TranslationEvent::Failed { message } => {
                tracing::warn!("translation failed: {message}");
                self.translating = false;
            }
        }
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    fn assemble_message(&self) -> String {
        let mut sections: Vec<String> =
            self.blocks.iter().filter_map(ChatBlock::render_for_send).collect();
        let text = self.textarea.text().trim();
        if !text.is_empty() {
            sections.push(text.to_string());
        }
        sections.join("\n\n")
    }

    fn handle_submission(&mut self) -> (InputResult, bool) {
        let message = self.assemble_message();
        if message.is_empty() && self.attachments.is_empty() {
            return (InputResult::None, false);
        }
        self.history.record_local_submission(&message);
        self.textarea.clear();
        self.active_popup = ActivePopup::None;
        self.blocks.clear();
        let attachments = std::mem::take(&mut self.attachments);
        (
            InputResult::Submitted(UserMessage {
                text: message,
                attachments,
            }),
            true,
        )
    }
}

/// Bridge adapter for a composer shared with the UI loop.
///
/// The bridge worker owns this handle; each action locks the composer for
/// exactly one state transition, so bridge traffic and key events interleave
/// at action granularity, never mid-edit.
pub struct SharedComposer {
    composer: Arc<tokio::sync::Mutex<ChatComposer>>,
}

impl SharedComposer {
    pub fn new(composer: Arc<tokio::sync::Mutex<ChatComposer>>) -> Self {
        Self { composer }
    }
}

#[async_trait::async_trait]
impl ComposerHandle for SharedComposer {
    async fn apply(&mut self, action: ComposerAction) -> anyhow::Result<()> {
        match action {
            ComposerAction::InsertText(text) => {
                self.composer.lock().await.insert_str(&text);
                Ok(())
            }
            ComposerAction::AppendText(text) => {
                self.composer.lock().await.append_text(&text);
                Ok(())
            }
            ComposerAction::Focus => {
                self.composer.lock().await.set_focus(true);
                Ok(())
            }
            ComposerAction::AddBlock(block) => {
                self.composer.lock().await.push_block(block);
                Ok(())
            }
            ComposerAction::AttachTextFile { filename, content } => {
                let upload = FileUpload {
                    filename,
                    mime_type: Some("text/plain".to_string()),
                    bytes: content.into_bytes(),
                };
                let (backend, session_id, model) = {
                    let composer = self.composer.lock().await;
                    (
                        composer.backend.clone(),
                        composer.session_id.clone(),
                        composer.active_model.clone(),
                    )
                };
                attachments::validate(&upload, model.as_ref())?;
                let uploaded = backend.upload_file(&session_id, upload).await?;
                self.composer.lock().await.on_attachment_uploaded(uploaded);
                Ok(())
            }
        }
    }
}
