//! Free-form composer blocks.
//!
//! A block is a titled, collapsible chunk of content assembled into the
//! outgoing message alongside the free text. Editing goes through draft
//! fields so cancel restores the committed title/content untouched.

use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BlockKind {
    Code,
    Note,
    /// A short reference to an attached file rather than inline content.
    AttachmentNote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatBlock {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub collapsed: bool,
    pub kind: BlockKind,
    /// Language tag for fenced rendering of code blocks.
    pub language: Option<String>,
    /// Where the content came from (an editor pane, a file path).
    pub source: Option<String>,
    pub attachment_filename: Option<String>,
    draft_title: Option<String>,
    draft_content: Option<String>,
}

impl ChatBlock {
    pub fn new(id: u64, kind: BlockKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            collapsed: false,
            kind,
            language: None,
            source: None,
            attachment_filename: None,
            draft_title: None,
            draft_content: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.draft_title.is_some()
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Enter edit mode, seeding the drafts from the committed copy.
    pub fn begin_edit(&mut self) {
        self.draft_title = Some(self.title.clone());
        self.draft_content = Some(self.content.clone());
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        if self.is_editing() {
            self.draft_title = Some(title.into());
        }
    }

    pub fn set_draft_content(&mut self, content: impl Into<String>) {
        if self.is_editing() {
            self.draft_content = Some(content.into());
        }
    }

    /// Commit the drafts. A blank (all-whitespace) draft title keeps the
    /// previous title; the committed title is always trimmed.
    pub fn save_edit(&mut self) {
        if let Some(draft_title) = self.draft_title.take() {
            let trimmed = draft_title.trim();
            if !trimmed.is_empty() {
                self.title = trimmed.to_string();
            }
        }
        if let Some(draft_content) = self.draft_content.take() {
            self.content = draft_content;
        }
    }

    /// Leave edit mode without touching the committed copy.
    pub fn cancel_edit(&mut self) {
        self.draft_title = None;
        self.draft_content = None;
    }

    /// Whether the block contributes anything to an outgoing message.
    pub fn is_empty(&self) -> bool {
        match self.kind {
            BlockKind::AttachmentNote => {
                self.attachment_filename.is_none() && self.title.trim().is_empty()
            }
            _ => self.content.trim().is_empty(),
        }
    }

    /// Render the block for message assembly, or `None` when empty.
    ///
    /// Attachment notes become a one-line reference; everything else is a
    /// fenced section tagged with the language (or kind, for plain notes).
    pub fn render_for_send(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match self.kind {
            BlockKind::AttachmentNote => {
                let name = self
                    .attachment_filename
                    .as_deref()
                    .unwrap_or(self.title.trim());
                Some(format!("[attached: {name}]"))
            }
            _ => {
                let tag = match (&self.language, self.kind) {
                    (Some(language), _) => language.clone(),
                    (None, kind) => kind.to_string(),
                };
                let title = self.title.trim();
                let mut out = String::new();
                if !title.is_empty() {
                    out.push_str(title);
                    out.push('\n');
                }
                out.push_str(&format!("```{tag}\n{}\n```", self.content.trim_end()));
                Some(out)
            }
        }
    }
}
