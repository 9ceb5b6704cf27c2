//! Reasoning-trace ("thinking") display state.
//!
//! Assistant turns can carry reasoning sections that stream in alongside the
//! answer. Each section is independently collapsible, and the whole trace can
//! be copied to the clipboard. Copying is a best-effort affordance: clipboard
//! access fails routinely (headless sessions, Wayland without the portal) and
//! those failures are swallowed.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningSection {
    /// Optional one-line summary shown while collapsed.
    pub summary: Option<String>,
    pub content: String,
    pub collapsed: bool,
}

#[derive(Debug, Default)]
pub struct ReasoningDisplay {
    sections: Vec<ReasoningSection>,
}

impl ReasoningDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[ReasoningSection] {
        &self.sections
    }

    /// Start a new section; subsequent deltas append to it.
    pub fn begin_section(&mut self, summary: Option<String>) {
        self.sections.push(ReasoningSection {
            summary,
            content: String::new(),
            collapsed: true,
        });
    }

    /// Append streamed reasoning text to the current section, creating one
    /// if the stream started without a section marker.
    pub fn push_delta(&mut self, delta: &str) {
        if self.sections.is_empty() {
            self.begin_section(None);
        }
        if let Some(last) = self.sections.last_mut() {
            last.content.push_str(delta);
        }
    }

    pub fn toggle_collapsed(&mut self, idx: usize) {
        if let Some(section) = self.sections.get_mut(idx) {
            section.collapsed = !section.collapsed;
        }
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    /// The full trace as plain text, sections separated by blank lines.
    pub fn full_text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.content.as_str())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Copy the full trace to the system clipboard, best-effort.
    pub fn copy_to_clipboard(&self) {
        copy_text(&self.full_text());
    }
}

#[cfg(not(target_os = "android"))]
fn copy_text(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(err) = clipboard.set_text(text.to_string()) {
                tracing::debug!("clipboard copy failed: {err}");
            }
        }
        Err(err) => tracing::debug!("clipboard unavailable: {err}"),
    }
}

#[cfg(target_os = "android")]
fn copy_text(_text: &str) {}
