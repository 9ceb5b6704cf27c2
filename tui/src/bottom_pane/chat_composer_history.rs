//! Shell-style history navigation (Up/Down) inside the chat composer.
//!
//! Entries are messages submitted during this UI session. The struct is
//! decoupled from the editing widget so the logic stays isolated and easy to
//! test.

pub(crate) struct ChatComposerHistory {
    /// Messages submitted this session, newest at the END.
    local_history: Vec<String>,

    /// Current cursor within the history. `None` means the user is not
    /// browsing.
    history_cursor: Option<usize>,

    /// The text last inserted into the composer by history navigation. Used
    /// together with the line-boundary check to decide whether further
    /// Up/Down presses navigate or move the caret.
    last_history_text: Option<String>,
}

impl ChatComposerHistory {
    pub fn new() -> Self {
        Self {
            local_history: Vec::new(),
            history_cursor: None,
            last_history_text: None,
        }
    }

    /// Record a submitted message so it can be recalled later. Empty
    /// messages and immediate duplicates are skipped.
    pub fn record_local_submission(&mut self, text: &str) {
        self.history_cursor = None;
        self.last_history_text = None;
        if text.is_empty() {
            return;
        }
        if self.local_history.last().is_some_and(|prev| prev == text) {
            return;
        }
        self.local_history.push(text.to_string());
    }

    /// Whether Up/Down should navigate history for the current textarea
    /// state.
    ///
    /// Empty text always navigates. Non-empty text navigates only when it
    /// exactly matches the last recalled entry and the caret sits at a text
    /// boundary, so cursor movement inside an edited draft stays normal.
    pub fn should_handle_navigation(&self, text: &str, cursor: usize) -> bool {
        if self.local_history.is_empty() {
            return false;
        }
        if text.is_empty() {
            return true;
        }
        if cursor != 0 && cursor != text.len() {
            return false;
        }
        matches!(&self.last_history_text, Some(prev) if prev == text)
    }

    /// Handle <Up>: step toward older entries.
    pub fn navigate_up(&mut self) -> Option<String> {
        let total = self.local_history.len();
        if total == 0 {
            return None;
        }
        let next_idx = match self.history_cursor {
            None => total - 1,
            Some(0) => return None, // already at oldest
            Some(idx) => idx - 1,
        };
        self.history_cursor = Some(next_idx);
        let text = self.local_history[next_idx].clone();
        self.last_history_text = Some(text.clone());
        Some(text)
    }

    /// Handle <Down>: step toward newer entries; past the newest, restore an
    /// empty composer and exit browsing.
    pub fn navigate_down(&mut self) -> Option<String> {
        let total = self.local_history.len();
        let idx = self.history_cursor?;
        if idx + 1 >= total {
            self.history_cursor = None;
            self.last_history_text = None;
            return Some(String::new());
        }
        self.history_cursor = Some(idx + 1);
        let text = self.local_history[idx + 1].clone();
        self.last_history_text = Some(text.clone());
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_submissions_are_not_recorded() {
        let mut history = ChatComposerHistory::new();
        history.record_local_submission("");
        assert!(history.local_history.is_empty());

        history.record_local_submission("hello");
        history.record_local_submission("hello");
        assert_eq!(history.local_history, vec!["hello".to_string()]);

        history.record_local_submission("world");
        assert_eq!(
            history.local_history,
            vec!["hello".to_string(), "world".to_string()]
        );
    }

    #[test]
    fn up_walks_back_and_down_returns_to_empty() {
        let mut history = ChatComposerHistory::new();
        history.record_local_submission("one");
        history.record_local_submission("two");

        assert_eq!(history.navigate_up().as_deref(), Some("two"));
        assert_eq!(history.navigate_up().as_deref(), Some("one"));
        assert_eq!(history.navigate_up(), None); // oldest

        assert_eq!(history.navigate_down().as_deref(), Some("two"));
        assert_eq!(history.navigate_down().as_deref(), Some(""));
        // No longer browsing.
        assert_eq!(history.navigate_down(), None);
    }

    #[test]
    fn navigation_gate_requires_boundary_cursor_and_matching_text() {
        let mut history = ChatComposerHistory::new();
        history.record_local_submission("hello");
        history.last_history_text = Some("hello".to_string());

        assert!(history.should_handle_navigation("", 0));
        assert!(history.should_handle_navigation("hello", 0));
        assert!(history.should_handle_navigation("hello", 5));
        assert!(!history.should_handle_navigation("hello", 2));
        assert!(!history.should_handle_navigation("edited", 0));
    }

    #[test]
    fn submission_resets_browsing() {
        let mut history = ChatComposerHistory::new();
        history.record_local_submission("one");
        assert_eq!(history.navigate_up().as_deref(), Some("one"));
        history.record_local_submission("two");
        assert!(history.history_cursor.is_none());
        assert_eq!(history.navigate_up().as_deref(), Some("two"));
    }
}
