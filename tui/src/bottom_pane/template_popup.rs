//! Slash-triggered template popup.
//!
//! Shown while the caret sits inside an in-progress `/query` token. The
//! match list reuses the store's presentation order, additionally filtered
//! by the token's query and truncated to [`MAX_POPUP_ROWS`]. Keyboard
//! handling is driven by the composer's own key handler; this type only
//! tracks the candidate list and selection.

use palaver_protocol::PromptTemplate;

use super::scroll_state::ScrollState;
use super::slash_command::SlashCommandMatch;
use crate::template_store::TemplateStore;

/// At most this many rows are offered in the slash popup.
pub(crate) const MAX_POPUP_ROWS: usize = 8;

pub(crate) struct TemplatePopup {
    token: SlashCommandMatch,
    matches: Vec<PromptTemplate>,
    state: ScrollState,
}

impl TemplatePopup {
    pub fn new(store: &TemplateStore, token: SlashCommandMatch) -> Self {
        let mut popup = Self {
            token,
            matches: Vec::new(),
            state: ScrollState::new(),
        };
        popup.refresh(store);
        popup
    }

    /// The token this popup is anchored to; acceptance replaces its span.
    pub fn token(&self) -> &SlashCommandMatch {
        &self.token
    }

    /// Re-filter after the token changed under the caret.
    pub fn on_token_change(&mut self, store: &TemplateStore, token: SlashCommandMatch) {
        self.token = token;
        self.refresh(store);
    }

    fn refresh(&mut self, store: &TemplateStore) {
        let mut matches = store.query(&self.token.query);
        matches.truncate(MAX_POPUP_ROWS);
        self.matches = matches;
        let len = self.matches.len();
        self.state.clamp_selection(len);
        self.state.ensure_visible(len, MAX_POPUP_ROWS.min(len));
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn move_up(&mut self) {
        let len = self.matches.len();
        self.state.move_up(len);
        self.state.ensure_visible(len, MAX_POPUP_ROWS.min(len));
    }

    pub fn move_down(&mut self) {
        let len = self.matches.len();
        self.state.move_down(len);
        self.state.ensure_visible(len, MAX_POPUP_ROWS.min(len));
    }

    pub fn selected(&self) -> Option<&PromptTemplate> {
        self.state.selected_idx.and_then(|idx| self.matches.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn store_with_templates(count: usize) -> TemplateStore {
        let mut store = TemplateStore::new(Arc::new(MemoryPrefs::new()));
        store.set_templates(
            (0..count)
                .map(|i| PromptTemplate {
                    id: format!("t{i}"),
                    name: format!("name{i:02}"),
                    description: None,
                    content: format!("body {i}"),
                    enabled: true,
                })
                .collect(),
        );
        store
    }

    fn token(query: &str) -> SlashCommandMatch {
        SlashCommandMatch {
            query: query.to_string(),
            start: 0,
            end: query.len() + 1,
        }
    }

    #[test]
    fn empty_query_lists_at_most_eight_rows() {
        let store = store_with_templates(20);
        let popup = TemplatePopup::new(&store, token(""));
        assert_eq!(popup.matches.len(), MAX_POPUP_ROWS);
        assert_eq!(popup.selected().map(|t| t.name.as_str()), Some("name00"));
    }

    #[test]
    fn narrowing_the_query_clamps_the_selection() {
        let store = store_with_templates(12);
        let mut popup = TemplatePopup::new(&store, token(""));
        for _ in 0..7 {
            popup.move_down();
        }
        assert_eq!(popup.state.selected_idx, Some(7));

        // "name1" matches name10 and name11 only.
        popup.on_token_change(&store, token("name1"));
        assert_eq!(popup.matches.len(), 2);
        assert_eq!(popup.state.selected_idx, Some(1));
    }

    #[test]
    fn no_matches_leaves_no_selection() {
        let store = store_with_templates(3);
        let popup = TemplatePopup::new(&store, token("zzz"));
        assert!(!popup.has_matches());
        assert_eq!(popup.selected(), None);
    }

    #[test]
    fn navigation_stops_at_the_ends() {
        let store = store_with_templates(3);
        let mut popup = TemplatePopup::new(&store, token(""));
        popup.move_up();
        assert_eq!(popup.state.selected_idx, Some(0));
        for _ in 0..10 {
            popup.move_down();
        }
        assert_eq!(popup.state.selected_idx, Some(2));
    }
}
