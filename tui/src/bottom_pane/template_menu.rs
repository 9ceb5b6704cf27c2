//! General "insert template" menu.
//!
//! Unlike the slash popup this surface owns a live search box: printable
//! keys edit the query, the full (untruncated) match list re-sorts under the
//! store's presentation order, and Enter inserts the highlighted template at
//! the caret. The selection is clamped on every list-size change.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use palaver_protocol::PromptTemplate;

use super::scroll_state::ScrollState;
use crate::template_store::TemplateStore;

/// Rows visible at once; the selection scrolls within this window.
const MENU_VISIBLE_ROWS: usize = 10;

#[derive(Debug, PartialEq)]
pub(crate) enum MenuOutcome {
    /// Key consumed; menu stays open.
    Handled,
    /// Insert this template at the caret and close.
    Insert(PromptTemplate),
    /// Close without inserting.
    Dismiss,
}

pub(crate) struct TemplateMenu {
    search: String,
    matches: Vec<PromptTemplate>,
    state: ScrollState,
}

impl TemplateMenu {
    pub fn new(store: &TemplateStore) -> Self {
        let mut menu = Self {
            search: String::new(),
            matches: Vec::new(),
            state: ScrollState::new(),
        };
        menu.refresh(store);
        menu
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn matches(&self) -> &[PromptTemplate] {
        &self.matches
    }

    /// Recompute matches for the current search; call after the store's
    /// templates, pins, or recents changed while the menu is open.
    pub fn refresh(&mut self, store: &TemplateStore) {
        self.matches = store.query(&self.search);
        let len = self.matches.len();
        self.state.clamp_selection(len);
        self.state.ensure_visible(len, MENU_VISIBLE_ROWS.min(len));
    }

    pub fn selected(&self) -> Option<&PromptTemplate> {
        self.state.selected_idx.and_then(|idx| self.matches.get(idx))
    }

    pub fn handle_key_event(&mut self, store: &TemplateStore, key_event: KeyEvent) -> MenuOutcome {
        if key_event.kind == KeyEventKind::Release {
            return MenuOutcome::Handled;
        }
        match key_event.code {
            KeyCode::Up => {
                let len = self.matches.len();
                self.state.move_up(len);
                self.state.ensure_visible(len, MENU_VISIBLE_ROWS.min(len));
                MenuOutcome::Handled
            }
            KeyCode::Down => {
                let len = self.matches.len();
                self.state.move_down(len);
                self.state.ensure_visible(len, MENU_VISIBLE_ROWS.min(len));
                MenuOutcome::Handled
            }
            KeyCode::Esc => MenuOutcome::Dismiss,
            KeyCode::Enter => match self.selected() {
                Some(template) => MenuOutcome::Insert(template.clone()),
                None => MenuOutcome::Handled,
            },
            KeyCode::Backspace => {
                self.search.pop();
                self.refresh(store);
                MenuOutcome::Handled
            }
            KeyCode::Char(c)
                if !key_event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.search.push(c);
                self.refresh(store);
                MenuOutcome::Handled
            }
            _ => MenuOutcome::Handled,
        }
    }
}
