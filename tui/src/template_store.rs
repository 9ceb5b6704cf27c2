//! Prompt template cache with user-defined presentation order.
//!
//! Templates come from the backend; pinning and recency come from local
//! preferences. The derived order is: pinned before unpinned, recently used
//! before never used within each tier, then name. Both template surfaces (the
//! insert menu and the slash popup) consume the same ordering so a template
//! never jumps between positions depending on where it was opened from.

use std::cmp::Ordering;
use std::sync::Arc;

use palaver_backend_client::Backend;
use palaver_protocol::PromptTemplate;

use crate::prefs::PrefsStore;
use crate::prefs::read_id_list;
use crate::prefs::write_id_list;

/// Recency list cap. Entries beyond this fall off the end.
pub const MAX_RECENT_TEMPLATES: usize = 12;

const PINNED_KEY: &str = "pinned_prompts";
const RECENTS_KEY: &str = "recent_prompts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatesLoadState {
    NotLoaded,
    Loaded,
    /// Load failed; the menus show this message with a retry affordance.
    Failed(String),
}

pub struct TemplateStore {
    prefs: Arc<dyn PrefsStore>,
    templates: Vec<PromptTemplate>,
    /// Pinned template ids, insertion order (order is irrelevant for sorting).
    pinned: Vec<String>,
    /// Most-recent-first, deduplicated, capped at [`MAX_RECENT_TEMPLATES`].
    recents: Vec<String>,
    load_state: TemplatesLoadState,
}

impl TemplateStore {
    pub fn new(prefs: Arc<dyn PrefsStore>) -> Self {
        let pinned = read_id_list(prefs.as_ref(), PINNED_KEY);
        let recents = read_id_list(prefs.as_ref(), RECENTS_KEY);
        Self {
            prefs,
            templates: Vec::new(),
            pinned,
            recents,
            load_state: TemplatesLoadState::NotLoaded,
        }
    }

    /// Fetch templates from the backend, replacing the cache on success.
    ///
    /// A failure leaves the previous cache in place and records the error for
    /// inline display; callers retry by calling this again.
    pub async fn refresh(&mut self, backend: &dyn Backend) {
        match backend.list_prompt_templates().await {
            Ok(mut templates) => {
                templates.retain(|t| t.enabled);
                self.templates = templates;
                self.load_state = TemplatesLoadState::Loaded;
            }
            Err(err) => {
                tracing::warn!("failed to load prompt templates: {err}");
                self.load_state = TemplatesLoadState::Failed(err.to_string());
            }
        }
    }

    pub fn load_state(&self) -> &TemplatesLoadState {
        &self.load_state
    }

    /// Replace the cache directly (used when the app layer owns the fetch).
    /// Disabled templates are dropped here as on [`Self::refresh`].
    pub fn set_templates(&mut self, mut templates: Vec<PromptTemplate>) {
        templates.retain(|t| t.enabled);
        self.templates = templates;
        self.load_state = TemplatesLoadState::Loaded;
    }

    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.iter().any(|p| p == id)
    }

    pub fn toggle_pinned(&mut self, id: &str) {
        match self.pinned.iter().position(|p| p == id) {
            Some(idx) => {
                self.pinned.remove(idx);
            }
            None => self.pinned.push(id.to_string()),
        }
        write_id_list(self.prefs.as_ref(), PINNED_KEY, &self.pinned);
    }

    /// Record a template insertion: move its id to the front of the recency
    /// list, deduplicated and capped.
    pub fn mark_used(&mut self, id: &str) {
        self.recents.retain(|r| r != id);
        self.recents.insert(0, id.to_string());
        self.recents.truncate(MAX_RECENT_TEMPLATES);
        write_id_list(self.prefs.as_ref(), RECENTS_KEY, &self.recents);
    }

    /// Templates matching `filter`, in presentation order.
    ///
    /// The filter is a case-insensitive substring match against name,
    /// description, and content; an empty filter matches everything.
    pub fn query(&self, filter: &str) -> Vec<PromptTemplate> {
        let needle = filter.to_lowercase();
        let mut matches: Vec<&PromptTemplate> = self
            .templates
            .iter()
            .filter(|t| needle.is_empty() || matches_filter(t, &needle))
            .collect();
        matches.sort_by(|a, b| self.compare(a, b));
        matches.into_iter().cloned().collect()
    }

    fn recency_rank(&self, id: &str) -> usize {
        self.recents
            .iter()
            .position(|r| r == id)
            .unwrap_or(usize::MAX)
    }

    fn compare(&self, a: &PromptTemplate, b: &PromptTemplate) -> Ordering {
        let pinned = self.is_pinned(&b.id).cmp(&self.is_pinned(&a.id));
        pinned
            .then_with(|| self.recency_rank(&a.id).cmp(&self.recency_rank(&b.id)))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    }
}

fn matches_filter(template: &PromptTemplate, needle: &str) -> bool {
    template.name.to_lowercase().contains(needle)
        || template
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
        || template.content.to_lowercase().contains(needle)
}
