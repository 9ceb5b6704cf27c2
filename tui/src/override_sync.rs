//! Debounced synchronization of the local override draft.
//!
//! Field edits land in the draft synchronously so the panel tracks the user
//! with no latency, while the save callback is debounced: rapid successive
//! edits (a slider drag) coalesce into a single save carrying the draft as it
//! stands when the quiet period elapses. Discrete actions (clear one field,
//! clear all, set model, set max rounds) skip the debounce entirely.
//!
//! Externally pushed overrides (a session reload) normally replace the draft,
//! but are suppressed for a short window after a debounced save fires so a
//! slow round-trip cannot clobber a newer local edit with stale server state.
//! The window is a timing heuristic, not a sequence-numbered reconciliation:
//! a save that stays in flight past the window can still race an external
//! update. Known limitation.

use std::sync::Arc;
use std::sync::Mutex;

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio::time::Instant;

use palaver_protocol::OverrideField;
use palaver_protocol::ParamOverrides;

/// Quiet period before an edited draft is flushed to the save callback.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// How long externally pushed overrides are ignored after a debounced flush.
pub const PROP_SYNC_SUPPRESS_WINDOW: Duration = Duration::from_millis(200);

/// Caller-supplied persistence hook. The synchronizer hands it the merged
/// overrides and stays ignorant of the wire format.
pub type OverrideSaver = Arc<dyn Fn(ParamOverrides) + Send + Sync>;

pub struct OverrideDraftSynchronizer {
    state: Arc<Mutex<SyncState>>,
    on_change: OverrideSaver,
}

struct SyncState {
    draft: ParamOverrides,
    /// Bumped on every edit and immediate flush; a sleeping debounce task
    /// whose epoch no longer matches simply returns.
    epoch: u64,
    pending: Option<JoinHandle<()>>,
    suppress_props_until: Option<Instant>,
}

impl OverrideDraftSynchronizer {
    pub fn new(initial: ParamOverrides, on_change: OverrideSaver) -> Self {
        Self {
            state: Arc::new(Mutex::new(SyncState {
                draft: initial,
                epoch: 0,
                pending: None,
                suppress_props_until: None,
            })),
            on_change,
        }
    }

    /// Current draft (the optimistic local copy).
    pub fn draft(&self) -> ParamOverrides {
        #[expect(clippy::unwrap_used)]
        let st = self.state.lock().unwrap();
        st.draft.clone()
    }

    // ------------------------------------------------------------------
    // Debounced edits
    // ------------------------------------------------------------------

    pub fn set_temperature(&self, value: f64) {
        self.edit(|d| d.temperature = Some(value));
    }

    pub fn set_max_tokens(&self, value: u32) {
        self.edit(|d| d.max_tokens = Some(value));
    }

    pub fn set_top_p(&self, value: f64) {
        self.edit(|d| d.top_p = Some(value));
    }

    pub fn set_top_k(&self, value: u32) {
        self.edit(|d| d.top_k = Some(value));
    }

    pub fn set_frequency_penalty(&self, value: f64) {
        self.edit(|d| d.frequency_penalty = Some(value));
    }

    pub fn set_presence_penalty(&self, value: f64) {
        self.edit(|d| d.presence_penalty = Some(value));
    }

    /// Apply `mutate` to the draft now and (re)arm the debounce timer.
    fn edit<F: FnOnce(&mut ParamOverrides)>(&self, mutate: F) {
        #[expect(clippy::unwrap_used)]
        let mut st = self.state.lock().unwrap();
        mutate(&mut st.draft);
        st.epoch += 1;
        let epoch = st.epoch;
        if let Some(handle) = st.pending.take() {
            handle.abort();
        }
        let state = self.state.clone();
        let on_change = self.on_change.clone();
        st.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE_WINDOW).await;
            let payload = {
                #[expect(clippy::unwrap_used)]
                let mut st = state.lock().unwrap();
                if st.epoch != epoch {
                    return;
                }
                st.pending = None;
                st.suppress_props_until = Some(Instant::now() + PROP_SYNC_SUPPRESS_WINDOW);
                st.draft.clone()
            };
            on_change(payload);
        }));
    }

    // ------------------------------------------------------------------
    // Immediate flushes
    // ------------------------------------------------------------------

    pub fn set_model(&self, model_id: impl Into<String>) {
        let model_id = model_id.into();
        self.flush_now(|d| d.model_id = Some(model_id));
    }

    pub fn set_max_rounds(&self, rounds: i64) {
        self.flush_now(|d| d.max_rounds = Some(rounds));
    }

    pub fn clear_field(&self, field: OverrideField) {
        self.flush_now(|d| d.clear_field(field));
    }

    pub fn clear_all(&self) {
        self.flush_now(|d| *d = ParamOverrides::default());
    }

    /// Mutate the draft and flush synchronously, cancelling any pending
    /// debounced flush (its coalesced value rides along in this payload).
    fn flush_now<F: FnOnce(&mut ParamOverrides)>(&self, mutate: F) {
        let payload = {
            #[expect(clippy::unwrap_used)]
            let mut st = self.state.lock().unwrap();
            mutate(&mut st.draft);
            st.epoch += 1;
            if let Some(handle) = st.pending.take() {
                handle.abort();
            }
            st.draft.clone()
        };
        (self.on_change)(payload);
    }

    // ------------------------------------------------------------------
    // External updates
    // ------------------------------------------------------------------

    /// Accept overrides pushed from outside (e.g. a session reload), unless
    /// a debounced flush fired within the suppression window.
    pub fn sync_from_props(&self, external: ParamOverrides) {
        #[expect(clippy::unwrap_used)]
        let mut st = self.state.lock().unwrap();
        if st
            .suppress_props_until
            .is_some_and(|until| Instant::now() < until)
        {
            return;
        }
        st.draft = external;
    }
}

impl Drop for OverrideDraftSynchronizer {
    /// Timers die with the synchronizer; an already-fired save stays in
    /// flight (there is no cancellation for network calls in this layer).
    fn drop(&mut self) {
        #[expect(clippy::unwrap_used)]
        let mut st = self.state.lock().unwrap();
        if let Some(handle) = st.pending.take() {
            handle.abort();
        }
    }
}
