//! Indirection between producers of composer actions and the live composer.
//!
//! External surfaces (an editor pane, a context-menu handler) want to push
//! content into the message input without holding a reference to it, and may
//! fire before the composer exists at all. The bridge keeps an explicit FIFO
//! of pending operations plus a single current-handler reference: at most one
//! composer is registered at a time, actions issued while unregistered queue
//! and replay in original order on the next registration, and every action,
//! queued or immediate, resolves a completion signal with its success or the
//! underlying failure.
//!
//! Execution is strictly sequential. A registered composer is owned by a
//! worker task that drains one action at a time, so a slow action (an
//! attachment upload) delays later actions but never interleaves with them,
//! and a failing action settles its own completion without aborting the rest
//! of the queue.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

use crate::bottom_pane::ChatBlock;

#[derive(Debug, Clone, PartialEq)]
pub enum ComposerAction {
    /// Insert at the caret.
    InsertText(String),
    /// Append to the end of the input.
    AppendText(String),
    Focus,
    /// Attach `content` as an uploaded text file named `filename`.
    AttachTextFile { filename: String, content: String },
    AddBlock(ChatBlock),
}

/// The live message-input component, as the bridge sees it.
#[async_trait]
pub trait ComposerHandle: Send + 'static {
    async fn apply(&mut self, action: ComposerAction) -> anyhow::Result<()>;
}

/// Resolves once the action has run (or failed). Dropped receivers are fine;
/// completion is then fire-and-forget.
pub type Completion = oneshot::Receiver<anyhow::Result<()>>;

struct PendingAction {
    action: ComposerAction,
    done: oneshot::Sender<anyhow::Result<()>>,
}

#[derive(Default)]
pub struct ComposerBridge {
    inner: Mutex<BridgeInner>,
}

#[derive(Default)]
struct BridgeInner {
    /// Channel into the current composer's worker task, when one is live.
    live: Option<mpsc::UnboundedSender<PendingAction>>,
    /// Actions waiting for the next registration.
    queued: VecDeque<PendingAction>,
}

impl ComposerBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `composer` as the live instance, replaying any queued actions
    /// in order, or unregister with `None`.
    ///
    /// Unregistering drops the worker's channel; actions already handed to it
    /// still drain against the old composer, while later dispatches queue for
    /// the next registration.
    pub fn register(&self, composer: Option<Box<dyn ComposerHandle>>) {
        #[expect(clippy::unwrap_used)]
        let mut inner = self.inner.lock().unwrap();
        let Some(mut composer) = composer else {
            inner.live = None;
            return;
        };
        let (tx, mut rx) = mpsc::unbounded_channel::<PendingAction>();
        for pending in inner.queued.drain(..) {
            let _ = tx.send(pending);
        }
        inner.live = Some(tx);
        tokio::spawn(async move {
            while let Some(PendingAction { action, done }) = rx.recv().await {
                let result = composer.apply(action).await;
                let _ = done.send(result);
            }
        });
    }

    pub fn insert_text(&self, text: impl Into<String>) -> Completion {
        self.dispatch(ComposerAction::InsertText(text.into()))
    }

    pub fn append_text(&self, text: impl Into<String>) -> Completion {
        self.dispatch(ComposerAction::AppendText(text.into()))
    }

    pub fn focus(&self) -> Completion {
        self.dispatch(ComposerAction::Focus)
    }

    pub fn attach_text_file(
        &self,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> Completion {
        self.dispatch(ComposerAction::AttachTextFile {
            filename: filename.into(),
            content: content.into(),
        })
    }

    pub fn add_block(&self, block: ChatBlock) -> Completion {
        self.dispatch(ComposerAction::AddBlock(block))
    }

    fn dispatch(&self, action: ComposerAction) -> Completion {
        let (done_tx, done_rx) = oneshot::channel();
        let mut pending = PendingAction {
            action,
            done: done_tx,
        };
        #[expect(clippy::unwrap_used)]
        let mut inner = self.inner.lock().unwrap();
        if let Some(live) = &inner.live {
            match live.send(pending) {
                Ok(()) => return done_rx,
                // The worker died (runtime shutdown mid-flight); fall back to
                // queueing for the next registration.
                Err(mpsc::error::SendError(p)) => pending = p,
            }
        }
        inner.queued.push_back(pending);
        done_rx
    }
}
