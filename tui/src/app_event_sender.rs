use tokio::sync::mpsc::UnboundedSender;

use crate::app_event::AppEvent;

#[derive(Clone, Debug)]
pub struct AppEventSender {
    app_event_tx: UnboundedSender<AppEvent>,
}

impl AppEventSender {
    pub fn new(app_event_tx: UnboundedSender<AppEvent>) -> Self {
        Self { app_event_tx }
    }

    /// Send an event to the app event loop. The receiver only disappears
    /// during shutdown, at which point dropped events are harmless.
    pub fn send(&self, event: AppEvent) {
        if let Err(e) = self.app_event_tx.send(event) {
            tracing::error!("failed to send AppEvent: {e}");
        }
    }
}
