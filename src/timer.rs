use crate::models::AppEvent;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// A one-shot delayed event owned by a module runner. Dropping it cancels it.
#[derive(Debug, Default)]
pub struct AdvanceTimer {
    handle: Option<JoinHandle<()>>,
}

impl AdvanceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post `event` on `tx` after `delay`, replacing any pending one.
    /// Must be called from inside a tokio runtime.
    pub fn arm(&mut self, delay: Duration, tx: UnboundedSender<AppEvent>, event: AppEvent) {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for AdvanceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
