//! Transient status messages with a single auto-dismiss timer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// How long success and error messages stay visible.
pub const DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    /// Stays visible until the next message replaces it
    Loading,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Loading => "loading",
        }
    }

    pub const fn auto_dismisses(self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// Region of the host UI that shows the current status message.
pub trait StatusDisplay: Send + Sync + 'static {
    /// Shows `message`, replacing whatever is displayed.
    fn render(&self, message: &str, severity: Severity);
    /// Hides the current message.
    fn clear(&self);
}

#[derive(Default)]
struct PendingDismissal {
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Shows status messages and owns the dismissal timer.
///
/// Dismissal timers run on the current tokio runtime. Outside a runtime
/// messages are still rendered but stay until replaced.
pub struct StatusReporter<D> {
    display: Arc<D>,
    pending: Arc<Mutex<PendingDismissal>>,
    dismiss_after: Duration,
}

impl<D> Clone for StatusReporter<D> {
    fn clone(&self) -> Self {
        Self {
            display: Arc::clone(&self.display),
            pending: Arc::clone(&self.pending),
            dismiss_after: self.dismiss_after,
        }
    }
}

impl<D: StatusDisplay> StatusReporter<D> {
    pub fn new(display: Arc<D>) -> Self {
        Self::with_dismiss_after(display, DISMISS_AFTER)
    }

    pub fn with_dismiss_after(display: Arc<D>, dismiss_after: Duration) -> Self {
        Self {
            display,
            pending: Arc::new(Mutex::new(PendingDismissal::default())),
            dismiss_after,
        }
    }

    /// Renders `message` now and schedules its dismissal unless it is a
    /// loading message. Any previously scheduled dismissal is cancelled.
    pub fn show(&self, message: &str, severity: Severity) {
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        pending.generation = pending.generation.wrapping_add(1);
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }

        tracing::debug!(severity = severity.as_str(), "Status: {}", message);
        self.display.render(message, severity);

        if !severity.auto_dismisses() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No tokio runtime, status message will not auto-dismiss");
            return;
        };

        let generation = pending.generation;
        let display = Arc::clone(&self.display);
        let state = Arc::clone(&self.pending);
        let delay = self.dismiss_after;
        pending.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut pending = match state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            // A newer message may have landed while this timer was waking up.
            if pending.generation == generation {
                pending.timer = None;
                display.clear();
            }
        }));
    }

    pub fn success(&self, message: &str) {
        self.show(message, Severity::Success);
    }

    pub fn error(&self, message: &str) {
        self.show(message, Severity::Error);
    }

    pub fn loading(&self, message: &str) {
        self.show(message, Severity::Loading);
    }
}
