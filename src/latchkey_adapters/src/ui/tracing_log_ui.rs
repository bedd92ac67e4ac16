use latchkey_core::LogUi;

/// Log UI that writes to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogUi;

impl LogUi for TracingLogUi {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "latchkey::ui", "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "latchkey::ui", "{message}");
    }
}
