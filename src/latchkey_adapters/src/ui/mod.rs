pub mod scripted_ui;
pub mod tracing_log_ui;

pub use scripted_ui::ScriptedUi;
pub use tracing_log_ui::TracingLogUi;
