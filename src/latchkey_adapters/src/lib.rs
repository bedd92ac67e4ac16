pub mod checkup;
pub mod config;
pub mod persistence;
pub mod runtime;
pub mod telemetry;
pub mod ui;

pub use checkup::{DeviceCheckup, DeviceCheckupFactory};
pub use config::Settings;
pub use persistence::{HashMapIdentityLoader, InMemoryLoginState, Session};
pub use runtime::InMemoryRuntime;
pub use telemetry::init_tracing;
pub use ui::{ScriptedUi, TracingLogUi};
