use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::capability::{EnginePrereqs, UiKind},
    ports::ui::{LogUi, LoginUi, SecretUi},
};

// ============================================================================
// Engine Context
// ============================================================================

/// The interactive collaborators available to an engine run.
///
/// Every slot is optional; an engine declares what it needs through
/// [`Engine::required_capabilities`] and callers can check with
/// [`EngineContext::missing`] before running it.
#[derive(Clone, Default)]
pub struct EngineContext {
    pub login_ui: Option<Arc<dyn LoginUi>>,
    pub secret_ui: Option<Arc<dyn SecretUi>>,
    pub log_ui: Option<Arc<dyn LogUi>>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_login_ui(mut self, ui: Arc<dyn LoginUi>) -> Self {
        self.login_ui = Some(ui);
        self
    }

    pub fn with_secret_ui(mut self, ui: Arc<dyn SecretUi>) -> Self {
        self.secret_ui = Some(ui);
        self
    }

    pub fn with_log_ui(mut self, ui: Arc<dyn LogUi>) -> Self {
        self.log_ui = Some(ui);
        self
    }

    pub fn has(&self, kind: UiKind) -> bool {
        match kind {
            UiKind::LoginUi => self.login_ui.is_some(),
            UiKind::SecretUi => self.secret_ui.is_some(),
            UiKind::LogUi => self.log_ui.is_some(),
        }
    }

    /// The first required capability this context cannot provide.
    pub fn missing(&self, required: &[UiKind]) -> Option<UiKind> {
        required.iter().copied().find(|kind| !self.has(*kind))
    }

    /// Forwards a debug line to the log UI, if there is one.
    pub fn debug(&self, message: &str) {
        if let Some(log_ui) = &self.log_ui {
            log_ui.debug(message);
        }
    }

    pub fn info(&self, message: &str) {
        if let Some(log_ui) = &self.log_ui {
            log_ui.info(message);
        }
    }
}

// ============================================================================
// Engine Trait
// ============================================================================

/// A multi-step operation run on behalf of a caller-supplied context.
///
/// `cancel` may be called from any task, any number of times, before, during
/// or after `run`.
#[async_trait]
pub trait Engine: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn name(&self) -> &'static str;

    fn prereqs(&self) -> EnginePrereqs;

    fn required_capabilities(&self) -> Vec<UiKind>;

    /// Names of the engines this one drives internally.
    fn sub_consumers(&self) -> Vec<&'static str>;

    async fn run(&self, ctx: &EngineContext) -> Result<(), Self::Error>;

    async fn cancel(&self) -> Result<(), Self::Error>;
}
