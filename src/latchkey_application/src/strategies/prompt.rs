use async_trait::async_trait;
use latchkey_core::{EngineContext, LoginState, LoginStateError, LoginStrategy, UiKind};

/// Interactive login: asks the login UI for a username (when none is given)
/// and the secret UI for the passphrase.
#[derive(Debug, Clone)]
pub struct PromptLogin {
    username: String,
}

impl PromptLogin {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

#[async_trait]
impl LoginStrategy for PromptLogin {
    fn required_capabilities(&self) -> Vec<UiKind> {
        vec![UiKind::LoginUi, UiKind::SecretUi, UiKind::LogUi]
    }

    async fn login(
        &self,
        login_state: &dyn LoginState,
        ctx: &EngineContext,
    ) -> Result<(), LoginStateError> {
        tracing::debug!(username = %self.username, "login with prompt");
        let login_ui = ctx
            .login_ui
            .as_deref()
            .ok_or(LoginStateError::MissingCapability(UiKind::LoginUi))?;
        let secret_ui = ctx
            .secret_ui
            .as_deref()
            .ok_or(LoginStateError::MissingCapability(UiKind::SecretUi))?;

        login_state
            .login_with_prompt(&self.username, login_ui, secret_ui)
            .await
    }
}
