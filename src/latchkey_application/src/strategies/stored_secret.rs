use async_trait::async_trait;
use latchkey_core::{EngineContext, LoginState, LoginStateError, LoginStrategy, UiKind};

/// Login with the secret persisted by an earlier passphrase login.
#[derive(Debug, Clone)]
pub struct StoredSecretLogin {
    username: String,
}

impl StoredSecretLogin {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

#[async_trait]
impl LoginStrategy for StoredSecretLogin {
    fn required_capabilities(&self) -> Vec<UiKind> {
        Vec::new()
    }

    async fn login(
        &self,
        login_state: &dyn LoginState,
        _ctx: &EngineContext,
    ) -> Result<(), LoginStateError> {
        login_state.login_with_stored_secret(&self.username).await
    }
}
