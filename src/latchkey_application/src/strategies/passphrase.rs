use async_trait::async_trait;
use latchkey_core::{EngineContext, LoginState, LoginStateError, LoginStrategy, UiKind};
use secrecy::Secret;

/// Login with a passphrase supplied by the caller. With `store_secret` set
/// the derived secret is persisted for later [`StoredSecretLogin`]s.
///
/// [`StoredSecretLogin`]: crate::strategies::StoredSecretLogin
pub struct PassphraseLogin {
    username: String,
    passphrase: Secret<String>,
    store_secret: bool,
}

impl PassphraseLogin {
    pub fn new(username: impl Into<String>, passphrase: Secret<String>, store_secret: bool) -> Self {
        Self {
            username: username.into(),
            passphrase,
            store_secret,
        }
    }
}

#[async_trait]
impl LoginStrategy for PassphraseLogin {
    fn required_capabilities(&self) -> Vec<UiKind> {
        Vec::new()
    }

    async fn login(
        &self,
        login_state: &dyn LoginState,
        _ctx: &EngineContext,
    ) -> Result<(), LoginStateError> {
        tracing::debug!(
            username = %self.username,
            store_secret = self.store_secret,
            "login with passphrase"
        );
        login_state
            .login_with_passphrase(&self.username, &self.passphrase, self.store_secret)
            .await
    }
}
