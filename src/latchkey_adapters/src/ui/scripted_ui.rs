use async_trait::async_trait;
use latchkey_core::{LoginUi, SecretUi, UiError};
use secrecy::Secret;

/// Non-interactive login and secret UI answering with preset values.
/// An unset answer behaves like the user dismissing the prompt.
#[derive(Clone, Default)]
pub struct ScriptedUi {
    username: Option<String>,
    passphrase: Option<Secret<String>>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_passphrase(mut self, passphrase: Secret<String>) -> Self {
        self.passphrase = Some(passphrase);
        self
    }
}

#[async_trait]
impl LoginUi for ScriptedUi {
    async fn get_username(&self) -> Result<String, UiError> {
        self.username.clone().ok_or(UiError::Cancelled)
    }
}

#[async_trait]
impl SecretUi for ScriptedUi {
    async fn get_passphrase(&self, _username: &str) -> Result<Secret<String>, UiError> {
        self.passphrase.clone().ok_or(UiError::Cancelled)
    }
}
