use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

use crate::{
    domain::{capability::UiKind, uid::Uid},
    ports::ui::{LoginUi, SecretUi, UiError},
};

#[derive(Debug, Error)]
pub enum LoginStateError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),
    #[error("Bad passphrase")]
    BadPassphrase,
    #[error("No stored secret for {0}")]
    NoStoredSecret(String),
    #[error("Missing capability: {0}")]
    MissingCapability(UiKind),
    #[error("No active session")]
    NotLoggedIn,
    #[error("{0}")]
    UiError(#[from] UiError),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for LoginStateError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownUser(a), Self::UnknownUser(b)) => a == b,
            (Self::BadPassphrase, Self::BadPassphrase) => true,
            (Self::NoStoredSecret(a), Self::NoStoredSecret(b)) => a == b,
            (Self::MissingCapability(a), Self::MissingCapability(b)) => a == b,
            (Self::NotLoggedIn, Self::NotLoggedIn) => true,
            (Self::UiError(a), Self::UiError(b)) => a == b,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// The process-wide authentication state container.
///
/// Implementations serialize login and logout transitions. Nothing reachable
/// from inside one of these calls may call back into the container.
#[async_trait]
pub trait LoginState: Send + Sync {
    async fn login_with_prompt(
        &self,
        username: &str,
        login_ui: &dyn LoginUi,
        secret_ui: &dyn SecretUi,
    ) -> Result<(), LoginStateError>;

    async fn login_with_stored_secret(&self, username: &str) -> Result<(), LoginStateError>;

    async fn login_with_passphrase(
        &self,
        username: &str,
        passphrase: &Secret<String>,
        store_secret: bool,
    ) -> Result<(), LoginStateError>;

    async fn logout(&self) -> Result<(), LoginStateError>;

    /// The uid of the currently authenticated user, if any.
    async fn logged_in_uid(&self) -> Option<Uid>;
}

/// Receiver of authentication lifecycle events.
#[async_trait]
pub trait LoginLifecycle: Send + Sync {
    /// The identity record for `uid` changed upstream.
    async fn on_identity_changed(&self, uid: &Uid);

    async fn on_logout(&self);

    /// `uid` is the newly authenticated user.
    async fn on_login(&self, uid: &Uid);
}
