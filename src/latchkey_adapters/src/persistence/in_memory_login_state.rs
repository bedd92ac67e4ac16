use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use latchkey_core::{
    DeviceId, LoginLifecycle, LoginState, LoginStateError, LoginUi, NormalizedUsername, SecretUi,
    SessionError, SessionMarker, Uid,
};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

struct Account {
    uid: Uid,
    passphrase: Secret<String>,
}

/// The active login session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub uid: Uid,
    pub username: NormalizedUsername,
    pub started_at: DateTime<Utc>,
    pub provisioned_device: Option<DeviceId>,
}

/// Login-state container backed by in-process maps.
///
/// Holds at most one session. Lifecycle observers are notified after the
/// session lock is released, so an observer may freely take its own locks.
#[derive(Default)]
pub struct InMemoryLoginState {
    accounts: RwLock<HashMap<NormalizedUsername, Account>>,
    stored_secrets: DashMap<NormalizedUsername, Secret<String>>,
    session: RwLock<Option<Session>>,
    observers: RwLock<Vec<Arc<dyn LoginLifecycle>>>,
}

impl InMemoryLoginState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_account(
        &self,
        username: &str,
        uid: Uid,
        passphrase: Secret<String>,
    ) -> Result<(), LoginStateError> {
        let username = parse_username(username)?;
        self.accounts
            .write()
            .await
            .insert(username, Account { uid, passphrase });
        Ok(())
    }

    pub async fn subscribe(&self, observer: Arc<dyn LoginLifecycle>) {
        self.observers.write().await.push(observer);
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub fn has_stored_secret(&self, username: &str) -> bool {
        parse_username(username).is_ok_and(|name| self.stored_secrets.contains_key(&name))
    }

    /// Tells every observer that the identity record for `uid` changed.
    #[tracing::instrument(name = "InMemoryLoginState::identity_changed", skip(self))]
    pub async fn identity_changed(&self, uid: &Uid) {
        for observer in self.observers().await {
            observer.on_identity_changed(uid).await;
        }
    }

    async fn observers(&self) -> Vec<Arc<dyn LoginLifecycle>> {
        self.observers.read().await.clone()
    }

    async fn establish(
        &self,
        username: &str,
        passphrase: &Secret<String>,
    ) -> Result<(), LoginStateError> {
        let username = parse_username(username)?;
        let uid = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .get(&username)
                .ok_or_else(|| LoginStateError::UnknownUser(username.to_string()))?;
            if account.passphrase.expose_secret() != passphrase.expose_secret() {
                return Err(LoginStateError::BadPassphrase);
            }
            account.uid
        };

        *self.session.write().await = Some(Session {
            uid,
            username: username.clone(),
            started_at: Utc::now(),
            provisioned_device: None,
        });
        tracing::info!(%uid, %username, "logged in");

        for observer in self.observers().await {
            observer.on_login(&uid).await;
        }
        Ok(())
    }
}

fn parse_username(raw: &str) -> Result<NormalizedUsername, LoginStateError> {
    NormalizedUsername::parse(raw).map_err(|_| LoginStateError::UnknownUser(raw.to_string()))
}

#[async_trait]
impl LoginState for InMemoryLoginState {
    async fn login_with_prompt(
        &self,
        username: &str,
        login_ui: &dyn LoginUi,
        secret_ui: &dyn SecretUi,
    ) -> Result<(), LoginStateError> {
        let username = if username.is_empty() {
            login_ui.get_username().await?
        } else {
            username.to_string()
        };
        let passphrase = secret_ui.get_passphrase(&username).await?;
        self.establish(&username, &passphrase).await
    }

    async fn login_with_stored_secret(&self, username: &str) -> Result<(), LoginStateError> {
        let name = parse_username(username)?;
        let secret = self
            .stored_secrets
            .get(&name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LoginStateError::NoStoredSecret(name.to_string()))?;
        self.establish(username, &secret).await
    }

    async fn login_with_passphrase(
        &self,
        username: &str,
        passphrase: &Secret<String>,
        store_secret: bool,
    ) -> Result<(), LoginStateError> {
        self.establish(username, passphrase).await?;
        if store_secret {
            let name = parse_username(username)?;
            self.stored_secrets.insert(name, passphrase.clone());
        }
        Ok(())
    }

    async fn logout(&self) -> Result<(), LoginStateError> {
        if let Some(session) = self.session.write().await.take() {
            tracing::info!(uid = %session.uid, "logged out");
        }
        for observer in self.observers().await {
            observer.on_logout().await;
        }
        Ok(())
    }

    async fn logged_in_uid(&self) -> Option<Uid> {
        self.session.read().await.as_ref().map(|s| s.uid)
    }
}

#[async_trait]
impl SessionMarker for InMemoryLoginState {
    async fn mark_provisioned(&self, device_id: &DeviceId) -> Result<(), SessionError> {
        let mut session = self.session.write().await;
        let session = session.as_mut().ok_or(SessionError::NoActiveSession)?;
        session.provisioned_device = Some(*device_id);
        Ok(())
    }
}
