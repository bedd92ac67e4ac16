use std::sync::Arc;

use latchkey_application::{LoginDeps, LoginEngine, SelfCacheHandle};
use latchkey_core::{DeviceId, IdentityProjectionCache};
use secrecy::Secret;

use crate::{
    checkup::DeviceCheckupFactory,
    config::Settings,
    persistence::{HashMapIdentityLoader, InMemoryLoginState},
};

pub type RuntimeSelfCache = SelfCacheHandle<HashMapIdentityLoader>;

/// The in-process authentication context: one login-state container and
/// one self cache, wired together once and shared by every login.
pub struct InMemoryRuntime {
    settings: Settings,
    device_id: DeviceId,
    pub loader: HashMapIdentityLoader,
    pub login_state: Arc<InMemoryLoginState>,
    pub self_cache: Arc<RuntimeSelfCache>,
}

impl InMemoryRuntime {
    pub async fn new(settings: Settings, loader: HashMapIdentityLoader) -> Self {
        Self::with_projection(settings, loader, None).await
    }

    pub async fn with_projection(
        settings: Settings,
        loader: HashMapIdentityLoader,
        projection: Option<Arc<dyn IdentityProjectionCache>>,
    ) -> Self {
        let device_id = settings.device_id();
        let self_cache = Arc::new(SelfCacheHandle::new(
            settings.cache.enabled,
            loader.clone(),
            projection,
        ));
        let login_state = Arc::new(InMemoryLoginState::new());
        login_state.subscribe(self_cache.clone()).await;

        tracing::info!(
            %device_id,
            device_name = %settings.device.name,
            caching = self_cache.is_caching(),
            "authentication context ready"
        );

        Self {
            settings,
            device_id,
            loader,
            login_state,
            self_cache,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn login_deps(&self) -> LoginDeps<RuntimeSelfCache> {
        LoginDeps {
            login_state: self.login_state.clone(),
            self_cache: self.self_cache.clone(),
            checkup_factory: Arc::new(DeviceCheckupFactory::new(self.device_id)),
            session_marker: self.login_state.clone(),
            device_id: self.device_id,
        }
    }

    /// A passphrase login using the configured checkup and secret-storage
    /// policy.
    pub fn passphrase_login(
        &self,
        username: &str,
        passphrase: Secret<String>,
    ) -> LoginEngine<RuntimeSelfCache> {
        let mut engine = LoginEngine::with_passphrase(
            username,
            passphrase,
            self.settings.login.store_secret,
            self.login_deps(),
        );
        engine.set_skip_checkup(self.settings.login.skip_checkup);
        engine
    }

    pub fn stored_secret_login(&self, username: &str) -> LoginEngine<RuntimeSelfCache> {
        let mut engine = LoginEngine::with_stored_secret(username, self.login_deps());
        engine.set_skip_checkup(self.settings.login.skip_checkup);
        engine
    }

    pub fn prompt_login(&self, username: &str) -> LoginEngine<RuntimeSelfCache> {
        let mut engine = LoginEngine::with_prompt(username, self.login_deps());
        engine.set_skip_checkup(self.settings.login.skip_checkup);
        engine
    }
}
