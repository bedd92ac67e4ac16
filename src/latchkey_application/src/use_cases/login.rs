use std::sync::Arc;

use async_trait::async_trait;
use latchkey_core::{
    CheckupError, CheckupFactory, CheckupTask, DeviceId, Engine, EngineContext, EnginePrereqs,
    Identity, LoadUserArg, LoadUserError, LoginState, LoginStateError, LoginStrategy, SelfCache,
    SessionError, SessionMarker, UiKind,
};
use secrecy::Secret;
use tokio::sync::{Mutex, watch};

use crate::strategies::{PassphraseLogin, PromptLogin, StoredSecretLogin};

/// Where a login run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPhase {
    Idle,
    Authenticating,
    IdentityLoaded,
    CheckupSkipped,
    CheckingUp,
    Done,
    Failed,
    Cancelled,
}

/// Error types specific to the login engine
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Missing capability: {0}")]
    MissingCapability(UiKind),
    #[error("Authentication failed: {0}")]
    LoginStateError(#[from] LoginStateError),
    #[error("Login succeeded but no user is logged in")]
    NotLoggedIn,
    #[error("Failed to load self: {0}")]
    LoadUserError(#[from] LoadUserError),
    #[error("Checkup failed: {0}")]
    CheckupError(CheckupError),
    #[error("Checkup cancelled")]
    CheckupCancelled,
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

impl From<CheckupError> for LoginError {
    fn from(value: CheckupError) -> Self {
        match value {
            CheckupError::Cancelled => Self::CheckupCancelled,
            other => Self::CheckupError(other),
        }
    }
}

/// Collaborators shared by every login engine of a process.
pub struct LoginDeps<C> {
    pub login_state: Arc<dyn LoginState>,
    pub self_cache: Arc<C>,
    pub checkup_factory: Arc<dyn CheckupFactory>,
    pub session_marker: Arc<dyn SessionMarker>,
    pub device_id: DeviceId,
}

impl<C> Clone for LoginDeps<C> {
    fn clone(&self) -> Self {
        Self {
            login_state: self.login_state.clone(),
            self_cache: self.self_cache.clone(),
            checkup_factory: self.checkup_factory.clone(),
            session_marker: self.session_marker.clone(),
            device_id: self.device_id,
        }
    }
}

/// Login engine - authenticates, loads self, then runs the device checkup
///
/// The flow is: strategy -> forced self load -> checkup -> mark the session
/// provisioned. Only the checkup is cancellable; [`Engine::cancel`] is safe
/// to call from any task at any time.
pub struct LoginEngine<C> {
    strategy: Box<dyn LoginStrategy>,
    deps: LoginDeps<C>,
    skip_checkup: bool,
    user: Mutex<Option<Identity>>,
    checkup: Mutex<Option<Arc<dyn CheckupTask>>>,
    phase: watch::Sender<LoginPhase>,
}

impl<C> LoginEngine<C>
where
    C: SelfCache,
{
    pub fn new(strategy: Box<dyn LoginStrategy>, deps: LoginDeps<C>) -> Self {
        Self {
            strategy,
            deps,
            skip_checkup: false,
            user: Mutex::new(None),
            checkup: Mutex::new(None),
            phase: watch::Sender::new(LoginPhase::Idle),
        }
    }

    pub fn with_prompt(username: impl Into<String>, deps: LoginDeps<C>) -> Self {
        Self::new(Box::new(PromptLogin::new(username)), deps)
    }

    pub fn with_prompt_skip_checkup(username: impl Into<String>, deps: LoginDeps<C>) -> Self {
        let mut engine = Self::with_prompt(username, deps);
        engine.set_skip_checkup(true);
        engine
    }

    pub fn with_stored_secret(username: impl Into<String>, deps: LoginDeps<C>) -> Self {
        Self::new(Box::new(StoredSecretLogin::new(username)), deps)
    }

    pub fn with_passphrase(
        username: impl Into<String>,
        passphrase: Secret<String>,
        store_secret: bool,
        deps: LoginDeps<C>,
    ) -> Self {
        Self::new(
            Box::new(PassphraseLogin::new(username, passphrase, store_secret)),
            deps,
        )
    }

    pub fn set_skip_checkup(&mut self, skip: bool) {
        self.skip_checkup = skip;
    }

    pub fn phase(&self) -> LoginPhase {
        *self.phase.borrow()
    }

    /// Watch phase transitions, e.g. to cancel once the checkup starts.
    pub fn subscribe(&self) -> watch::Receiver<LoginPhase> {
        self.phase.subscribe()
    }

    /// The self loaded during `run`. `None` before `run` finishes loading,
    /// or when the login continued without a key.
    pub async fn loaded_user(&self) -> Option<Identity> {
        self.user.lock().await.clone()
    }

    fn enter(&self, phase: LoginPhase) {
        tracing::debug!(?phase, "login phase");
        self.phase.send_replace(phase);
    }

    async fn load_self(&self) -> Result<Option<Identity>, LoginError> {
        // Not inside the container's critical section here, so asking it is safe.
        let uid = self
            .deps
            .login_state
            .logged_in_uid()
            .await
            .ok_or(LoginError::NotLoggedIn)?;

        let arg = LoadUserArg::me(uid).force_reload();
        let loaded = self
            .deps
            .self_cache
            .with_user(arg, |u| Ok::<_, LoadUserError>(u.clone()))
            .await;

        match loaded {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_no_key() => {
                tracing::warn!(%uid, "no key for self, continuing without a loaded user");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn run_phases(&self, ctx: &EngineContext) -> Result<(), LoginError> {
        if let Some(kind) = ctx.missing(&self.strategy.required_capabilities()) {
            return Err(LoginError::MissingCapability(kind));
        }

        self.enter(LoginPhase::Authenticating);
        self.strategy
            .login(self.deps.login_state.as_ref(), ctx)
            .await?;

        let user = self.load_self().await?;
        *self.user.lock().await = user.clone();
        self.enter(LoginPhase::IdentityLoaded);

        if self.skip_checkup {
            ctx.debug("skipping checkup as requested");
            self.enter(LoginPhase::CheckupSkipped);
            return Ok(());
        }

        let checkup = self.deps.checkup_factory.create(user.as_ref());
        *self.checkup.lock().await = Some(checkup.clone());
        self.enter(LoginPhase::CheckingUp);

        checkup.login_checkup(ctx).await?;

        self.deps
            .session_marker
            .mark_provisioned(&self.deps.device_id)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<C> Engine for LoginEngine<C>
where
    C: SelfCache,
{
    type Error = LoginError;

    fn name(&self) -> &'static str {
        "Login"
    }

    fn prereqs(&self) -> EnginePrereqs {
        EnginePrereqs::default()
    }

    fn required_capabilities(&self) -> Vec<UiKind> {
        self.strategy.required_capabilities()
    }

    fn sub_consumers(&self) -> Vec<&'static str> {
        vec![self.deps.checkup_factory.name()]
    }

    async fn run(&self, ctx: &EngineContext) -> Result<(), LoginError> {
        let result = self.run_phases(ctx).await;
        match &result {
            Ok(()) => {
                tracing::info!(device_id = %self.deps.device_id, "login complete");
                self.enter(LoginPhase::Done);
            }
            Err(LoginError::CheckupCancelled) => {
                tracing::info!("login checkup cancelled");
                self.enter(LoginPhase::Cancelled);
            }
            Err(e) => {
                tracing::info!(error = %e, "login failed");
                self.enter(LoginPhase::Failed);
            }
        }
        result
    }

    async fn cancel(&self) -> Result<(), LoginError> {
        let checkup = self.checkup.lock().await;
        match checkup.as_ref() {
            Some(task) => Ok(task.cancel().await?),
            None => {
                tracing::debug!("LoginEngine cancel called but checkup has not started");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::self_cache::FullSelfCache;
    use latchkey_core::{IdentityLoader, LogUi, LoginUi, NormalizedUsername, SecretUi, Uid};
    use std::sync::{
        Mutex as StdMutex,
        atomic::{AtomicUsize, Ordering},
    };
    use tokio::sync::Notify;

    // Mock implementations for testing
    struct MockLoginState {
        uid: Uid,
        passphrase: String,
        logged_in: StdMutex<bool>,
    }

    #[async_trait]
    impl LoginState for MockLoginState {
        async fn login_with_prompt(
            &self,
            _username: &str,
            _login_ui: &dyn LoginUi,
            _secret_ui: &dyn SecretUi,
        ) -> Result<(), LoginStateError> {
            unimplemented!()
        }

        async fn login_with_stored_secret(&self, _username: &str) -> Result<(), LoginStateError> {
            *self.logged_in.lock().unwrap() = true;
            Ok(())
        }

        async fn login_with_passphrase(
            &self,
            _username: &str,
            passphrase: &Secret<String>,
            _store_secret: bool,
        ) -> Result<(), LoginStateError> {
            use secrecy::ExposeSecret;
            if passphrase.expose_secret() != &self.passphrase {
                return Err(LoginStateError::BadPassphrase);
            }
            *self.logged_in.lock().unwrap() = true;
            Ok(())
        }

        async fn logout(&self) -> Result<(), LoginStateError> {
            *self.logged_in.lock().unwrap() = false;
            Ok(())
        }

        async fn logged_in_uid(&self) -> Option<Uid> {
            self.logged_in.lock().unwrap().then_some(self.uid)
        }
    }

    #[derive(Clone)]
    struct MockLoader {
        result: Result<Identity, LoadUserError>,
        loads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IdentityLoader for MockLoader {
        async fn load(&self, arg: &LoadUserArg) -> Result<Identity, LoadUserError> {
            assert!(arg.force_reload);
            assert!(!arg.public_key_optional);
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[derive(Clone, Copy)]
    enum CheckupBehavior {
        Pass,
        Fail,
        BlockUntilCancelled,
    }

    struct MockCheckup {
        behavior: CheckupBehavior,
        cancelled: Notify,
        cancels: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CheckupTask for MockCheckup {
        async fn login_checkup(&self, _ctx: &EngineContext) -> Result<(), CheckupError> {
            match self.behavior {
                CheckupBehavior::Pass => Ok(()),
                CheckupBehavior::Fail => Err(CheckupError::Failed("keys out of sync".to_string())),
                CheckupBehavior::BlockUntilCancelled => {
                    self.cancelled.notified().await;
                    Err(CheckupError::Cancelled)
                }
            }
        }

        async fn cancel(&self) -> Result<(), CheckupError> {
            self.cancels.fetch_add(1, Ordering::SeqCst);
            self.cancelled.notify_one();
            Ok(())
        }
    }

    struct MockCheckupFactory {
        behavior: CheckupBehavior,
        created_for: StdMutex<Vec<Option<Uid>>>,
        cancels: Arc<AtomicUsize>,
    }

    impl MockCheckupFactory {
        fn new(behavior: CheckupBehavior) -> Self {
            Self {
                behavior,
                created_for: StdMutex::new(Vec::new()),
                cancels: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn created_for(&self) -> Vec<Option<Uid>> {
            self.created_for.lock().unwrap().clone()
        }
    }

    impl CheckupFactory for MockCheckupFactory {
        fn name(&self) -> &'static str {
            "MockCheckup"
        }

        fn create(&self, identity: Option<&Identity>) -> Arc<dyn CheckupTask> {
            self.created_for
                .lock()
                .unwrap()
                .push(identity.map(|u| *u.uid()));
            Arc::new(MockCheckup {
                behavior: self.behavior,
                cancelled: Notify::new(),
                cancels: self.cancels.clone(),
            })
        }
    }

    #[derive(Default)]
    struct MockSessionMarker {
        marked: StdMutex<Vec<DeviceId>>,
    }

    #[async_trait]
    impl SessionMarker for MockSessionMarker {
        async fn mark_provisioned(&self, device_id: &DeviceId) -> Result<(), SessionError> {
            self.marked.lock().unwrap().push(*device_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLog {
        lines: StdMutex<Vec<String>>,
    }

    impl LogUi for RecordingLog {
        fn debug(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }

        fn info(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }

    struct Fixture {
        alice: Identity,
        loads: Arc<AtomicUsize>,
        factory: Arc<MockCheckupFactory>,
        marker: Arc<MockSessionMarker>,
        cache: Arc<FullSelfCache<MockLoader>>,
        deps: LoginDeps<FullSelfCache<MockLoader>>,
    }

    fn fixture(
        load: impl FnOnce(&Identity) -> Result<Identity, LoadUserError>,
        behavior: CheckupBehavior,
    ) -> Fixture {
        let alice = Identity::new(Uid::new(), NormalizedUsername::parse("alice").unwrap());
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(FullSelfCache::new(MockLoader {
            result: load(&alice),
            loads: loads.clone(),
        }));
        let factory = Arc::new(MockCheckupFactory::new(behavior));
        let marker = Arc::new(MockSessionMarker::default());
        let deps = LoginDeps {
            login_state: Arc::new(MockLoginState {
                uid: *alice.uid(),
                passphrase: "hunter2".to_string(),
                logged_in: StdMutex::new(false),
            }),
            self_cache: cache.clone(),
            checkup_factory: factory.clone(),
            session_marker: marker.clone(),
            device_id: DeviceId::new(),
        };
        Fixture {
            alice,
            loads,
            factory,
            marker,
            cache,
            deps,
        }
    }

    fn passphrase(s: &str) -> Secret<String> {
        Secret::new(s.to_string())
    }

    #[tokio::test]
    async fn test_login_happy_path() {
        let fx = fixture(|u| Ok(u.clone()), CheckupBehavior::Pass);
        let engine =
            LoginEngine::with_passphrase("alice", passphrase("hunter2"), false, fx.deps.clone());

        engine.run(&EngineContext::new()).await.unwrap();

        assert_eq!(engine.loaded_user().await, Some(fx.alice.clone()));
        assert_eq!(fx.factory.created_for(), vec![Some(*fx.alice.uid())]);
        assert_eq!(
            *fx.marker.marked.lock().unwrap(),
            vec![fx.deps.device_id]
        );
        assert_eq!(fx.cache.cached_uid().await, Some(*fx.alice.uid()));
        assert_eq!(engine.phase(), LoginPhase::Done);
    }

    #[tokio::test]
    async fn test_login_skip_checkup_never_creates_checkup() {
        let fx = fixture(|u| Ok(u.clone()), CheckupBehavior::Pass);
        let mut engine = LoginEngine::with_stored_secret("alice", fx.deps.clone());
        engine.set_skip_checkup(true);
        let log = Arc::new(RecordingLog::default());

        engine
            .run(&EngineContext::new().with_log_ui(log.clone()))
            .await
            .unwrap();

        assert!(fx.factory.created_for().is_empty());
        assert!(fx.marker.marked.lock().unwrap().is_empty());
        assert_eq!(engine.loaded_user().await, Some(fx.alice.clone()));
        assert_eq!(
            *log.lines.lock().unwrap(),
            vec!["skipping checkup as requested".to_string()]
        );
        assert_eq!(engine.phase(), LoginPhase::Done);
    }

    #[tokio::test]
    async fn test_login_bad_passphrase_stops_before_load() {
        let fx = fixture(|u| Ok(u.clone()), CheckupBehavior::Pass);
        let engine =
            LoginEngine::with_passphrase("alice", passphrase("wrong"), false, fx.deps.clone());

        let result = engine.run(&EngineContext::new()).await;

        assert!(matches!(
            result,
            Err(LoginError::LoginStateError(LoginStateError::BadPassphrase))
        ));
        assert_eq!(fx.loads.load(Ordering::SeqCst), 0);
        assert!(fx.factory.created_for().is_empty());
        assert_eq!(engine.phase(), LoginPhase::Failed);
    }

    #[tokio::test]
    async fn test_login_load_failure_is_fatal() {
        let fx = fixture(
            |u| Err(LoadUserError::NotFound(u.username().to_string())),
            CheckupBehavior::Pass,
        );
        let engine = LoginEngine::with_stored_secret("alice", fx.deps.clone());

        let result = engine.run(&EngineContext::new()).await;

        assert!(matches!(
            result,
            Err(LoginError::LoadUserError(LoadUserError::NotFound(_)))
        ));
        assert!(fx.factory.created_for().is_empty());
    }

    #[tokio::test]
    async fn test_login_tolerates_missing_key() {
        let fx = fixture(
            |u| Err(LoadUserError::NoKey(u.username().to_string())),
            CheckupBehavior::Pass,
        );
        let engine = LoginEngine::with_stored_secret("alice", fx.deps.clone());

        engine.run(&EngineContext::new()).await.unwrap();

        assert_eq!(engine.loaded_user().await, None);
        assert_eq!(fx.factory.created_for(), vec![None]);
        assert_eq!(fx.marker.marked.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_checkup_failure_propagates() {
        let fx = fixture(|u| Ok(u.clone()), CheckupBehavior::Fail);
        let engine = LoginEngine::with_stored_secret("alice", fx.deps.clone());

        let result = engine.run(&EngineContext::new()).await;

        assert!(matches!(
            result,
            Err(LoginError::CheckupError(CheckupError::Failed(_)))
        ));
        assert!(fx.marker.marked.lock().unwrap().is_empty());
        assert_eq!(engine.phase(), LoginPhase::Failed);
    }

    #[tokio::test]
    async fn test_cancel_before_run_is_noop() {
        let fx = fixture(|u| Ok(u.clone()), CheckupBehavior::Pass);
        let engine = LoginEngine::with_stored_secret("alice", fx.deps.clone());

        engine.cancel().await.unwrap();
        engine.cancel().await.unwrap();
        engine.run(&EngineContext::new()).await.unwrap();

        assert_eq!(fx.factory.cancels.load(Ordering::SeqCst), 0);
        assert_eq!(engine.phase(), LoginPhase::Done);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_during_checkup_delegates_once() {
        let fx = fixture(|u| Ok(u.clone()), CheckupBehavior::BlockUntilCancelled);
        let engine = Arc::new(LoginEngine::with_stored_secret("alice", fx.deps.clone()));
        let mut phases = engine.subscribe();

        let runner = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.run(&EngineContext::new()).await })
        };

        phases
            .wait_for(|phase| *phase == LoginPhase::CheckingUp)
            .await
            .unwrap();
        engine.cancel().await.unwrap();

        let result = runner.await.unwrap();
        assert!(matches!(result, Err(LoginError::CheckupCancelled)));
        assert_eq!(fx.factory.cancels.load(Ordering::SeqCst), 1);
        assert!(fx.marker.marked.lock().unwrap().is_empty());
        assert_eq!(engine.phase(), LoginPhase::Cancelled);
    }

    #[tokio::test]
    async fn test_prompt_login_requires_ui_capabilities() {
        let fx = fixture(|u| Ok(u.clone()), CheckupBehavior::Pass);
        let engine = LoginEngine::with_prompt_skip_checkup("alice", fx.deps.clone());

        assert_eq!(
            engine.required_capabilities(),
            vec![UiKind::LoginUi, UiKind::SecretUi, UiKind::LogUi]
        );
        let result = engine.run(&EngineContext::new()).await;

        assert!(matches!(
            result,
            Err(LoginError::MissingCapability(UiKind::LoginUi))
        ));
        assert_eq!(fx.loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_engine_metadata() {
        let fx = fixture(|u| Ok(u.clone()), CheckupBehavior::Pass);
        let engine = LoginEngine::with_stored_secret("alice", fx.deps);

        assert_eq!(engine.name(), "Login");
        assert_eq!(engine.prereqs(), EnginePrereqs::default());
        assert!(engine.required_capabilities().is_empty());
        assert_eq!(engine.sub_consumers(), vec!["MockCheckup"]);
        assert_eq!(engine.phase(), LoginPhase::Idle);
    }
}
