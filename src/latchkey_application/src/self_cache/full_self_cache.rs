use std::sync::Arc;

use async_trait::async_trait;
use latchkey_core::{
    Identity, IdentityLoader, IdentityProjectionCache, LoadUserArg, LoadUserError, LoginLifecycle,
    SelfCache, Uid,
};
use rand::{Rng, distr::Alphanumeric};
use tokio::sync::Mutex;

/// Caches the full identity record of the authenticated ("self") user.
///
/// The record is never handed out. Every lookup holds the cache lock for its
/// whole duration, loader call and caller closure included, and the closure
/// only ever sees a borrow that ends when the lock is released.
///
/// The authenticated uid is never fetched from the login-state container
/// here. Callers pass it in ([`LoadUserArg::self_uid`], [`SelfCache::with_self`],
/// [`LoginLifecycle::on_login`]) because lookups can be triggered from inside
/// the container's own critical section.
pub struct FullSelfCache<L> {
    loader: L,
    projection: Option<Arc<dyn IdentityProjectionCache>>,
    me: Mutex<Option<Identity>>,
}

impl<L> FullSelfCache<L>
where
    L: IdentityLoader,
{
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            projection: None,
            me: Mutex::new(None),
        }
    }

    /// Cache hits are forwarded to `projection` so it sees the fresh record.
    pub fn with_projection(mut self, projection: Arc<dyn IdentityProjectionCache>) -> Self {
        self.projection = Some(projection);
        self
    }

    /// The uid of the cached record, if any.
    pub async fn cached_uid(&self) -> Option<Uid> {
        self.me.lock().await.as_ref().map(|me| *me.uid())
    }

    fn is_self_load(arg: &LoadUserArg, me: &Identity) -> bool {
        if arg.self_load {
            return true;
        }
        if arg
            .normalized_name()
            .is_some_and(|name| &name == me.username())
        {
            return true;
        }
        arg.uid.as_ref().is_some_and(|uid| uid == me.uid())
    }

    #[tracing::instrument(
        name = "FullSelfCache::with_user",
        skip(self, f),
        fields(trace_id = %trace_id())
    )]
    async fn lookup<R, E, F>(&self, arg: LoadUserArg, f: F) -> Result<R, E>
    where
        F: FnOnce(&Identity) -> Result<R, E>,
        E: From<LoadUserError>,
    {
        tracing::debug!("+ with_user");
        let mut me = self.me.lock().await;

        let result = if let Some(cached) = me
            .as_ref()
            .filter(|cached| !arg.force_reload && Self::is_self_load(&arg, cached))
        {
            tracing::debug!(uid = %cached.uid(), "cache hit");
            if let Some(projection) = &self.projection {
                projection.put_identity(cached);
            }
            f(cached)
        } else {
            let user = self.loader.load(&arg).await?;
            if arg.self_load || arg.self_uid.as_ref() == Some(user.uid()) {
                tracing::debug!(uid = %user.uid(), "cache populate");
                f(me.insert(user))
            } else {
                tracing::debug!(uid = %user.uid(), "other user");
                f(&user)
            }
        };

        tracing::debug!("- with_user");
        result
    }
}

#[async_trait]
impl<L> SelfCache for FullSelfCache<L>
where
    L: IdentityLoader,
{
    async fn with_self<R, E, F>(&self, self_uid: &Uid, f: F) -> Result<R, E>
    where
        F: FnOnce(&Identity) -> Result<R, E> + Send,
        R: Send,
        E: From<LoadUserError> + Send,
    {
        let arg = LoadUserArg::me(*self_uid).public_key_optional();
        self.lookup(arg, f).await
    }

    async fn with_user<R, E, F>(&self, arg: LoadUserArg, f: F) -> Result<R, E>
    where
        F: FnOnce(&Identity) -> Result<R, E> + Send,
        R: Send,
        E: From<LoadUserError> + Send,
    {
        self.lookup(arg, f).await
    }
}

#[async_trait]
impl<L> LoginLifecycle for FullSelfCache<L>
where
    L: IdentityLoader,
{
    async fn on_identity_changed(&self, uid: &Uid) {
        let mut me = self.me.lock().await;
        if me.as_ref().is_some_and(|cached| cached.uid() == uid) {
            tracing::debug!(%uid, "invalidating cached self");
            *me = None;
        }
    }

    async fn on_logout(&self) {
        *self.me.lock().await = None;
    }

    async fn on_login(&self, uid: &Uid) {
        let mut me = self.me.lock().await;
        if me.as_ref().is_some_and(|cached| cached.uid() != uid) {
            tracing::debug!(%uid, "different user logged in, dropping cached self");
            *me = None;
        }
    }
}

fn trace_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect()
}
