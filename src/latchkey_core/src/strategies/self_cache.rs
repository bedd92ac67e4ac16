use async_trait::async_trait;

use crate::{
    domain::{identity::Identity, load_user_arg::LoadUserArg, uid::Uid},
    ports::{identity_loader::LoadUserError, login_state::LoginLifecycle},
};

/// Scoped access to the authenticated user's full identity record.
///
/// The record is only ever lent to the closure `f`; implementations may hold
/// an exclusive lock for the whole call, loader and closure included, so `f`
/// must not call back into the cache.
#[async_trait]
pub trait SelfCache: LoginLifecycle {
    /// Runs `f` against the authenticated user, loading it on a miss.
    async fn with_self<R, E, F>(&self, self_uid: &Uid, f: F) -> Result<R, E>
    where
        F: FnOnce(&Identity) -> Result<R, E> + Send,
        R: Send,
        E: From<LoadUserError> + Send;

    /// Runs `f` against any user. Only lookups that resolve to the cached
    /// self are served from the cache.
    async fn with_user<R, E, F>(&self, arg: LoadUserArg, f: F) -> Result<R, E>
    where
        F: FnOnce(&Identity) -> Result<R, E> + Send,
        R: Send,
        E: From<LoadUserError> + Send;
}
