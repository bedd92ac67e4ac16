use async_trait::async_trait;
use latchkey_core::{
    Identity, IdentityLoader, IdentityProjectionCache, LoadUserArg, LoadUserError, LoginLifecycle,
    SelfCache, Uid,
};
use std::sync::Arc;

use crate::self_cache::{FullSelfCache, NullFullSelfCache};

/// The self cache selected by configuration.
pub enum SelfCacheHandle<L> {
    Full(FullSelfCache<L>),
    Null(NullFullSelfCache<L>),
}

impl<L> SelfCacheHandle<L>
where
    L: IdentityLoader,
{
    pub fn new(
        enabled: bool,
        loader: L,
        projection: Option<Arc<dyn IdentityProjectionCache>>,
    ) -> Self {
        if !enabled {
            tracing::info!("self cache disabled, every lookup goes to the loader");
            return Self::Null(NullFullSelfCache::new(loader));
        }
        let cache = FullSelfCache::new(loader);
        match projection {
            Some(projection) => Self::Full(cache.with_projection(projection)),
            None => Self::Full(cache),
        }
    }

    pub fn is_caching(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

#[async_trait]
impl<L> SelfCache for SelfCacheHandle<L>
where
    L: IdentityLoader,
{
    async fn with_self<R, E, F>(&self, self_uid: &Uid, f: F) -> Result<R, E>
    where
        F: FnOnce(&Identity) -> Result<R, E> + Send,
        R: Send,
        E: From<LoadUserError> + Send,
    {
        match self {
            Self::Full(cache) => cache.with_self(self_uid, f).await,
            Self::Null(cache) => cache.with_self(self_uid, f).await,
        }
    }

    async fn with_user<R, E, F>(&self, arg: LoadUserArg, f: F) -> Result<R, E>
    where
        F: FnOnce(&Identity) -> Result<R, E> + Send,
        R: Send,
        E: From<LoadUserError> + Send,
    {
        match self {
            Self::Full(cache) => cache.with_user(arg, f).await,
            Self::Null(cache) => cache.with_user(arg, f).await,
        }
    }
}

#[async_trait]
impl<L> LoginLifecycle for SelfCacheHandle<L>
where
    L: IdentityLoader,
{
    async fn on_identity_changed(&self, uid: &Uid) {
        match self {
            Self::Full(cache) => cache.on_identity_changed(uid).await,
            Self::Null(cache) => cache.on_identity_changed(uid).await,
        }
    }

    async fn on_logout(&self) {
        match self {
            Self::Full(cache) => cache.on_logout().await,
            Self::Null(cache) => cache.on_logout().await,
        }
    }

    async fn on_login(&self, uid: &Uid) {
        match self {
            Self::Full(cache) => cache.on_login(uid).await,
            Self::Null(cache) => cache.on_login(uid).await,
        }
    }
}
