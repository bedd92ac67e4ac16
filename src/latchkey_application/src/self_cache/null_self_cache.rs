use async_trait::async_trait;
use latchkey_core::{
    Identity, IdentityLoader, LoadUserArg, LoadUserError, LoginLifecycle, SelfCache, Uid,
};

/// A [`SelfCache`] without a slot: every lookup goes to the loader and
/// lifecycle events are ignored.
pub struct NullFullSelfCache<L> {
    loader: L,
}

impl<L> NullFullSelfCache<L>
where
    L: IdentityLoader,
{
    pub fn new(loader: L) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl<L> SelfCache for NullFullSelfCache<L>
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
        self.with_user(arg, f).await
    }

    async fn with_user<R, E, F>(&self, arg: LoadUserArg, f: F) -> Result<R, E>
    where
        F: FnOnce(&Identity) -> Result<R, E> + Send,
        R: Send,
        E: From<LoadUserError> + Send,
    {
        let user = self.loader.load(&arg).await?;
        f(&user)
    }
}

#[async_trait]
impl<L> LoginLifecycle for NullFullSelfCache<L>
where
    L: IdentityLoader,
{
    async fn on_identity_changed(&self, _uid: &Uid) {}

    async fn on_logout(&self) {}

    async fn on_login(&self, _uid: &Uid) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_core::NormalizedUsername;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Clone)]
    struct CountingLoader {
        user: Identity,
        loads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl IdentityLoader for CountingLoader {
        async fn load(&self, arg: &LoadUserArg) -> Result<Identity, LoadUserError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            assert!(arg.self_load);
            assert!(arg.public_key_optional);
            Ok(self.user.clone())
        }
    }

    #[tokio::test]
    async fn test_every_lookup_hits_loader() {
        let user = Identity::new(Uid::new(), NormalizedUsername::parse("alice").unwrap());
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = NullFullSelfCache::new(CountingLoader {
            user: user.clone(),
            loads: loads.clone(),
        });

        for _ in 0..3 {
            let uid = cache
                .with_self(user.uid(), |u| Ok::<_, LoadUserError>(*u.uid()))
                .await
                .unwrap();
            assert_eq!(uid, *user.uid());
        }
        cache.on_logout().await;

        assert_eq!(loads.load(Ordering::SeqCst), 3);
    }
}
