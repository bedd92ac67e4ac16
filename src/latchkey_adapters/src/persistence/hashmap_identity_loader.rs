use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use latchkey_core::{Identity, IdentityLoader, LoadUserArg, LoadUserError, Uid};

/// An identity directory held in memory.
#[derive(Default, Clone)]
pub struct HashMapIdentityLoader {
    users: Arc<RwLock<HashMap<Uid, Identity>>>,
    loads: Arc<AtomicUsize>,
}

impl HashMapIdentityLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from a JSON array of identity records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let identities: Vec<Identity> = serde_json::from_str(json)?;
        let users = identities.into_iter().map(|u| (*u.uid(), u)).collect();
        Ok(Self {
            users: Arc::new(RwLock::new(users)),
            loads: Arc::default(),
        })
    }

    /// Adds or replaces a record.
    pub async fn upsert(&self, identity: Identity) {
        self.users.write().await.insert(*identity.uid(), identity);
    }

    /// Number of `load` calls served so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IdentityLoader for HashMapIdentityLoader {
    async fn load(&self, arg: &LoadUserArg) -> Result<Identity, LoadUserError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let users = self.users.read().await;

        let user = if let Some(uid) = arg.uid.or(arg.self_uid.filter(|_| arg.self_load)) {
            users.get(&uid).ok_or(LoadUserError::NotFound(uid.to_string()))?
        } else if let Some(raw) = &arg.name {
            let name = arg
                .normalized_name()
                .ok_or_else(|| LoadUserError::InvalidArg(raw.clone()))?;
            users
                .values()
                .find(|u| u.username() == &name)
                .ok_or(LoadUserError::NotFound(name.to_string()))?
        } else if arg.self_load {
            return Err(LoadUserError::NoSelf);
        } else {
            return Err(LoadUserError::InvalidArg("empty lookup".to_string()));
        };

        if !arg.public_key_optional && !user.has_active_key() {
            return Err(LoadUserError::NoKey(user.username().to_string()));
        }

        let mut user = user.clone();
        user.touch();
        Ok(user)
    }
}
