use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    uid::{DeviceId, Uid},
    username::NormalizedUsername,
};

/// A sibling key bound to one of the identity's devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceKey {
    pub kid: String,
    pub device_id: DeviceId,
    #[serde(default)]
    pub revoked: bool,
}

/// The full identity record of a user as produced by an identity loader.
///
/// Equality is by [`Uid`] only; two loads of the same user compare equal
/// even if their keys or load times differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    uid: Uid,
    username: NormalizedUsername,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    keys: Vec<DeviceKey>,
    #[serde(default = "Utc::now")]
    loaded_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(uid: Uid, username: NormalizedUsername) -> Self {
        Self {
            uid,
            username,
            full_name: None,
            keys: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_key(mut self, key: DeviceKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    pub fn username(&self) -> &NormalizedUsername {
        &self.username
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn keys(&self) -> &[DeviceKey] {
        &self.keys
    }

    pub fn has_active_key(&self) -> bool {
        self.keys.iter().any(|k| !k.revoked)
    }

    pub fn active_key_for(&self, device_id: &DeviceId) -> Option<&DeviceKey> {
        self.keys
            .iter()
            .find(|k| !k.revoked && &k.device_id == device_id)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Stamps the record as freshly loaded.
    pub fn touch(&mut self) {
        self.loaded_at = Utc::now();
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for Identity {}
