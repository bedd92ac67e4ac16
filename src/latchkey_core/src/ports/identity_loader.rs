use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{identity::Identity, load_user_arg::LoadUserArg};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadUserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("No public key found for user {0}")]
    NoKey(String),
    #[error("No authenticated user to load")]
    NoSelf,
    #[error("Invalid lookup: {0}")]
    InvalidArg(String),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl LoadUserError {
    /// The identity exists but has no usable public key.
    ///
    /// Login tolerates this case and continues with an identity-less session.
    pub fn is_no_key(&self) -> bool {
        matches!(self, Self::NoKey(_))
    }
}

/// Fetches identity records from the identity service.
#[async_trait]
pub trait IdentityLoader: Send + Sync {
    async fn load(&self, arg: &LoadUserArg) -> Result<Identity, LoadUserError>;
}

/// A cache of lightweight identity projections that wants to hear about
/// full records served from the self cache.
pub trait IdentityProjectionCache: Send + Sync {
    fn put_identity(&self, identity: &Identity);
}
