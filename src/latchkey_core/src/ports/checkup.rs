use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{domain::identity::Identity, strategies::engine::EngineContext};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckupError {
    #[error("Checkup cancelled")]
    Cancelled,
    #[error("Device is not provisioned for {0}")]
    NotProvisioned(String),
    #[error("Checkup failed: {0}")]
    Failed(String),
}

/// Builds the post-login checkup bound to the freshly loaded identity.
///
/// `identity` is `None` when the login continued without a loadable key.
pub trait CheckupFactory: Send + Sync {
    fn name(&self) -> &'static str;

    fn create(&self, identity: Option<&Identity>) -> Arc<dyn CheckupTask>;
}

/// A running post-login checkup. `cancel` may be called from another task
/// while `login_checkup` is in flight; cancellation is cooperative.
#[async_trait]
pub trait CheckupTask: Send + Sync {
    async fn login_checkup(&self, ctx: &EngineContext) -> Result<(), CheckupError>;

    async fn cancel(&self) -> Result<(), CheckupError>;
}
