use async_trait::async_trait;
use thiserror::Error;

use crate::domain::uid::DeviceId;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("No active session")]
    NoActiveSession,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

#[async_trait]
pub trait SessionMarker: Send + Sync {
    /// Records that the active session completed device setup on `device_id`.
    async fn mark_provisioned(&self, device_id: &DeviceId) -> Result<(), SessionError>;
}
