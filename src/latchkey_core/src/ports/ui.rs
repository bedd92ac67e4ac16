use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UiError {
    #[error("Prompt cancelled by user")]
    Cancelled,
    #[error("UI error: {0}")]
    UnexpectedError(String),
}

#[async_trait]
pub trait LoginUi: Send + Sync {
    async fn get_username(&self) -> Result<String, UiError>;
}

#[async_trait]
pub trait SecretUi: Send + Sync {
    async fn get_passphrase(&self, username: &str) -> Result<Secret<String>, UiError>;
}

pub trait LogUi: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
}
