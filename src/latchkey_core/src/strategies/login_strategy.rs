use async_trait::async_trait;

use crate::{
    domain::capability::UiKind,
    ports::login_state::{LoginState, LoginStateError},
    strategies::engine::EngineContext,
};

/// One way of establishing an authenticated session against the
/// login-state container.
///
/// Strategies are chosen when the login engine is built and never switched
/// while it runs.
#[async_trait]
pub trait LoginStrategy: Send + Sync {
    /// Capabilities the strategy pulls from the run context.
    fn required_capabilities(&self) -> Vec<UiKind>;

    async fn login(
        &self,
        login_state: &dyn LoginState,
        ctx: &EngineContext,
    ) -> Result<(), LoginStateError>;
}
