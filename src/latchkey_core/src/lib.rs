pub mod domain;
pub mod ports;
pub mod strategies;

// Re-export commonly used types for convenience
pub use domain::{
    capability::{EnginePrereqs, UiKind},
    identity::{DeviceKey, Identity},
    load_user_arg::LoadUserArg,
    uid::{DeviceId, IdParseError, Uid},
    username::{NormalizedUsername, UsernameError},
};

pub use ports::{
    checkup::{CheckupError, CheckupFactory, CheckupTask},
    identity_loader::{IdentityLoader, IdentityProjectionCache, LoadUserError},
    login_state::{LoginLifecycle, LoginState, LoginStateError},
    session::{SessionError, SessionMarker},
    ui::{LogUi, LoginUi, SecretUi, UiError},
};

pub use strategies::{
    engine::{Engine, EngineContext},
    login_strategy::LoginStrategy,
    self_cache::SelfCache,
};
