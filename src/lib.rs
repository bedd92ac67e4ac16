//! # Latchkey - Login and Self-Identity Library
//!
//! This is a facade crate that re-exports all public APIs from the latchkey components.
//! Use this crate to get access to the login engine and the self cache in one place.
//!
//! ## Structure
//!
//! - **Core domain types**: `Uid`, `NormalizedUsername`, `Identity`, `LoadUserArg`, etc.
//! - **Ports**: `IdentityLoader`, `LoginState`, `CheckupFactory`, `SessionMarker`, UI traits
//! - **Application**: `FullSelfCache`, `NullFullSelfCache`, `LoginEngine` and the login strategies
//! - **Adapters**: in-memory collaborators, configuration and tracing setup

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types, ports and strategy traits
pub mod core {
    pub use latchkey_core::*;
}

// Re-export most commonly used core types at the root level
pub use latchkey_core::{
    DeviceId, DeviceKey, Identity, LoadUserArg, NormalizedUsername, Uid, UiKind,
};

// ============================================================================
// Ports
// ============================================================================

pub use latchkey_core::{
    CheckupError, CheckupFactory, CheckupTask, Engine, EngineContext, IdentityLoader,
    IdentityProjectionCache, LoadUserError, LogUi, LoginLifecycle, LoginState, LoginStateError,
    LoginStrategy, LoginUi, SecretUi, SelfCache, SessionError, SessionMarker, UiError,
};

// ============================================================================
// Application Layer
// ============================================================================

/// Self cache, login strategies and the login engine
pub mod application {
    pub use latchkey_application::*;
}

pub use latchkey_application::{
    FullSelfCache, LoginDeps, LoginEngine, LoginError, LoginPhase, NullFullSelfCache,
    PassphraseLogin, PromptLogin, SelfCacheHandle, StoredSecretLogin,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// In-memory collaborators
    pub mod persistence {
        pub use latchkey_adapters::persistence::*;
    }

    /// Post-login checkups
    pub mod checkup {
        pub use latchkey_adapters::checkup::*;
    }

    /// Non-interactive UIs
    pub mod ui {
        pub use latchkey_adapters::ui::*;
    }

    /// Configuration
    pub mod config {
        pub use latchkey_adapters::config::*;
    }
}

pub use latchkey_adapters::{
    DeviceCheckup, DeviceCheckupFactory, HashMapIdentityLoader, InMemoryLoginState,
    InMemoryRuntime, ScriptedUi, Session, Settings, TracingLogUi, init_tracing,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
