pub mod login;

// Re-export for convenience
pub use login::{LoginDeps, LoginEngine, LoginError, LoginPhase};
