//! The interchangeable ways a login can authenticate.
//!
//! Each strategy forwards to one entry point of the login-state container.
//! The login engine only sees them through [`latchkey_core::LoginStrategy`].

pub mod passphrase;
pub mod prompt;
pub mod stored_secret;

pub use passphrase::PassphraseLogin;
pub use prompt::PromptLogin;
pub use stored_secret::StoredSecretLogin;
