pub mod self_cache;
pub mod strategies;
pub mod use_cases;

pub use self_cache::{FullSelfCache, NullFullSelfCache, SelfCacheHandle};
pub use strategies::{PassphraseLogin, PromptLogin, StoredSecretLogin};
pub use use_cases::{LoginDeps, LoginEngine, LoginError, LoginPhase};
