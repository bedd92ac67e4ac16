pub mod engine;
pub mod login_strategy;
pub mod self_cache;
