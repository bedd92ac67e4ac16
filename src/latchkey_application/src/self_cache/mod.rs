pub mod full_self_cache;
pub mod handle;
pub mod null_self_cache;

// Re-export for convenience
pub use full_self_cache::FullSelfCache;
pub use handle::SelfCacheHandle;
pub use null_self_cache::NullFullSelfCache;
