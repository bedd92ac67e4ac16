pub mod hashmap_identity_loader;
pub mod in_memory_login_state;

pub use hashmap_identity_loader::HashMapIdentityLoader;
pub use in_memory_login_state::{InMemoryLoginState, Session};
