pub mod capability;
pub mod identity;
pub mod load_user_arg;
pub mod uid;
pub mod username;
