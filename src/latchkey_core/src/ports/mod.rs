pub mod checkup;
pub mod identity_loader;
pub mod login_state;
pub mod session;
pub mod ui;
