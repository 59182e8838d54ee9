//! Admin authentication: signed session tokens, the login endpoints and the
//! gate middleware in front of the dashboard.

pub mod gate;
pub mod login;
pub mod session;
pub mod state;
mod token;
pub mod types;

pub use state::AdminConfig;
