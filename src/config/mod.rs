#[allow(clippy::module_inception)]
pub mod config;
pub mod session;

pub use config::{Config, LogConfig};
pub use session::{Session, SessionStore};
