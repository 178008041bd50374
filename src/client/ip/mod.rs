pub mod services;

pub use services::{DEFAULT_LOOKUP_TIMEOUT, PublicIp, UNKNOWN_IP};
