//! Client for the HR/payroll console backend: authenticated JSON reads and
//! writes, multipart uploads, and the HR resource groupings built on them.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::api::{ApiClient, ParamValue, QueryParams, RequestOptions, ResponseEnvelope};
pub use client::ip::{PublicIp, UNKNOWN_IP};
pub use client::token::{Anonymous, MemoryToken, TokenSource};
pub use config::{Config, LogConfig, Session, SessionStore};
pub use error::{ApiError, ConfigError};
