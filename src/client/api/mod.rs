pub mod models;
pub mod services;

pub use models::{ParamValue, QueryParams, RequestOptions, ResponseEnvelope};
pub use services::ApiClient;
