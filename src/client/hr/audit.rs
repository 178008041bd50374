use std::fmt::Display;

use serde_json::Value;

use super::segment;
use crate::client::api::{ApiClient, QueryParams};
use crate::error::ApiError;

pub struct AuditApi<'a> {
    api: &'a ApiClient,
}

impl<'a> AuditApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        AuditApi { api }
    }

    /// Filters: `user`, `action`, `from`, `to`, `page`, `limit`.
    pub async fn logs(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/audit/logs", params).await
    }

    pub async fn log(&self, id: impl Display) -> Result<Value, ApiError> {
        self.api.get(&format!("/audit/logs/{}", segment(id))).await
    }
}
