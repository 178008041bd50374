//! EPF/ETF statutory contributions.

use serde::Serialize;
use serde_json::Value;

use crate::client::api::{ApiClient, QueryParams, ResponseEnvelope};
use crate::error::ApiError;

pub struct EtfEpfApi<'a> {
    api: &'a ApiClient,
}

impl<'a> EtfEpfApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        EtfEpfApi { api }
    }

    pub async fn contributions(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/etf-epf/contributions", params).await
    }

    pub async fn rates(&self) -> Result<Value, ApiError> {
        self.api.get("/etf-epf/rates").await
    }

    pub async fn update_rates<T: Serialize + ?Sized>(&self, rates: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.put("/etf-epf/rates", rates).await
    }

    /// Asks the backend to compute contributions for a period.
    pub async fn calculate<T: Serialize + ?Sized>(&self, period: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.post("/etf-epf/calculate", period).await
    }

    pub async fn export(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/etf-epf/export", params).await
    }
}
