use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::segment;
use crate::client::api::{ApiClient, QueryParams, ResponseEnvelope};
use crate::error::ApiError;

pub struct LeaveApi<'a> {
    api: &'a ApiClient,
}

impl<'a> LeaveApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        LeaveApi { api }
    }

    pub async fn types(&self) -> Result<Value, ApiError> {
        self.api.get("/leave/types").await
    }

    pub async fn requests(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/leave/requests", params).await
    }

    pub async fn apply<T: Serialize + ?Sized>(&self, request: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.post("/leave/requests", request).await
    }

    pub async fn approve<T: Serialize + ?Sized>(&self, id: impl Display, decision: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .put(&format!("/leave/requests/{}/approve", segment(id)), decision)
            .await
    }

    pub async fn reject<T: Serialize + ?Sized>(&self, id: impl Display, decision: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .put(&format!("/leave/requests/{}/reject", segment(id)), decision)
            .await
    }

    pub async fn balances(&self, employee_id: impl Display) -> Result<Value, ApiError> {
        self.api
            .get(&format!("/leave/balances/{}", segment(employee_id)))
            .await
    }
}
