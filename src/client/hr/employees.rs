use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::segment;
use crate::client::api::{ApiClient, QueryParams, ResponseEnvelope};
use crate::error::ApiError;

pub struct EmployeesApi<'a> {
    api: &'a ApiClient,
}

impl<'a> EmployeesApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        EmployeesApi { api }
    }

    pub async fn list(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/employees", params).await
    }

    pub async fn get(&self, id: impl Display) -> Result<Value, ApiError> {
        self.api.get(&format!("/employees/{}", segment(id))).await
    }

    pub async fn create<T: Serialize + ?Sized>(&self, employee: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.post("/employees", employee).await
    }

    pub async fn update<T: Serialize + ?Sized>(&self, id: impl Display, employee: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.put(&format!("/employees/{}", segment(id)), employee).await
    }

    pub async fn delete(&self, id: impl Display) -> Result<ResponseEnvelope, ApiError> {
        self.api.delete(&format!("/employees/{}", segment(id))).await
    }
}
