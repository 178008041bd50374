//! Salary components: earnings, allowances and deductions.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::segment;
use crate::client::api::{ApiClient, ResponseEnvelope};
use crate::error::ApiError;

pub struct SalaryApi<'a> {
    api: &'a ApiClient,
}

impl<'a> SalaryApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        SalaryApi { api }
    }

    pub async fn earnings(&self) -> Result<Value, ApiError> {
        self.api.get("/salary/earnings").await
    }

    pub async fn allowances(&self) -> Result<Value, ApiError> {
        self.api.get("/salary/allowances").await
    }

    pub async fn create_allowance<T: Serialize + ?Sized>(&self, allowance: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.post("/salary/allowances", allowance).await
    }

    pub async fn update_allowance<T: Serialize + ?Sized>(
        &self,
        id: impl Display,
        allowance: &T,
    ) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .put(&format!("/salary/allowances/{}", segment(id)), allowance)
            .await
    }

    pub async fn delete_allowance(&self, id: impl Display) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .delete(&format!("/salary/allowances/{}", segment(id)))
            .await
    }

    pub async fn deductions(&self) -> Result<Value, ApiError> {
        self.api.get("/salary/deductions").await
    }

    pub async fn create_deduction<T: Serialize + ?Sized>(&self, deduction: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.post("/salary/deductions", deduction).await
    }

    pub async fn update_deduction<T: Serialize + ?Sized>(
        &self,
        id: impl Display,
        deduction: &T,
    ) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .put(&format!("/salary/deductions/{}", segment(id)), deduction)
            .await
    }

    pub async fn delete_deduction(&self, id: impl Display) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .delete(&format!("/salary/deductions/{}", segment(id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::api::ApiClient;
    use crate::test_support::{Canned, FakeBackend};
    use serde_json::json;

    #[tokio::test]
    async fn allowance_and_deduction_paths() {
        let backend = FakeBackend::start(|_| Canned::json(200, json!({}))).await;
        let api = ApiClient::anonymous(backend.url("/api")).unwrap();
        let salary = api.salary();

        salary.create_allowance(&json!({"name": "Fuel", "amount": 7500})).await.unwrap();
        assert_eq!(backend.last().path(), "/api/salary/allowances");
        salary.update_deduction(9, &json!({"amount": 250})).await.unwrap();
        let req = backend.last();
        assert_eq!((req.method.as_str(), req.path()), ("PUT", "/api/salary/deductions/9"));
        salary.delete_allowance(2).await.unwrap();
        assert_eq!(backend.last().path(), "/api/salary/allowances/2");
        salary.earnings().await.unwrap();
        assert_eq!(backend.last().path(), "/api/salary/earnings");
    }
}
