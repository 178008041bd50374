use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::segment;
use crate::client::api::{ApiClient, QueryParams, ResponseEnvelope};
use crate::error::ApiError;

pub struct PayrollApi<'a> {
    api: &'a ApiClient,
}

impl<'a> PayrollApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        PayrollApi { api }
    }

    pub async fn runs(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/payroll/runs", params).await
    }

    pub async fn run(&self, id: impl Display) -> Result<Value, ApiError> {
        self.api.get(&format!("/payroll/runs/{}", segment(id))).await
    }

    pub async fn create_run<T: Serialize + ?Sized>(&self, run: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.post("/payroll/runs", run).await
    }

    /// Moves a draft run to processed. The backend does the arithmetic.
    pub async fn process(&self, id: impl Display) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .post(&format!("/payroll/runs/{}/process", segment(id)), &())
            .await
    }

    pub async fn approve(&self, id: impl Display) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .post(&format!("/payroll/runs/{}/approve", segment(id)), &())
            .await
    }

    pub async fn payslips(&self, run_id: impl Display) -> Result<Value, ApiError> {
        self.api
            .get(&format!("/payroll/runs/{}/payslips", segment(run_id)))
            .await
    }

    pub async fn payslip(&self, run_id: impl Display, employee_id: impl Display) -> Result<Value, ApiError> {
        self.api
            .get(&format!(
                "/payroll/runs/{}/payslips/{}",
                segment(run_id),
                segment(employee_id)
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::api::ApiClient;
    use crate::test_support::{Canned, FakeBackend};
    use serde_json::json;

    #[tokio::test]
    async fn run_workflow_paths() {
        let backend = FakeBackend::start(|_| Canned::json(200, json!({"status": "processed", "message": "done"}))).await;
        let api = ApiClient::anonymous(backend.url("/api")).unwrap();
        let payroll = api.payroll();

        let env = payroll.process("2024-06").await.unwrap();
        assert!(env.ok);
        assert_eq!(env.status, 200);
        assert_eq!(env.message(), Some("done"));
        assert_eq!(env.body_status(), Some(&json!("processed")));
        let req = backend.last();
        assert_eq!((req.method.as_str(), req.path()), ("POST", "/api/payroll/runs/2024-06/process"));
        assert_eq!(req.json(), json!({"ip": "unknown"}));

        payroll.approve(3).await.unwrap();
        assert_eq!(backend.last().path(), "/api/payroll/runs/3/approve");

        payroll.payslip(3, "E 01").await.unwrap();
        assert_eq!(backend.last().path(), "/api/payroll/runs/3/payslips/E%2001");
    }
}
