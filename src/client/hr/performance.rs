use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::segment;
use crate::client::api::{ApiClient, QueryParams, ResponseEnvelope};
use crate::error::ApiError;

pub struct PerformanceApi<'a> {
    api: &'a ApiClient,
}

impl<'a> PerformanceApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        PerformanceApi { api }
    }

    pub async fn reviews(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/performance/reviews", params).await
    }

    pub async fn review(&self, id: impl Display) -> Result<Value, ApiError> {
        self.api
            .get(&format!("/performance/reviews/{}", segment(id)))
            .await
    }

    pub async fn create_review<T: Serialize + ?Sized>(&self, review: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.post("/performance/reviews", review).await
    }

    pub async fn update_review<T: Serialize + ?Sized>(&self, id: impl Display, review: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .put(&format!("/performance/reviews/{}", segment(id)), review)
            .await
    }

    pub async fn kpis(&self) -> Result<Value, ApiError> {
        self.api.get("/performance/kpis").await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::client::api::{ApiClient, QueryParams};
    use crate::client::ip::PublicIp;
    use crate::client::token::Anonymous;
    use crate::test_support::{Canned, FakeBackend};
    use serde_json::json;

    #[tokio::test]
    async fn review_paths_encode_the_id() {
        let backend = FakeBackend::start(|_| Canned::json(200, json!({"id": "R/1"}))).await;
        let api = ApiClient::new(backend.url("/api"), Arc::new(Anonymous), PublicIp::fixed("192.0.2.44")).unwrap();
        let performance = api.performance();

        let review = performance.review("R/1").await.unwrap();
        assert_eq!(review["id"], "R/1");
        let read = backend.last();
        assert_eq!(read.method, "GET");
        assert_eq!(read.path(), "/api/performance/reviews/R%2F1");

        let env = performance.update_review("R/1", &json!({"score": 4})).await.unwrap();
        assert!(env.ok);
        let write = backend.last();
        assert_eq!(write.method, "PUT");
        assert_eq!(write.path(), "/api/performance/reviews/R%2F1");
        assert_eq!(write.json(), json!({"score": 4, "ip": "192.0.2.44"}));
    }

    #[tokio::test]
    async fn reviews_are_filtered_and_created() {
        let backend = FakeBackend::start(|_| Canned::json(200, json!([]))).await;
        let api = ApiClient::new(backend.url("/api"), Arc::new(Anonymous), PublicIp::fixed("192.0.2.44")).unwrap();

        api.performance()
            .reviews(&QueryParams::new().set("cycle", "2026-H1").set("reviewer", ""))
            .await
            .unwrap();
        assert_eq!(backend.last().uri, "/api/performance/reviews?cycle=2026-H1");

        api.performance().kpis().await.unwrap();
        assert_eq!(backend.last().path(), "/api/performance/kpis");

        api.performance().create_review(&json!({"employee_id": 3})).await.unwrap();
        let created = backend.last();
        assert_eq!(created.method, "POST");
        assert_eq!(created.path(), "/api/performance/reviews");
        assert_eq!(created.json()["ip"], "192.0.2.44");
    }
}
