use std::fmt::Display;

use reqwest::multipart::Form;
use serde_json::Value;

use super::segment;
use crate::client::api::{ApiClient, QueryParams, ResponseEnvelope};
use crate::error::ApiError;

pub struct DocumentsApi<'a> {
    api: &'a ApiClient,
}

impl<'a> DocumentsApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        DocumentsApi { api }
    }

    pub async fn list(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/documents", params).await
    }

    /// Form fields plus one or more file parts, as built by the caller.
    pub async fn upload(&self, form: Form) -> Result<ResponseEnvelope, ApiError> {
        self.api.upload("/documents", form).await
    }

    pub async fn delete(&self, id: impl Display) -> Result<ResponseEnvelope, ApiError> {
        self.api.delete(&format!("/documents/{}", segment(id))).await
    }
}
