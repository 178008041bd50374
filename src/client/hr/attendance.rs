use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use super::segment;
use crate::client::api::{ApiClient, QueryParams, ResponseEnvelope};
use crate::error::ApiError;

pub struct AttendanceApi<'a> {
    api: &'a ApiClient,
}

impl<'a> AttendanceApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        AttendanceApi { api }
    }

    pub async fn timetables(&self) -> Result<Value, ApiError> {
        self.api.get("/attendance/timetables").await
    }

    pub async fn create_timetable<T: Serialize + ?Sized>(&self, timetable: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.post("/attendance/timetables", timetable).await
    }

    pub async fn update_timetable<T: Serialize + ?Sized>(
        &self,
        id: impl Display,
        timetable: &T,
    ) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .put(&format!("/attendance/timetables/{}", segment(id)), timetable)
            .await
    }

    pub async fn delete_timetable(&self, id: impl Display) -> Result<ResponseEnvelope, ApiError> {
        self.api
            .delete(&format!("/attendance/timetables/{}", segment(id)))
            .await
    }

    /// Punch records, typically filtered by `employee_id`, `from`, `to`.
    pub async fn records(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/attendance/records", params).await
    }

    /// Manual check-in/check-out entry.
    pub async fn mark<T: Serialize + ?Sized>(&self, mark: &T) -> Result<ResponseEnvelope, ApiError> {
        self.api.post("/attendance/mark", mark).await
    }

    pub async fn summary(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/attendance/summary", params).await
    }
}
