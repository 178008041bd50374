use serde::Serialize;
use serde_json::Value;

use crate::client::api::{ApiClient, QueryParams};
use crate::error::ApiError;

pub struct DashboardApi<'a> {
    api: &'a ApiClient,
}

/// Figures the landing page shows together.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub summary: Value,
    pub headcount: Value,
    pub payroll_totals: Value,
}

impl<'a> DashboardApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        DashboardApi { api }
    }

    pub async fn summary(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/dashboard/summary", params).await
    }

    pub async fn headcount(&self) -> Result<Value, ApiError> {
        self.api.get("/dashboard/headcount").await
    }

    pub async fn payroll_totals(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.api.get_with_params("/dashboard/payroll-totals", params).await
    }

    /// Issues the three reads concurrently. The first failure wins.
    pub async fn overview(&self, params: &QueryParams) -> Result<DashboardOverview, ApiError> {
        let (summary, headcount, payroll_totals) = futures::try_join!(
            self.summary(params),
            self.headcount(),
            self.payroll_totals(params)
        )?;
        Ok(DashboardOverview {
            summary,
            headcount,
            payroll_totals,
        })
    }
}
