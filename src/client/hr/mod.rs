//! HR resource groupings. Each one only binds names to paths on [`ApiClient`].

use std::fmt::Display;

use crate::client::api::ApiClient;

pub mod attendance;
pub mod audit;
pub mod dashboard;
pub mod documents;
pub mod employees;
pub mod etf_epf;
pub mod leave;
pub mod payroll;
pub mod performance;
pub mod salary;

pub use attendance::AttendanceApi;
pub use audit::AuditApi;
pub use dashboard::{DashboardApi, DashboardOverview};
pub use documents::DocumentsApi;
pub use employees::EmployeesApi;
pub use etf_epf::EtfEpfApi;
pub use leave::LeaveApi;
pub use payroll::PayrollApi;
pub use performance::PerformanceApi;
pub use salary::SalaryApi;

/// Percent-encodes an identifier for use as a single path segment.
pub(crate) fn segment(id: impl Display) -> String {
    urlencoding::encode(&id.to_string()).into_owned()
}

impl ApiClient {
    pub fn employees(&self) -> EmployeesApi<'_> {
        EmployeesApi::new(self)
    }

    pub fn attendance(&self) -> AttendanceApi<'_> {
        AttendanceApi::new(self)
    }

    pub fn leave(&self) -> LeaveApi<'_> {
        LeaveApi::new(self)
    }

    pub fn performance(&self) -> PerformanceApi<'_> {
        PerformanceApi::new(self)
    }

    pub fn etf_epf(&self) -> EtfEpfApi<'_> {
        EtfEpfApi::new(self)
    }

    pub fn payroll(&self) -> PayrollApi<'_> {
        PayrollApi::new(self)
    }

    pub fn salary(&self) -> SalaryApi<'_> {
        SalaryApi::new(self)
    }

    pub fn documents(&self) -> DocumentsApi<'_> {
        DocumentsApi::new(self)
    }

    pub fn audit(&self) -> AuditApi<'_> {
        AuditApi::new(self)
    }

    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi::new(self)
    }
}
