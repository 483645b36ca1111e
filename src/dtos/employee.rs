use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub employee_code: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub employee_code: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub employee_code: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<crate::models::employee::Employee> for EmployeeResponse {
    fn from(employee: crate::models::employee::Employee) -> Self {
        Self {
            id: employee.id,
            employee_code: employee.employee_code,
            full_name: employee.full_name,
            is_active: employee.is_active,
            created_at: employee.created_at,
        }
    }
}
