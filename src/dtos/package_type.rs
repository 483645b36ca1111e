use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

#[derive(Debug, Deserialize)]
pub struct CreatePackageTypeRequest {
    pub name: String,
    pub description: Option<String>,
}

// Rename keeps working against the old name in the path; description is
// replaced wholesale because the admin screen always sends it.
#[derive(Debug, Deserialize)]
pub struct UpdatePackageTypeRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PackageTypeResponse {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddPackageItemsRequest {
    pub product_names: Vec<String>,
}

// One membership row joined to its product, in the shape the quotation
// form's description dropdown needs.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PackageItemResponse {
    pub id: i64,
    pub product_name: String,
    pub unit: Option<String>,
    pub base_price: Option<Decimal>,
    pub description: Option<String>,
}
