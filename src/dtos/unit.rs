use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUnitRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameUnitRequest {
    pub name: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct UnitResponse {
    pub name: String,
}
