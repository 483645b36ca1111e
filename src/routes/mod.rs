pub mod products;
pub mod categories;
pub mod units;
pub mod package_types;
pub mod employees;
pub mod quotations;
pub mod users;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(products::routes())
        .merge(categories::routes())
        .merge(units::routes())
        .merge(package_types::routes())
        .merge(employees::routes())
        .merge(quotations::routes())
        .merge(users::routes())
}
