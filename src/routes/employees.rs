use axum::{
    routing::{get, post, put},
    Router, middleware,
};
use crate::handlers::employee::{
    list_employees, get_employee_by_code, create_employee, update_employee, delete_employee,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    // The issuer picker on the quotation form reads these without a login
    let open_routes = Router::new()
        .route("/employees", get(list_employees))
        .route("/employees/by-code/{code}", get(get_employee_by_code));

    let protected_routes = Router::new()
        .route("/employees", post(create_employee))
        .route("/employees/{id}", put(update_employee).delete(delete_employee))
        .layer(middleware::from_fn(require_auth));

    open_routes.merge(protected_routes)
}
