use axum::{
    routing::{get, post, put},
    Router, middleware,
};
use crate::handlers::quotation::{
    reserve_number, create_quotation, list_quotations, get_quotation,
    update_quotation, delete_quotation,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    // The staff-facing form reserves, saves, and views without a login
    let open_routes = Router::new()
        .route("/quotations/number", post(reserve_number))
        .route("/quotations", get(list_quotations).post(create_quotation))
        .route("/quotations/{id}", get(get_quotation));

    // Status changes and deletion belong to the admin list screen
    let protected_routes = Router::new()
        .route("/quotations/{id}", put(update_quotation).delete(delete_quotation))
        .layer(middleware::from_fn(require_auth));

    open_routes.merge(protected_routes)
}
