use axum::{
    routing::{get, post, put},
    Router, middleware,
};
use crate::handlers::category::{
    list_categories, create_category, rename_category, delete_category,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let open_routes = Router::new()
        .route("/categories", get(list_categories));

    let protected_routes = Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{name}", put(rename_category).delete(delete_category))
        .layer(middleware::from_fn(require_auth));

    open_routes.merge(protected_routes)
}
