use axum::{
    routing::{get, post, put},
    Router, middleware,
};
use crate::handlers::unit::{list_units, create_unit, rename_unit, delete_unit};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let open_routes = Router::new()
        .route("/units", get(list_units));

    let protected_routes = Router::new()
        .route("/units", post(create_unit))
        .route("/units/{name}", put(rename_unit).delete(delete_unit))
        .layer(middleware::from_fn(require_auth));

    open_routes.merge(protected_routes)
}
