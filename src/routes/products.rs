use axum::{
    routing::{get, post, put},
    Router, middleware,
};
use crate::handlers::product::{
    get_products, get_product, create_product, update_product, delete_product,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    // Reads are open - the quotation form needs them without a login
    let open_routes = Router::new()
        .route("/products", get(get_products))
        .route("/products/{id}", get(get_product));

    // Only admins mutate reference data
    let protected_routes = Router::new()
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .layer(middleware::from_fn(require_auth));

    open_routes.merge(protected_routes)
}
