use axum::{
    routing::{get, post, put, delete},
    Router, middleware,
};
use crate::handlers::package_type::{
    list_package_types, create_package_type, update_package_type, delete_package_type,
    list_package_items, add_package_items, delete_package_item,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let open_routes = Router::new()
        .route("/package-types", get(list_package_types))
        .route("/package-types/{name}/items", get(list_package_items));

    let protected_routes = Router::new()
        .route("/package-types", post(create_package_type))
        .route("/package-types/{name}", put(update_package_type).delete(delete_package_type))
        .route("/package-types/{name}/items", post(add_package_items))
        .route("/package-types/{name}/items/{id}", delete(delete_package_item))
        .layer(middleware::from_fn(require_auth));

    open_routes.merge(protected_routes)
}
