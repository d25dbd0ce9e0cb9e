//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /            - Catalog page (product grid)
//! GET  /health      - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart        - Cart page
//! POST /cart/add    - Add one unit (returns count badge, triggers cart-updated)
//! POST /cart/update - Set quantity (returns cart_items fragment)
//! POST /cart/remove - Remove item (returns cart_items fragment)
//! GET  /cart/count  - Cart count badge (fragment)
//! ```

pub mod cart;
pub mod catalog;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog page
        .route("/", get(catalog::index))
        // Cart routes
        .nest("/cart", cart_routes())
}

/// Assemble the storefront application router.
///
/// Everything except the Sentry tower layers, which `main` adds outermost.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog API.
async fn health() -> &'static str {
    "ok"
}
