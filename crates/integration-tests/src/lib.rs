//! Integration test harness for Shoebox.
//!
//! Runs the real storefront router against an in-process catalog fixture
//! server, with cart storage in a temporary directory. Tests drive the
//! storefront over HTTP with `reqwest`, or call the cart service directly
//! through the shared [`AppState`].
//!
//! ```rust,ignore
//! let ctx = TestContext::new().await;
//!
//! let resp = ctx
//!     .client
//!     .post(format!("{}/cart/add", ctx.storefront_url))
//!     .form(&[("product_id", "1")])
//!     .send()
//!     .await?;
//! assert_eq!(resp.status(), 200);
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tempfile::TempDir;
use url::Url;

use shoebox_core::{Product, ProductId, Stock};
use shoebox_storefront::config::{CatalogConfig, StorefrontConfig};
use shoebox_storefront::routes;
use shoebox_storefront::state::AppState;

/// Shared stock table, mutable from tests.
pub type StockTable = Arc<Mutex<HashMap<ProductId, u32>>>;

// =============================================================================
// Catalog Fixtures
// =============================================================================

/// Sample products mirroring the shape of the real catalog API.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    vec![
        product(1, "Cloudfoam Runner", "59.90"),
        product(2, "Court Classic", "89.00"),
        product(3, "Trail Breaker", "129.90"),
    ]
}

/// Default stock levels for the sample products.
#[must_use]
pub fn sample_stock() -> HashMap<ProductId, u32> {
    HashMap::from([
        (ProductId::new(1), 5),
        (ProductId::new(2), 2),
        (ProductId::new(3), 10),
    ])
}

fn product(id: i64, title: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price: price.parse().expect("valid decimal literal"),
        image: format!("https://cdn.shoebox.test/img/{id}.jpg"),
    }
}

// =============================================================================
// Catalog Fixture Server
// =============================================================================

#[derive(Clone)]
struct FixtureState {
    products: Arc<Vec<Product>>,
    stock: StockTable,
}

/// Build the catalog fixture router serving the storefront's three
/// endpoints: `/products`, `/products/{id}`, `/stock/{id}`.
fn catalog_app(products: Vec<Product>, stock: StockTable) -> Router {
    let state = FixtureState {
        products: Arc::new(products),
        stock,
    };

    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/stock/{id}", get(get_stock))
        .with_state(state)
}

async fn list_products(State(state): State<FixtureState>) -> Json<Vec<Product>> {
    Json(state.products.as_ref().clone())
}

async fn get_product(State(state): State<FixtureState>, Path(id): Path<i64>) -> Response {
    let id = ProductId::new(id);
    state.products.iter().find(|p| p.id == id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |p| Json(p.clone()).into_response(),
    )
}

async fn get_stock(State(state): State<FixtureState>, Path(id): Path<i64>) -> Response {
    let id = ProductId::new(id);
    let amount = state
        .stock
        .lock()
        .expect("stock table poisoned")
        .get(&id)
        .copied();

    amount.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |amount| Json(Stock { id, amount }).into_response(),
    )
}

// =============================================================================
// TestContext
// =============================================================================

/// Everything a test needs to drive the storefront.
pub struct TestContext {
    /// HTTP client for the storefront.
    pub client: reqwest::Client,
    /// Base URL of the running storefront.
    pub storefront_url: String,
    /// The storefront's application state (shared with the HTTP server).
    pub state: AppState,
    /// The storefront configuration, reusable for a restarted instance.
    pub config: StorefrontConfig,
    /// Stock table of the catalog fixture, mutable from tests.
    pub stock: StockTable,
    /// Path of the cart store file.
    pub store_path: PathBuf,
    _store_dir: TempDir,
}

impl TestContext {
    /// Start a storefront wired to the sample catalog.
    pub async fn new() -> Self {
        Self::with_fixtures(sample_products(), sample_stock()).await
    }

    /// Start a storefront wired to the given catalog fixtures.
    pub async fn with_fixtures(products: Vec<Product>, stock: HashMap<ProductId, u32>) -> Self {
        let stock: StockTable = Arc::new(Mutex::new(stock));
        let catalog_addr = serve(catalog_app(products, Arc::clone(&stock))).await;

        let store_dir = TempDir::new().expect("Failed to create temp dir");
        let store_path = store_dir.path().join("cart-store.json");

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            catalog: CatalogConfig {
                base_url: Url::parse(&format!("http://{catalog_addr}"))
                    .expect("valid catalog url"),
            },
            cart_store_path: store_path.clone(),
            sentry_dsn: None,
        };

        let state = AppState::new(config.clone());
        let storefront_addr = serve(routes::app(state.clone())).await;

        Self {
            client: reqwest::Client::new(),
            storefront_url: format!("http://{storefront_addr}"),
            state,
            config,
            stock,
            store_path,
            _store_dir: store_dir,
        }
    }

    /// Build a fresh application state against the same configuration,
    /// simulating a process restart: the cart re-seeds from the store file.
    #[must_use]
    pub fn reopened_state(&self) -> AppState {
        AppState::new(self.config.clone())
    }

    /// Set the available stock for a product.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.stock
            .lock()
            .expect("stock table poisoned")
            .insert(id, amount);
    }
}

/// Bind an ephemeral port and serve the router in the background.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    addr
}
