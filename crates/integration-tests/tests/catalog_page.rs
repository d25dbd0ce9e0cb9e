//! Catalog page rendering tests.

use reqwest::StatusCode;
use shoebox_core::ProductId;
use shoebox_integration_tests::TestContext;
use shoebox_storefront::config::{CatalogConfig, StorefrontConfig};
use shoebox_storefront::routes;
use shoebox_storefront::state::AppState;

async fn get_catalog(ctx: &TestContext) -> String {
    let resp = ctx
        .client
        .get(&ctx.storefront_url)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("body")
}

#[tokio::test]
async fn catalog_lists_products_with_formatted_prices() {
    let ctx = TestContext::new().await;

    let body = get_catalog(&ctx).await;
    assert!(body.contains("Cloudfoam Runner"));
    assert!(body.contains("$59.90"));
    assert!(body.contains("Court Classic"));
    assert!(body.contains("$89.00"));
    assert!(body.contains("Trail Breaker"));
    assert!(body.contains("$129.90"));
}

#[tokio::test]
async fn catalog_annotates_cards_with_cart_quantities() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();
    cart.add_product(ProductId::new(1)).await.expect("add");
    cart.add_product(ProductId::new(1)).await.expect("add again");

    let body = get_catalog(&ctx).await;
    assert!(body.contains(r#"<span class="in-cart">2</span>"#));
    // products not in the cart default to 0
    assert!(body.contains(r#"<span class="in-cart">0</span>"#));
}

#[tokio::test]
async fn catalog_failure_renders_an_empty_grid() {
    // Point the storefront at a catalog that is not listening.
    let store_dir = tempfile::tempdir().expect("temp dir");
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        catalog: CatalogConfig {
            base_url: url::Url::parse("http://127.0.0.1:9").expect("valid url"),
        },
        cart_store_path: store_dir.path().join("cart-store.json"),
        sentry_dsn: None,
    };
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, routes::app(state))
            .await
            .expect("server error");
    });

    let resp = reqwest::get(format!("http://{addr}/"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("body");
    assert!(body.contains("product-grid"));
    assert!(!body.contains("product-card"));
}
