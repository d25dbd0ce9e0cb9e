//! Cart service tests covering the cart container's contract.
//!
//! Each test runs the real cart service against the in-process catalog
//! fixture; persistence goes to a temporary store file that is compared
//! against the in-memory cart after every mutation.

use shoebox_core::{CartItem, ProductId};
use shoebox_integration_tests::TestContext;
use shoebox_storefront::cart::CartError;
use shoebox_storefront::cart::store::CartStore;

/// Compact (id, amount) view of a cart for assertions.
fn ids(items: &[CartItem]) -> Vec<(i64, u32)> {
    items.iter().map(|i| (i.id.as_i64(), i.amount)).collect()
}

async fn assert_persisted_matches(ctx: &TestContext) {
    let in_memory = ctx.state.cart().items().await;
    assert_eq!(CartStore::open(&ctx.store_path).load(), in_memory);
}

#[tokio::test]
async fn add_inserts_new_product_with_amount_one() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    cart.add_product(ProductId::new(1)).await.expect("add");

    let items = cart.items().await;
    assert_eq!(ids(&items), vec![(1, 1)]);
    let item = items.first().expect("one item");
    assert_eq!(item.title, "Cloudfoam Runner");
    assert_persisted_matches(&ctx).await;
}

#[tokio::test]
async fn add_appends_after_existing_entries() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    cart.add_product(ProductId::new(1)).await.expect("add 1");
    cart.add_product(ProductId::new(2)).await.expect("add 2");

    assert_eq!(ids(&cart.items().await), vec![(1, 1), (2, 1)]);
    assert_persisted_matches(&ctx).await;
}

#[tokio::test]
async fn add_existing_product_is_equivalent_to_increment() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    cart.add_product(ProductId::new(1)).await.expect("add");
    cart.add_product(ProductId::new(1)).await.expect("add again");

    assert_eq!(ids(&cart.items().await), vec![(1, 2)]);
    assert_persisted_matches(&ctx).await;
}

#[tokio::test]
async fn add_existing_product_respects_stock() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();
    let id = ProductId::new(2); // stock is 2

    cart.add_product(id).await.expect("add");
    cart.add_product(id).await.expect("add to stock limit");

    let err = cart.add_product(id).await.expect_err("beyond stock");
    assert!(matches!(err, CartError::OutOfStock { .. }));
    assert_eq!(ids(&cart.items().await), vec![(2, 2)]);
}

#[tokio::test]
async fn add_unknown_product_fails_and_leaves_cart_unchanged() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    let err = cart
        .add_product(ProductId::new(99))
        .await
        .expect_err("unknown product");
    assert!(matches!(err, CartError::Catalog(_)));
    assert!(cart.items().await.is_empty());
}

#[tokio::test]
async fn update_below_one_is_a_noop() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    cart.add_product(ProductId::new(1)).await.expect("add");
    cart.update_amount(ProductId::new(1), 0)
        .await
        .expect("amount below one is not an error");

    assert_eq!(ids(&cart.items().await), vec![(1, 1)]);
    assert_persisted_matches(&ctx).await;
}

#[tokio::test]
async fn update_beyond_stock_is_rejected() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();
    let id = ProductId::new(2); // stock is 2

    cart.add_product(id).await.expect("add");
    cart.update_amount(id, 2).await.expect("within stock");
    assert_eq!(ids(&cart.items().await), vec![(2, 2)]);

    // stock = 2, cart amount = 2, requested = 3 -> rejected
    let err = cart.update_amount(id, 3).await.expect_err("beyond stock");
    assert!(matches!(
        err,
        CartError::OutOfStock {
            requested: 3,
            available: 2,
            ..
        }
    ));
    assert_eq!(ids(&cart.items().await), vec![(2, 2)]);
    assert_persisted_matches(&ctx).await;
}

#[tokio::test]
async fn update_unknown_product_is_a_silent_noop() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    cart.add_product(ProductId::new(1)).await.expect("add");
    cart.update_amount(ProductId::new(3), 2)
        .await
        .expect("unknown id falls through");

    assert_eq!(ids(&cart.items().await), vec![(1, 1)]);
}

#[tokio::test]
async fn remove_absent_product_is_an_error() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    let err = cart
        .remove_product(ProductId::new(1))
        .await
        .expect_err("absent id");
    assert!(matches!(err, CartError::NotInCart(_)));
    assert!(cart.items().await.is_empty());
}

#[tokio::test]
async fn remove_present_product_removes_and_persists() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    cart.add_product(ProductId::new(1)).await.expect("add 1");
    cart.add_product(ProductId::new(2)).await.expect("add 2");
    cart.remove_product(ProductId::new(1)).await.expect("remove");

    assert_eq!(ids(&cart.items().await), vec![(2, 1)]);
    assert_persisted_matches(&ctx).await;
}

#[tokio::test]
async fn cart_survives_restart() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    cart.add_product(ProductId::new(1)).await.expect("add");
    cart.add_product(ProductId::new(1)).await.expect("add again");

    let reopened = ctx.reopened_state();
    assert_eq!(ids(&reopened.cart().items().await), vec![(1, 2)]);
}

#[tokio::test]
async fn concurrent_adds_do_not_lose_updates() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();
    let id = ProductId::new(1);

    let (a, b) = tokio::join!(cart.add_product(id), cart.add_product(id));
    a.expect("first add");
    b.expect("second add");

    assert_eq!(ids(&cart.items().await), vec![(1, 2)]);
}

#[tokio::test]
async fn end_to_end_cart_session() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();
    let id = ProductId::new(1); // stock is 5

    cart.add_product(id).await.expect("add");
    assert_eq!(ids(&cart.items().await), vec![(1, 1)]);

    cart.add_product(id).await.expect("add again");
    assert_eq!(ids(&cart.items().await), vec![(1, 2)]);

    let err = cart.update_amount(id, 10).await.expect_err("beyond stock");
    assert!(matches!(err, CartError::OutOfStock { .. }));
    assert_eq!(ids(&cart.items().await), vec![(1, 2)]);

    cart.remove_product(id).await.expect("remove");
    assert!(cart.items().await.is_empty());
    assert_persisted_matches(&ctx).await;
}

#[tokio::test]
async fn stored_cart_lives_under_a_single_string_key() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();

    cart.add_product(ProductId::new(1)).await.expect("add");

    // The store file is a string-to-string map; the cart is one key whose
    // value is the JSON-serialized item list.
    let raw = std::fs::read_to_string(&ctx.store_path).expect("store file");
    let map: std::collections::HashMap<String, String> =
        serde_json::from_str(&raw).expect("store file is a string map");
    let payload = map.get("shoebox:cart").expect("cart key");

    let items: Vec<CartItem> = serde_json::from_str(payload).expect("cart payload");
    assert_eq!(items, cart.items().await);
}

#[tokio::test]
async fn raised_stock_allows_previously_rejected_amount() {
    let ctx = TestContext::new().await;
    let cart = ctx.state.cart();
    let id = ProductId::new(2); // stock starts at 2

    cart.add_product(id).await.expect("add");
    let err = cart.update_amount(id, 4).await.expect_err("beyond stock");
    assert!(matches!(err, CartError::OutOfStock { .. }));

    ctx.set_stock(id, 6);
    cart.update_amount(id, 4).await.expect("now within stock");
    assert_eq!(ids(&cart.items().await), vec![(2, 4)]);
}
