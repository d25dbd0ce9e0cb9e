//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! All failures are collapsed here into one of the fixed toast messages; the
//! cause is logged, nothing is re-thrown, and the cart is left unchanged.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use shoebox_core::{CartItem, ProductId};

use crate::cart::CartError;
use crate::filters;
use crate::routes::catalog::format_price;
use crate::state::AppState;

// =============================================================================
// Notifications
// =============================================================================

/// Fixed user-facing toast messages. No structured payload is surfaced.
pub const TOAST_ADD_FAILED: &str = "Could not add the product to your cart";
pub const TOAST_REMOVE_FAILED: &str = "Could not remove the product from your cart";
pub const TOAST_UPDATE_FAILED: &str = "Could not update the product quantity";
pub const TOAST_OUT_OF_STOCK: &str = "Requested quantity is out of stock";

/// The cart operation a failure is reported for.
#[derive(Debug, Clone, Copy)]
enum CartOp {
    Add,
    Remove,
    Update,
}

/// Collapse a cart failure into the fixed message for the operation.
///
/// Stock violations keep their own message regardless of the operation that
/// triggered them; everything else maps to the per-operation generic.
fn toast_message(op: CartOp, err: &CartError) -> &'static str {
    match err {
        CartError::OutOfStock { .. } => TOAST_OUT_OF_STOCK,
        _ => match op {
            CartOp::Add => TOAST_ADD_FAILED,
            CartOp::Remove => TOAST_REMOVE_FAILED,
            CartOp::Update => TOAST_UPDATE_FAILED,
        },
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub amount: u32,
    pub price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Build the display cart from the service's item list.
    #[must_use]
    pub fn from_items(items: &[CartItem]) -> Self {
        let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
        Self {
            items: items.iter().map(CartItemView::from).collect(),
            subtotal: format_price(subtotal),
            item_count: items.iter().map(|i| i.amount).sum(),
        }
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            image: item.image.clone(),
            amount: item.amount,
            price: format_price(item.price),
            line_total: format_price(item.line_total()),
        }
    }
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    pub amount: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Toast fragment template (out-of-band swap into the toast region).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub message: &'static str,
}

/// Render a toast and tell HTMX to leave the swap target alone.
fn toast_response(op: CartOp, err: &CartError) -> Response {
    (
        AppendHeaders([("HX-Reswap", "none")]),
        ToastTemplate {
            message: toast_message(op, err),
        },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let cart = CartView::from_items(&state.cart().items().await);
    CartShowTemplate { cart }
}

/// Add one unit of a product to the cart (HTMX).
///
/// Returns the cart count badge with an HTMX trigger to refresh dependent
/// fragments; on failure, a toast with the fixed message.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Response {
    let product_id = ProductId::new(form.product_id);

    match state.cart().add_product(product_id).await {
        Ok(()) => {
            let count = state.cart().total_quantity().await;
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartCountTemplate { count },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add product {product_id} to cart: {e}");
            toast_response(CartOp::Add, &e)
        }
    }
}

/// Set a cart item's quantity (HTMX).
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    let product_id = ProductId::new(form.product_id);

    match state.cart().update_amount(product_id, form.amount).await {
        Ok(()) => {
            let cart = CartView::from_items(&state.cart().items().await);
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartItemsTemplate { cart },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update amount of product {product_id}: {e}");
            toast_response(CartOp::Update, &e)
        }
    }
}

/// Remove an item from the cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);

    match state.cart().remove_product(product_id).await {
        Ok(()) => {
            let cart = CartView::from_items(&state.cart().items().await);
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartItemsTemplate { cart },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to remove product {product_id} from cart: {e}");
            toast_response(CartOp::Remove, &e)
        }
    }
}

/// Get the cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.cart().total_quantity().await;
    CartCountTemplate { count }
}
