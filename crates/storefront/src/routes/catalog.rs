//! Catalog page: the product grid.
//!
//! The full product list is fetched per request (no pagination, no retry); a
//! catalog failure is logged and renders an empty grid. Each card is
//! annotated with the quantity already held in the cart.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use tracing::instrument;

use shoebox_core::{CartItem, ProductId};

use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub image: String,
    /// Quantity of this product already in the cart.
    pub in_cart: u32,
}

/// Format a price as a display string.
pub(crate) fn format_price(price: Decimal) -> String {
    format!("${price:.2}")
}

/// Fold the cart into a product-id to quantity map.
///
/// Ids absent from the cart are simply missing; readers default them to 0.
fn cart_quantities(items: &[CartItem]) -> HashMap<ProductId, u32> {
    items.iter().fold(HashMap::new(), |mut acc, item| {
        *acc.entry(item.id).or_insert(0) += item.amount;
        acc
    })
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub products: Vec<ProductCardView>,
}

/// Display the product grid.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let products = match state.catalog().get_products().await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!("Failed to fetch product list: {e}");
            Vec::new()
        }
    };

    let quantities = cart_quantities(&state.cart().items().await);

    let cards = products
        .into_iter()
        .map(|p| ProductCardView {
            in_cart: quantities.get(&p.id).copied().unwrap_or(0),
            id: p.id,
            title: p.title,
            price: format_price(p.price),
            image: p.image,
        })
        .collect();

    CatalogIndexTemplate { products: cards }
}
