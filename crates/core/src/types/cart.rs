//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::product::Product;

/// A product held in the cart together with its quantity.
///
/// This is both the in-memory and the persisted representation: the cart
/// store serializes the full item list verbatim, and reloading it yields an
/// identical list (order and fields preserved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    /// Quantity held in the cart. Always at least 1 for a stored item.
    pub amount: u32,
}

impl CartItem {
    /// Create a cart item from a catalog product and a held quantity.
    #[must_use]
    pub fn new(product: Product, amount: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Line total: unit price times held quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> CartItem {
        CartItem::new(
            Product {
                id: ProductId::new(1),
                title: "Cloudfoam Runner".to_string(),
                price: Decimal::new(5990, 2),
                image: "https://cdn.example.com/1.jpg".to_string(),
            },
            2,
        )
    }

    #[test]
    fn test_new_copies_product_fields() {
        let item = sample_item();
        assert_eq!(item.id, ProductId::new(1));
        assert_eq!(item.title, "Cloudfoam Runner");
        assert_eq!(item.amount, 2);
    }

    #[test]
    fn test_line_total() {
        let item = sample_item();
        assert_eq!(item.line_total(), Decimal::new(11980, 2));
    }

    #[test]
    fn test_serde_roundtrip_preserves_order_and_fields() {
        let items = vec![
            sample_item(),
            CartItem {
                id: ProductId::new(2),
                title: "Court Classic".to_string(),
                price: Decimal::new(8900, 2),
                image: "https://cdn.example.com/2.jpg".to_string(),
                amount: 1,
            },
        ];
        let json = serde_json::to_string(&items).expect("serialize");
        let back: Vec<CartItem> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, items);
    }
}
