//! Shared type definitions.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::CartItem;
pub use id::ProductId;
pub use product::{Product, Stock};
