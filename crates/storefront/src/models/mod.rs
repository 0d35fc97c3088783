//! Read models for storefront pages.

pub mod product;
pub mod shop;

pub use product::{ProductCard, ProductDetail};
pub use shop::ShopAddress;
