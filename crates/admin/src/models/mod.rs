//! Domain models for admin.

pub mod category;
pub mod product;
pub mod region;
pub mod session;
pub mod shop;

pub use category::{Category, CategoryWithCount};
pub use product::{Product, ProductInput, ProductListing};
pub use region::{City, Province};
pub use session::{Flash, FlashKind};
pub use shop::{Shop, ShopInput};
