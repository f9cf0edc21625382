//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{Condition, Grade, KeyboardLayout, Product, ProductSpecs};
pub use order::{center_label, whatsapp_link, CheckoutDetails, DeliveryCenter, LineItem, Order, ASSIUT_CENTERS};
pub use cart::{Cart, CartEntry};
