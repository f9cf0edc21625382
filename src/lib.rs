//! HD Store storefront core
//!
//! Bilingual (Arabic/English) storefront for used and refurbished laptops.
//!
//! ## Features
//! - Read-only product catalog feed
//! - Catalog filtering, search, autosuggest, sorting and pagination
//! - Shopping cart with durable persistence and derived totals
//! - Checkout rendered as a WhatsApp deep link (cash on delivery)

pub mod api;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod storage;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::Catalog;
pub use config::StorefrontConfig;
pub use domain::aggregates::{Cart, CartEntry, CheckoutDetails, Order, Product};
pub use domain::value_objects::Money;
pub use store::CartStore;

// =============================================================================
// Core Types
// =============================================================================

/// Display language of the storefront.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ar,
    #[default]
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }
}

/// A value carried in both storefront languages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub ar: T,
    pub en: T,
}

impl<T> Localized<T> {
    pub fn new(ar: T, en: T) -> Self { Self { ar, en } }

    pub fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::Ar => &self.ar,
            Locale::En => &self.en,
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid checkout details: {0}")]
    InvalidCheckout(#[from] validator::ValidationErrors),

    #[error("Storage quota exceeded: needed {needed} bytes, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
