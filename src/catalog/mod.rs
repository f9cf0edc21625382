//! Catalog feed and query engine
//!
//! [`Catalog`] is the read-only, ordered product feed. The query engine in
//! [`query`] turns it plus a set of [`FilterCriteria`] into the visible,
//! sorted and paginated product list.

pub mod criteria;
pub mod query;

use std::path::Path;

use crate::domain::aggregates::Product;
use crate::domain::value_objects::Money;
use crate::{Result, StorefrontError};

pub use criteria::{FilterCriteria, PriceRange, Predicate, DEDICATED_GPU_VENDORS};
pub use query::{filter, paginate, search, sort, suggest, CatalogQuery, Page, QueryResult, SortKey, SUGGESTION_LIMIT};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

const RELATED_LIMIT: usize = 4;
const RELATED_PRICE_WINDOW: i64 = 3000;
const LIMITED_STOCK_LIMIT: usize = 4;

pub const HOT_DEAL_TAG: &str = "Hot Deal";
pub const BEST_SELLER_TAG: &str = "Best Seller";

/// Option lists offered by the catalog filter panel.
pub mod facets {
    pub const BRANDS: [&str; 3] = ["Dell", "HP", "Lenovo"];
    pub const RAM_OPTIONS: [&str; 3] = ["8GB", "16GB", "32GB"];
    pub const CPU_FAMILIES: [&str; 4] = ["i5", "i7", "Ryzen 5", "Ryzen 7"];
    pub const SCREEN_SIZES: [&str; 3] = ["13.3\"", "14\"", "15.6\""];
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self { Self { products } }

    /// Parses a JSON array of products, keeping feed order.
    pub fn from_json(raw: &str) -> Result<Self> { Ok(Self::new(serde_json::from_str(raw)?)) }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> Result<Self> { Self::from_json(BUILTIN_CATALOG) }

    pub fn products(&self) -> &[Product] { &self.products }
    pub fn len(&self) -> usize { self.products.len() }
    pub fn is_empty(&self) -> bool { self.products.is_empty() }

    pub fn get(&self, id: &str) -> Option<&Product> { self.products.iter().find(|p| p.id() == id) }

    pub fn require(&self, id: &str) -> Result<&Product> {
        self.get(id).ok_or_else(|| StorefrontError::ProductNotFound(id.to_string()))
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Product> { self.products.iter().find(|p| p.slug() == slug) }

    /// Other products from the same brand or within 3,000 EGP of its price.
    pub fn related(&self, product: &Product) -> Vec<&Product> {
        let window = Money::egp(RELATED_PRICE_WINDOW).amount();
        self.products
            .iter()
            .filter(|p| p.id() != product.id())
            .filter(|p| p.brand() == product.brand() || (p.price().amount() - product.price().amount()).abs() < window)
            .take(RELATED_LIMIT)
            .collect()
    }

    pub fn tagged(&self, tag: &str) -> Vec<&Product> { self.products.iter().filter(|p| p.has_tag(tag)).collect() }
    pub fn hot_deals(&self) -> Vec<&Product> { self.tagged(HOT_DEAL_TAG) }
    pub fn best_sellers(&self) -> Vec<&Product> { self.tagged(BEST_SELLER_TAG) }

    pub fn limited_stock(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_in_stock()).take(LIMITED_STOCK_LIMIT).collect()
    }
}
