//! HTTP surface for a single storefront session.
//!
//! The service owns one cart, guarded by a mutex so each request sees the
//! cart mutations of the previous one in full.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::{self, CatalogQuery, FilterCriteria, PriceRange, SortKey};
use crate::domain::aggregates::{CheckoutDetails, Grade, KeyboardLayout, Product};
use crate::domain::value_objects::Money;
use crate::storage::CartStorage;
use crate::{Catalog, CartStore, Locale, StorefrontConfig, StorefrontError};

pub type SharedCart = Arc<Mutex<CartStore<Box<dyn CartStorage>>>>;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub cart: SharedCart,
    pub config: Arc<StorefrontConfig>,
}

impl AppState {
    pub fn new(catalog: Catalog, storage: impl CartStorage + 'static, config: StorefrontConfig) -> Self {
        let storage: Box<dyn CartStorage> = Box::new(storage);
        Self { catalog: Arc::new(catalog), cart: Arc::new(Mutex::new(CartStore::open(storage))), config: Arc::new(config) }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "hd-storefront"})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/:slug", get(get_product))
        .route("/api/v1/offers", get(offers))
        .route("/api/v1/search", get(search))
        .route("/api/v1/search/suggest", get(suggest))
        .route("/api/v1/cart", get(get_cart).delete(clear_cart))
        .route("/api/v1/cart/items", post(add_to_cart))
        .route("/api/v1/cart/items/:id", put(update_cart_item).delete(remove_cart_item))
        .route("/api/v1/checkout", post(checkout))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

type ApiResult<T> = Result<T, (StatusCode, String)>;

fn reject(e: StorefrontError) -> (StatusCode, String) {
    let status = match &e {
        StorefrontError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        StorefrontError::InvalidCheckout(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StorefrontError::EmptyCart => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

fn owned(products: Vec<&Product>) -> Vec<Product> { products.into_iter().cloned().collect() }

// =============================================================================
// Catalog
// =============================================================================

/// Catalog page parameters. Multi-valued filters are comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct ProductParams {
    pub brand: Option<String>,
    pub ram: Option<String>,
    pub cpu: Option<String>,
    pub screen: Option<String>,
    pub grade: Option<String>,
    pub keyboard: Option<String>,
    pub in_stock: Option<bool>,
    pub charger: Option<bool>,
    pub gpu: Option<bool>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub sort: Option<SortKey>,
    pub q: Option<String>,
    pub page: Option<usize>,
    pub locale: Option<Locale>,
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default().split(',').map(str::trim).filter(|v| !v.is_empty())
}

impl ProductParams {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            brands: split_list(self.brand.as_deref()).map(String::from).collect(),
            ram: split_list(self.ram.as_deref()).map(String::from).collect(),
            cpu: split_list(self.cpu.as_deref()).map(String::from).collect(),
            screen: split_list(self.screen.as_deref()).map(String::from).collect(),
            grades: split_list(self.grade.as_deref()).filter_map(Grade::from_code).collect(),
            keyboard: split_list(self.keyboard.as_deref()).filter_map(KeyboardLayout::from_code).collect(),
            in_stock_only: self.in_stock.unwrap_or(false),
            includes_charger: self.charger.unwrap_or(false),
            gpu_dedicated: self.gpu.unwrap_or(false),
            price: PriceRange::new(self.price_min.map(Money::egp), self.price_max.map(Money::egp)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductPage { pub products: Vec<Product>, pub total: usize, pub page: usize, pub has_more: bool, pub active_filters: usize }

async fn list_products(State(s): State<AppState>, Query(p): Query<ProductParams>) -> Json<ProductPage> {
    let mut query = CatalogQuery::with_criteria(s.config.page_size, p.criteria());
    query.set_sort(p.sort.unwrap_or_default());
    if let Some(q) = &p.q { query.set_search(q.as_str()); }
    query.set_page(p.page.unwrap_or(1));
    let result = query.run(&s.catalog, p.locale.unwrap_or_default());
    Json(ProductPage {
        products: owned(result.products), total: result.total, page: result.page,
        has_more: result.has_more, active_filters: result.active_filters,
    })
}

#[derive(Debug, Serialize)]
pub struct ProductDetail { pub product: Product, pub related: Vec<Product> }

async fn get_product(State(s): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<ProductDetail>> {
    let product = s.catalog.find_by_slug(&slug).ok_or_else(|| reject(StorefrontError::ProductNotFound(slug.clone())))?;
    Ok(Json(ProductDetail { product: product.clone(), related: owned(s.catalog.related(product)) }))
}

#[derive(Debug, Serialize)]
pub struct Offers { pub hot_deals: Vec<Product>, pub best_sellers: Vec<Product>, pub limited_stock: Vec<Product> }

async fn offers(State(s): State<AppState>) -> Json<Offers> {
    Json(Offers { hot_deals: owned(s.catalog.hot_deals()), best_sellers: owned(s.catalog.best_sellers()), limited_stock: owned(s.catalog.limited_stock()) })
}

#[derive(Debug, Deserialize)]
pub struct SearchParams { pub q: Option<String>, pub locale: Option<Locale> }

#[derive(Debug, Serialize)]
pub struct SearchResults { pub query: String, pub count: usize, pub results: Vec<Product> }

async fn search(State(s): State<AppState>, Query(p): Query<SearchParams>) -> Json<SearchResults> {
    let query = p.q.unwrap_or_default();
    let results = owned(catalog::search(s.catalog.products(), &query, p.locale.unwrap_or_default()));
    Json(SearchResults { query, count: results.len(), results })
}

#[derive(Debug, Serialize)]
pub struct Suggestion { pub slug: String, pub name: String, pub brand: String, pub price: Money }

async fn suggest(State(s): State<AppState>, Query(p): Query<SearchParams>) -> Json<Vec<Suggestion>> {
    let locale = p.locale.unwrap_or_default();
    let suggestions = catalog::suggest(s.catalog.products(), p.q.as_deref().unwrap_or_default(), locale)
        .into_iter()
        .map(|product| Suggestion {
            slug: product.slug().to_string(), name: product.name(locale).to_string(),
            brand: product.brand().to_string(), price: *product.price(),
        })
        .collect();
    Json(suggestions)
}

// =============================================================================
// Cart & checkout
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CartLine { pub product: Product, pub quantity: u32, pub line_total: Money }

#[derive(Debug, Serialize)]
pub struct CartView { pub items: Vec<CartLine>, pub total: Money, pub item_count: u32, pub persistent: bool }

impl<S: CartStorage> From<&CartStore<S>> for CartView {
    fn from(store: &CartStore<S>) -> Self {
        let items = store.entries().iter().map(|e| CartLine { product: e.product().clone(), quantity: e.quantity(), line_total: e.line_total() }).collect();
        Self { items, total: store.total(), item_count: store.item_count(), persistent: store.is_persistent() }
    }
}

/// Runs a cart operation off the async workers; commits may touch the disk.
async fn with_cart<T, F>(cart: &SharedCart, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut CartStore<Box<dyn CartStorage>>) -> T + Send + 'static,
{
    let mut store = cart.clone().lock_owned().await;
    tokio::task::spawn_blocking(move || op(&mut store))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

async fn get_cart(State(s): State<AppState>) -> Json<CartView> {
    let store = s.cart.lock().await;
    Json(CartView::from(&*store))
}

#[derive(Debug, Deserialize)] pub struct AddToCartRequest { pub product_id: String }

async fn add_to_cart(State(s): State<AppState>, Json(r): Json<AddToCartRequest>) -> ApiResult<(StatusCode, Json<CartView>)> {
    let product = s.catalog.require(&r.product_id).map_err(reject)?.clone();
    let view = with_cart(&s.cart, move |store| {
        store.add_item(&product);
        CartView::from(&*store)
    }).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[derive(Debug, Deserialize)] pub struct UpdateQuantityRequest { pub quantity: i64 }

async fn update_cart_item(State(s): State<AppState>, Path(id): Path<String>, Json(r): Json<UpdateQuantityRequest>) -> ApiResult<Json<CartView>> {
    with_cart(&s.cart, move |store| {
        store.update_quantity(&id, r.quantity);
        CartView::from(&*store)
    }).await.map(Json)
}

async fn remove_cart_item(State(s): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<CartView>> {
    with_cart(&s.cart, move |store| {
        store.remove_item(&id);
        CartView::from(&*store)
    }).await.map(Json)
}

async fn clear_cart(State(s): State<AppState>) -> ApiResult<StatusCode> {
    with_cart(&s.cart, |store| store.clear_cart()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub locale: Locale,
    #[serde(flatten)]
    pub details: CheckoutDetails,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse { pub order_id: String, pub item_count: u32, pub total: Money, pub message: String, pub whatsapp_link: String }

async fn checkout(State(s): State<AppState>, Json(r): Json<CheckoutRequest>) -> ApiResult<(StatusCode, Json<CheckoutResponse>)> {
    let order = with_cart(&s.cart, move |store| store.checkout(r.details, r.locale)).await?.map_err(reject)?;
    tracing::info!(order_id = %order.id(), total = %order.total(), locale = order.locale().as_str(), "Checkout link generated");
    Ok((StatusCode::CREATED, Json(CheckoutResponse {
        order_id: order.id().to_string(), item_count: order.item_count(), total: *order.total(),
        message: order.message(), whatsapp_link: order.deep_link(&s.config.whatsapp_number),
    })))
}
