//! Catalog query engine: filter, search, sort and paginate.
//!
//! Every function here is pure over its inputs. [`CatalogQuery`] carries the
//! per-session query state and resets pagination whenever the criteria,
//! the sort key or the search text change.

use serde::{Deserialize, Serialize};

use super::criteria::FilterCriteria;
use super::Catalog;
use crate::domain::aggregates::Product;
use crate::Locale;

/// Maximum number of autosuggest entries.
pub const SUGGESTION_LIMIT: usize = 5;

/// Autosuggest stays silent below this many characters.
const SUGGEST_MIN_CHARS: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Catalog order, which the feed keeps newest first.
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
}

pub fn filter<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    let predicates = criteria.predicates();
    products.iter().filter(|p| predicates.iter().all(|pred| pred.matches(p))).collect()
}

/// Stable sort; equal prices keep their relative order.
pub fn sort(products: &mut [&Product], key: SortKey) {
    match key {
        SortKey::Newest => {}
        SortKey::PriceLow => products.sort_by(|a, b| a.price().cmp(b.price())),
        SortKey::PriceHigh => products.sort_by(|a, b| b.price().cmp(a.price())),
    }
}

/// Search page results. A blank query finds nothing.
pub fn search<'a>(products: &'a [Product], query: &str, locale: Locale) -> Vec<&'a Product> {
    let query = query.trim().to_lowercase();
    if query.is_empty() { return vec![]; }
    products.iter().filter(|p| matches_search(p, &query, locale)).collect()
}

/// Autosuggest results: at most five, nothing until two characters are typed.
pub fn suggest<'a>(products: &'a [Product], query: &str, locale: Locale) -> Vec<&'a Product> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < SUGGEST_MIN_CHARS { return vec![]; }
    products
        .iter()
        .filter(|p| {
            let specs = p.specs();
            [p.name(locale), p.brand(), specs.cpu.as_str(), specs.ram.as_str()].iter().any(|field| field.to_lowercase().contains(&query))
        })
        .take(SUGGESTION_LIMIT)
        .collect()
}

fn matches_search(product: &Product, query: &str, locale: Locale) -> bool {
    let specs = product.specs();
    [product.name(locale), product.brand(), specs.cpu.as_str(), specs.ram.as_str(), specs.gpu.as_str(), product.slug()]
        .iter()
        .any(|field| field.to_lowercase().contains(query))
}

/// A growing window over a result list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total: usize,
    pub page: usize,
    pub has_more: bool,
}

/// The first `page_size × page` results. Pages below 1 count as page 1.
pub fn paginate<T>(results: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let page = page.max(1);
    let end = page_size.saturating_mul(page).min(results.len());
    Page { items: &results[..end], total: results.len(), page, has_more: end < results.len() }
}

/// Result of running a [`CatalogQuery`] against a catalog.
#[derive(Clone, Debug, Serialize)]
pub struct QueryResult<'a> {
    pub products: Vec<&'a Product>,
    pub total: usize,
    pub page: usize,
    pub has_more: bool,
    pub active_filters: usize,
    pub revision: u64,
}

/// Per-session catalog page state.
#[derive(Clone, Debug)]
pub struct CatalogQuery {
    criteria: FilterCriteria,
    sort: SortKey,
    search: String,
    page: usize,
    page_size: usize,
    revision: u64,
}

impl CatalogQuery {
    pub fn new(page_size: usize) -> Self {
        Self { criteria: FilterCriteria::default(), sort: SortKey::default(), search: String::new(), page: 1, page_size: page_size.max(1), revision: 0 }
    }

    /// Starts from pre-seeded criteria, e.g. a brand deep link.
    pub fn with_criteria(page_size: usize, criteria: FilterCriteria) -> Self {
        Self { criteria, ..Self::new(page_size) }
    }

    pub fn criteria(&self) -> &FilterCriteria { &self.criteria }
    pub fn sort_key(&self) -> SortKey { self.sort }
    pub fn search_text(&self) -> &str { &self.search }
    pub fn page(&self) -> usize { self.page }
    pub fn page_size(&self) -> usize { self.page_size }
    pub fn revision(&self) -> u64 { self.revision }
    pub fn active_filter_count(&self) -> usize { self.criteria.active_count() }

    pub fn update_criteria(&mut self, update: impl FnOnce(&mut FilterCriteria)) {
        update(&mut self.criteria);
        self.restart();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) { self.update_criteria(|c| *c = criteria); }
    pub fn clear_filters(&mut self) { self.update_criteria(FilterCriteria::clear); }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.restart();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.restart();
    }

    /// Widens the window by one page; earlier results stay in place.
    pub fn load_more(&mut self) {
        self.page = self.page.saturating_add(1);
        self.revision += 1;
    }

    /// Jumps straight to a window, e.g. one restored from a shared link.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
        self.revision += 1;
    }

    /// Whether `result` was computed from the current state.
    pub fn is_current(&self, result: &QueryResult<'_>) -> bool { result.revision == self.revision }

    pub fn run<'a>(&self, catalog: &'a Catalog, locale: Locale) -> QueryResult<'a> {
        let mut results = filter(catalog.products(), &self.criteria);
        let text = self.search.trim().to_lowercase();
        if !text.is_empty() {
            results.retain(|p| matches_search(p, &text, locale));
        }
        sort(&mut results, self.sort);

        let page = paginate(&results, self.page_size, self.page);
        QueryResult {
            products: page.items.to_vec(),
            total: page.total,
            page: page.page,
            has_more: page.has_more,
            active_filters: self.criteria.active_count(),
            revision: self.revision,
        }
    }

    fn restart(&mut self) {
        self.page = 1;
        self.revision += 1;
    }
}
