//! Cart Aggregate
//!
//! Pure state transitions over the cart entries. Persistence lives in
//! [`crate::store::CartStore`], which commits after every transition.

use serde::{Deserialize, Serialize};
use crate::domain::aggregates::Product;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{Money, Quantity};

#[derive(Clone, Debug, Default)]
pub struct Cart {
    entries: Vec<CartEntry>,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    product: Product,
    quantity: Quantity,
}

impl CartEntry {
    pub fn new(product: Product, quantity: Quantity) -> Self { Self { product, quantity } }
    pub fn product(&self) -> &Product { &self.product }
    pub fn product_id(&self) -> &str { self.product.id() }
    pub fn quantity(&self) -> u32 { self.quantity.value() }
    pub fn line_total(&self) -> Money { self.product.price().multiply(self.quantity.value()) }
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    /// Rebuilds a cart from stored entries. Duplicate product ids are merged
    /// into the first occurrence so the one-entry-per-product rule holds.
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut merged: Vec<CartEntry> = Vec::new();
        for entry in entries {
            match merged.iter_mut().find(|e| e.product_id() == entry.product_id()) {
                Some(existing) => {
                    let sum = existing.quantity.value().saturating_add(entry.quantity.value());
                    existing.quantity = Quantity::new(sum).unwrap_or(existing.quantity);
                }
                None => merged.push(entry),
            }
        }
        Self { entries: merged, events: vec![] }
    }

    pub fn entries(&self) -> &[CartEntry] { &self.entries }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn get(&self, product_id: &str) -> Option<&CartEntry> { self.entries.iter().find(|e| e.product_id() == product_id) }

    /// Sum of quantities across entries.
    pub fn item_count(&self) -> u32 {
        self.entries.iter().fold(0u32, |acc, e| acc.saturating_add(e.quantity()))
    }

    /// Sum of price × quantity across entries.
    pub fn total(&self) -> Money { self.entries.iter().map(CartEntry::line_total).sum() }

    pub fn add_item(&mut self, product: &Product) {
        let quantity = if let Some(existing) = self.entries.iter_mut().find(|e| e.product_id() == product.id()) {
            existing.quantity = existing.quantity.increment();
            existing.quantity.value()
        } else {
            self.entries.push(CartEntry::new(product.clone(), Quantity::ONE));
            1
        };
        self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded { product_id: product.id().to_string(), quantity }));
    }

    /// Returns `false` when no entry matched.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.product_id() != product_id);
        if self.entries.len() == before { return false; }
        self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { product_id: product_id.to_string() }));
        true
    }

    /// Quantities of zero or below remove the entry. Returns `false` when no entry matched.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> bool {
        let Some(quantity) = Quantity::from_requested(quantity) else {
            return self.remove_item(product_id);
        };
        let Some(entry) = self.entries.iter_mut().find(|e| e.product_id() == product_id) else {
            return false;
        };
        entry.quantity = quantity;
        self.raise_event(DomainEvent::Cart(CartEvent::QuantityUpdated { product_id: product_id.to_string(), quantity: quantity.value() }));
        true
    }

    pub fn clear(&mut self) {
        let entries = self.entries.len();
        self.entries.clear();
        self.raise_event(DomainEvent::Cart(CartEvent::Cleared { entries }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}
