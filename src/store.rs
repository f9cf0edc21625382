//! Cart Store
//!
//! Single owner of the cart. Every mutation is a pure transition on the
//! [`Cart`] aggregate followed by a commit of the whole cart record. The
//! in-memory cart is authoritative: a failed commit never touches it, and
//! every later mutation writes the whole cart again, so the stored record
//! catches up with the first write that succeeds.

use crate::domain::aggregates::{Cart, CartEntry, CheckoutDetails, Order, Product};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::Money;
use crate::storage::{decode_cart, encode_cart, CartStorage, CART_STORE_KEY};
use crate::{Locale, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Persistence {
    Active,
    /// The last write failed; the stored record may be stale.
    Degraded,
}

#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
    key: String,
    persistence: Persistence,
}

impl<S: CartStorage> CartStore<S> {
    /// Opens the store under the default record name, rehydrating any saved cart.
    pub fn open(storage: S) -> Self { Self::open_with_key(storage, CART_STORE_KEY) }

    /// Missing or unreadable records yield an empty cart.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = match storage.load(&key) {
            Ok(Some(raw)) => match decode_cart(&raw) {
                Ok(entries) => {
                    tracing::debug!(key = %key, entries = entries.len(), "Rehydrated cart");
                    Cart::from_entries(entries)
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding unreadable cart record");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cart storage unavailable, starting empty");
                Cart::new()
            }
        };
        Self { cart, storage, key, persistence: Persistence::Active }
    }

    pub fn entries(&self) -> &[CartEntry] { self.cart.entries() }
    pub fn is_empty(&self) -> bool { self.cart.is_empty() }
    pub fn is_persistent(&self) -> bool { self.persistence == Persistence::Active }
    pub fn storage(&self) -> &S { &self.storage }

    /// Σ price × quantity over the current entries.
    pub fn total(&self) -> Money { self.cart.total() }

    /// Σ quantity over the current entries.
    pub fn item_count(&self) -> u32 { self.cart.item_count() }

    pub fn add_item(&mut self, product: &Product) {
        self.cart.add_item(product);
        self.commit();
    }

    pub fn remove_item(&mut self, product_id: &str) {
        if self.cart.remove_item(product_id) { self.commit(); }
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if self.cart.update_quantity(product_id, quantity) { self.commit(); }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.commit();
    }

    /// Turns the cart into an order and empties it. Invalid details or an
    /// empty cart leave the cart untouched.
    pub fn checkout(&mut self, details: CheckoutDetails, locale: Locale) -> Result<Order> {
        let mut order = Order::place(details, self.cart.entries(), locale)?;
        for event in order.take_events() {
            tracing::info!(?event, "Order placed");
        }
        self.clear_cart();
        Ok(order)
    }

    fn commit(&mut self) {
        for event in self.cart.take_events() {
            log_event(&event);
        }

        let written = encode_cart(self.cart.entries()).and_then(|raw| self.storage.save(&self.key, &raw));
        match (written, self.persistence) {
            (Ok(()), Persistence::Active) => {}
            (Ok(()), Persistence::Degraded) => {
                tracing::info!(key = %self.key, "Cart persistence restored");
                self.persistence = Persistence::Active;
            }
            (Err(e), Persistence::Active) => {
                tracing::warn!(key = %self.key, error = %e, "Cart persistence failed, keeping cart in memory");
                self.persistence = Persistence::Degraded;
            }
            (Err(e), Persistence::Degraded) => {
                tracing::debug!(key = %self.key, error = %e, "Cart persistence still failing");
            }
        }
    }
}

fn log_event(event: &DomainEvent) { tracing::debug!(?event, "Cart event"); }
