//! Durable key-value storage for the cart record.
//!
//! The cart is written as one named record, shaped
//! `{"state":{"items":[...]},"version":0}`. Anything that does not decode to
//! that shape is treated as absent by the cart store.

mod file;
mod memory;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::CartEntry;
use crate::{Result, StorefrontError};

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Fixed name of the persisted cart record.
pub const CART_STORE_KEY: &str = "hd-store-cart";

/// Layout version of the persisted cart record.
pub const CART_RECORD_VERSION: u32 = 0;

/// Client-local key-value storage.
pub trait CartStorage: Send {
    /// Reads a record; `Ok(None)` when it was never written.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces a record.
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>> { (**self).load(key) }
    fn save(&mut self, key: &str, value: &str) -> Result<()> { (**self).save(key, value) }
}

#[derive(Serialize, Deserialize)]
struct CartRecord<'a> {
    state: CartRecordState<'a>,
    version: u32,
}

#[derive(Serialize, Deserialize)]
struct CartRecordState<'a> {
    items: Cow<'a, [CartEntry]>,
}

pub fn encode_cart(entries: &[CartEntry]) -> Result<String> {
    let record = CartRecord { state: CartRecordState { items: Cow::Borrowed(entries) }, version: CART_RECORD_VERSION };
    Ok(serde_json::to_string(&record)?)
}

pub fn decode_cart(raw: &str) -> Result<Vec<CartEntry>> {
    let record: CartRecord<'static> = serde_json::from_str(raw)?;
    if record.version != CART_RECORD_VERSION {
        return Err(StorefrontError::Storage(format!("unsupported cart record version {}", record.version)));
    }
    Ok(record.state.items.into_owned())
}
