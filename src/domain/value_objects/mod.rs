//! Value Objects for the storefront

use rust_decimal::Decimal;
use rusty_money::{iso, Formatter, Params, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

use crate::Locale;

/// Money value object. The store trades in Egyptian pounds only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub const CURRENCY: &'static str = "EGP";

    pub fn new(amount: Decimal) -> Self { Self(amount) }
    pub fn egp(amount: i64) -> Self { Self(Decimal::from(amount)) }
    pub fn zero() -> Self { Self(Decimal::ZERO) }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
    pub fn add(&self, other: &Money) -> Money { Money(self.0 + other.0) }
    pub fn subtract(&self, other: &Money) -> Money { Money(self.0 - other.0) }
    pub fn multiply(&self, qty: u32) -> Money { Money(self.0 * Decimal::from(qty)) }

    /// Currency suffix shown next to prices.
    pub fn currency_label(locale: Locale) -> &'static str {
        match locale {
            Locale::Ar => "ج.م",
            Locale::En => Self::CURRENCY,
        }
    }

    /// Formats the whole-pound amount with en-US digit grouping, e.g. `14,500`.
    pub fn format(&self) -> String {
        let money = rusty_money::Money::from_decimal(self.0, iso::EGP);
        Formatter::money(&money, Params {
            digit_separator: ',',
            exponent_separator: '.',
            separator_pattern: &[3, 3, 3, 3, 3, 3],
            positions: &[Position::Sign, Position::Amount],
            rounding: Some(0),
            ..Params::default()
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.format()) }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc.add(&m))
    }
}

/// Quantity value object. A cart quantity is never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Maps a requested quantity onto a cart quantity; `None` means "remove".
    pub fn from_requested(value: i64) -> Option<Self> {
        if value <= 0 { return None; }
        Some(Self(u32::try_from(value).unwrap_or(u32::MAX)))
    }

    pub fn value(&self) -> u32 { self.0 }
    pub fn increment(&self) -> Self { Self(self.0.saturating_add(1)) }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;
    fn try_from(value: u32) -> Result<Self, Self::Error> { Quantity::new(value).ok_or(QuantityError::Zero) }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> u32 { q.0 }
}

#[derive(Debug, Clone)] pub enum QuantityError { Zero }
impl std::error::Error for QuantityError {}
impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Quantity must be at least 1") }
}
