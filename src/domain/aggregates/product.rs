//! Product Aggregate
//!
//! Products arrive from the catalog feed and are never mutated by the storefront.

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::Money;
use crate::{Locale, Localized};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: String,
    slug: String,
    name: Localized<String>,
    brand: String,
    #[serde(rename = "priceEGP")]
    price: Money,
    #[serde(rename = "oldPriceEGP", default, skip_serializing_if = "Option::is_none")]
    old_price: Option<Money>,
    #[serde(default)]
    images: Vec<String>,
    in_stock: bool,
    condition: Condition,
    grade: Grade,
    includes_charger: bool,
    keyboard_layout: KeyboardLayout,
    #[serde(default)]
    short_specs: Localized<Vec<String>>,
    specs: ProductSpecs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpecs {
    pub cpu: String,
    pub ram: String,
    pub storage: String,
    pub gpu: String,
    pub screen: String,
    pub battery: String,
    pub warranty: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    #[serde(rename = "imported-used")]
    ImportedUsed,
    #[serde(rename = "imported-refurbished")]
    ImportedRefurbished,
    #[serde(rename = "used")]
    Used,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade { #[default] A, B, C }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyboardLayout {
    #[serde(rename = "AR")]
    Ar,
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "AR-EN")]
    ArEn,
    #[default]
    Unknown,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::A, Grade::B, Grade::C];
}

impl KeyboardLayout {
    pub const ALL: [KeyboardLayout; 4] = [KeyboardLayout::Ar, KeyboardLayout::En, KeyboardLayout::ArEn, KeyboardLayout::Unknown];

    pub fn code(self) -> &'static str {
        match self {
            Self::Ar => "AR",
            Self::En => "EN",
            Self::ArEn => "AR-EN",
            Self::Unknown => "Unknown",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code().eq_ignore_ascii_case(code))
    }
}

impl Grade {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            _ => None,
        }
    }
}

impl Product {
    /// Creates an in-stock grade A product with empty specs. Catalog feeds
    /// normally deserialize products; this exists for assembling fixtures.
    pub fn new(id: impl Into<String>, slug: impl Into<String>, name: Localized<String>, brand: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(), slug: slug.into(), name, brand: brand.into(), price, old_price: None,
            images: vec![], in_stock: true, condition: Condition::default(), grade: Grade::default(),
            includes_charger: true, keyboard_layout: KeyboardLayout::default(),
            short_specs: Localized::default(), specs: ProductSpecs::default(), tags: vec![],
        }
    }

    pub fn with_old_price(mut self, old_price: Money) -> Self { self.old_price = Some(old_price); self }
    pub fn with_stock(mut self, in_stock: bool) -> Self { self.in_stock = in_stock; self }
    pub fn with_charger(mut self, includes_charger: bool) -> Self { self.includes_charger = includes_charger; self }
    pub fn with_grade(mut self, grade: Grade) -> Self { self.grade = grade; self }
    pub fn with_condition(mut self, condition: Condition) -> Self { self.condition = condition; self }
    pub fn with_keyboard(mut self, layout: KeyboardLayout) -> Self { self.keyboard_layout = layout; self }
    pub fn with_specs(mut self, specs: ProductSpecs) -> Self { self.specs = specs; self }
    pub fn with_tags<I: IntoIterator<Item = S>, S: Into<String>>(mut self, tags: I) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn slug(&self) -> &str { &self.slug }
    pub fn name(&self, locale: Locale) -> &str { self.name.get(locale) }
    pub fn names(&self) -> &Localized<String> { &self.name }
    pub fn brand(&self) -> &str { &self.brand }
    pub fn price(&self) -> &Money { &self.price }
    pub fn old_price(&self) -> Option<&Money> { self.old_price.as_ref() }
    pub fn images(&self) -> &[String] { &self.images }
    pub fn is_in_stock(&self) -> bool { self.in_stock }
    pub fn condition(&self) -> Condition { self.condition }
    pub fn grade(&self) -> Grade { self.grade }
    pub fn includes_charger(&self) -> bool { self.includes_charger }
    pub fn keyboard_layout(&self) -> KeyboardLayout { self.keyboard_layout }
    pub fn short_specs(&self, locale: Locale) -> &[String] { self.short_specs.get(locale) }
    pub fn specs(&self) -> &ProductSpecs { &self.specs }
    pub fn tags(&self) -> &[String] { &self.tags }
    pub fn has_tag(&self, tag: &str) -> bool { self.tags.iter().any(|t| t == tag) }

    /// Savings against the old price, when the product is discounted.
    pub fn discount(&self) -> Option<Money> {
        self.old_price.filter(|old| *old > self.price).map(|old| old.subtract(&self.price))
    }
}
