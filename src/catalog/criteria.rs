//! Filter criteria and the predicates they compile to.
//!
//! A [`FilterCriteria`] is the filter panel's state. It compiles to a list of
//! [`Predicate`]s, one per restricted dimension, and a product is visible when
//! every predicate holds. Dimensions left at their default compile to nothing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{Grade, KeyboardLayout, Product};
use crate::domain::value_objects::Money;

/// Lower-case GPU name fragments that mark a dedicated graphics card.
pub const DEDICATED_GPU_VENDORS: [&str; 3] = ["nvidia", "radeon", "geforce"];

/// Inclusive price bounds; a missing bound is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<Money>,
    pub max: Option<Money>,
}

impl PriceRange {
    pub fn new(min: Option<Money>, max: Option<Money>) -> Self { Self { min, max } }
    pub fn between(min: Money, max: Money) -> Self { Self { min: Some(min), max: Some(max) } }
    pub fn is_unrestricted(&self) -> bool { self.min.is_none() && self.max.is_none() }

    pub fn contains(&self, price: &Money) -> bool {
        self.min.map_or(true, |min| *price >= min) && self.max.map_or(true, |max| *price <= max)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub brands: BTreeSet<String>,
    pub ram: BTreeSet<String>,
    pub cpu: BTreeSet<String>,
    pub screen: BTreeSet<String>,
    pub grades: BTreeSet<Grade>,
    pub keyboard: BTreeSet<KeyboardLayout>,
    pub in_stock_only: bool,
    pub includes_charger: bool,
    pub gpu_dedicated: bool,
    pub price: PriceRange,
}

/// One independent product test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    InStock,
    IncludesCharger,
    Brand(BTreeSet<String>),
    Grade(BTreeSet<Grade>),
    Keyboard(BTreeSet<KeyboardLayout>),
    Price(PriceRange),
    /// Any option is a substring of the RAM spec.
    Ram(Vec<String>),
    /// Any lower-cased family is a substring of the lower-cased CPU spec.
    CpuFamily(Vec<String>),
    /// Any option is a substring of the screen spec.
    ScreenSize(Vec<String>),
    DedicatedGpu,
}

impl Predicate {
    pub fn matches(&self, product: &Product) -> bool {
        let specs = product.specs();
        match self {
            Self::InStock => product.is_in_stock(),
            Self::IncludesCharger => product.includes_charger(),
            Self::Brand(brands) => brands.contains(product.brand()),
            Self::Grade(grades) => grades.contains(&product.grade()),
            Self::Keyboard(layouts) => layouts.contains(&product.keyboard_layout()),
            Self::Price(range) => range.contains(product.price()),
            Self::Ram(options) => options.iter().any(|r| specs.ram.contains(r.as_str())),
            Self::CpuFamily(families) => {
                let cpu = specs.cpu.to_lowercase();
                families.iter().any(|f| cpu.contains(f.as_str()))
            }
            Self::ScreenSize(sizes) => sizes.iter().any(|s| specs.screen.contains(s.as_str())),
            Self::DedicatedGpu => {
                let gpu = specs.gpu.to_lowercase();
                DEDICATED_GPU_VENDORS.iter().any(|v| gpu.contains(v))
            }
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self { Self::default() }

    /// Criteria seeded from a brand deep link.
    pub fn for_brand(brand: impl Into<String>) -> Self {
        let mut criteria = Self::default();
        criteria.brands.insert(brand.into());
        criteria
    }

    /// Predicates for every restricted dimension, flag checks first and
    /// substring scans last.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if self.in_stock_only { predicates.push(Predicate::InStock); }
        if self.includes_charger { predicates.push(Predicate::IncludesCharger); }
        if !self.brands.is_empty() { predicates.push(Predicate::Brand(self.brands.clone())); }
        if !self.grades.is_empty() { predicates.push(Predicate::Grade(self.grades.clone())); }
        if !self.keyboard.is_empty() { predicates.push(Predicate::Keyboard(self.keyboard.clone())); }
        if !self.price.is_unrestricted() { predicates.push(Predicate::Price(self.price)); }
        if !self.ram.is_empty() { predicates.push(Predicate::Ram(self.ram.iter().cloned().collect())); }
        if !self.cpu.is_empty() {
            predicates.push(Predicate::CpuFamily(self.cpu.iter().map(|c| c.to_lowercase()).collect()));
        }
        if !self.screen.is_empty() { predicates.push(Predicate::ScreenSize(self.screen.iter().cloned().collect())); }
        if self.gpu_dedicated { predicates.push(Predicate::DedicatedGpu); }
        predicates
    }

    pub fn matches(&self, product: &Product) -> bool { self.predicates().iter().all(|p| p.matches(product)) }

    pub fn is_unrestricted(&self) -> bool { self.predicates().is_empty() }

    /// Number of selected options plus enabled toggles. The price range is
    /// not counted.
    pub fn active_count(&self) -> usize {
        self.brands.len() + self.ram.len() + self.cpu.len() + self.screen.len() + self.grades.len() + self.keyboard.len()
            + usize::from(self.in_stock_only) + usize::from(self.includes_charger) + usize::from(self.gpu_dedicated)
    }

    pub fn toggle_brand(&mut self, brand: &str) { toggle(&mut self.brands, brand.to_string()); }
    pub fn toggle_ram(&mut self, ram: &str) { toggle(&mut self.ram, ram.to_string()); }
    pub fn toggle_cpu(&mut self, family: &str) { toggle(&mut self.cpu, family.to_string()); }
    pub fn toggle_screen(&mut self, size: &str) { toggle(&mut self.screen, size.to_string()); }
    pub fn toggle_grade(&mut self, grade: Grade) { toggle(&mut self.grades, grade); }
    pub fn toggle_keyboard(&mut self, layout: KeyboardLayout) { toggle(&mut self.keyboard, layout); }

    pub fn clear(&mut self) { *self = Self::default(); }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}
