//! Order Aggregate
//!
//! An order is a snapshot of the cart plus the customer's contact details. It
//! is never stored: placing it renders a message for the seller and a WhatsApp
//! deep link carrying that message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};
use crate::domain::aggregates::CartEntry;
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::Money;
use crate::{Locale, Localized, Result, StorefrontError};

const WHATSAPP_BASE: &str = "https://wa.me/";

#[derive(Clone, Debug)]
pub struct Order {
    id: String,
    placed_at: DateTime<Utc>,
    locale: Locale,
    details: CheckoutDetails,
    items: Vec<LineItem>,
    total: Money,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineItem { pub product_id: String, pub name: String, pub quantity: u32, pub unit_price: Money, pub total: Money }

/// Contact form submitted at checkout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    #[validate(length(min = 3, max = 100, message = "validation.nameMin"))]
    pub full_name: String,
    #[validate(custom(function = "validate_phone", message = "validation.phoneInvalid"))]
    pub phone: String,
    #[validate(length(min = 1, message = "validation.centerRequired"))]
    pub center: String,
    #[validate(length(min = 10, max = 500, message = "validation.addressMin"))]
    pub address_details: String,
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Egyptian mobile number: `01` then `0`, `1`, `2` or `5`, then eight digits.
fn validate_phone(phone: &str) -> std::result::Result<(), ValidationError> {
    let bytes = phone.as_bytes();
    let valid = bytes.len() == 11
        && bytes.starts_with(b"01")
        && matches!(bytes.get(2), Some(b'0' | b'1' | b'2' | b'5'))
        && bytes.iter().all(u8::is_ascii_digit);
    if valid { Ok(()) } else { Err(ValidationError::new("phone")) }
}

#[derive(Clone, Copy, Debug)]
pub struct DeliveryCenter { pub code: &'static str, pub label: Localized<&'static str> }

pub static ASSIUT_CENTERS: [DeliveryCenter; 11] = [
    DeliveryCenter { code: "assiut-city", label: Localized { ar: "مدينة أسيوط", en: "Assiut City" } },
    DeliveryCenter { code: "dayrout", label: Localized { ar: "ديروط", en: "Dayrout" } },
    DeliveryCenter { code: "el-qusya", label: Localized { ar: "القوصية", en: "El Qusya" } },
    DeliveryCenter { code: "manfalut", label: Localized { ar: "منفلوط", en: "Manfalut" } },
    DeliveryCenter { code: "abnub", label: Localized { ar: "أبنوب", en: "Abnub" } },
    DeliveryCenter { code: "el-fateh", label: Localized { ar: "الفتح", en: "El Fateh" } },
    DeliveryCenter { code: "sahel-selim", label: Localized { ar: "ساحل سليم", en: "Sahel Selim" } },
    DeliveryCenter { code: "abou-tig", label: Localized { ar: "أبو تيج", en: "Abou Tig" } },
    DeliveryCenter { code: "el-ghanayem", label: Localized { ar: "الغنايم", en: "El Ghanayem" } },
    DeliveryCenter { code: "sedfa", label: Localized { ar: "صدفا", en: "Sedfa" } },
    DeliveryCenter { code: "el-badari", label: Localized { ar: "البداري", en: "El Badari" } },
];

/// Display name for a delivery center code; unknown codes are shown as given.
pub fn center_label(code: &str, locale: Locale) -> &str {
    ASSIUT_CENTERS.iter().find(|c| c.code == code).map_or(code, |c| *c.label.get(locale))
}

struct MessageLabels {
    header: &'static str,
    name: &'static str,
    phone: &'static str,
    center: &'static str,
    address: &'static str,
    landmark: &'static str,
    notes: &'static str,
    items: &'static str,
    total: &'static str,
    payment: &'static str,
    cash_on_delivery: &'static str,
}

static LABELS: Localized<MessageLabels> = Localized {
    ar: MessageLabels {
        header: "🛒 *طلب جديد من موقع HD Store*", name: "👤 *الاسم:*", phone: "📱 *الهاتف:*",
        center: "📍 *المركز:*", address: "🏠 *العنوان:*", landmark: "📌 *علامة مميزة:*",
        notes: "📝 *ملاحظات:*", items: "📦 *المنتجات:*", total: "💰 *الإجمالي:*",
        payment: "💵 *طريقة الدفع:*", cash_on_delivery: "الدفع عند الاستلام",
    },
    en: MessageLabels {
        header: "🛒 *New Order from HD Store Website*", name: "👤 *Name:*", phone: "📱 *Phone:*",
        center: "📍 *Center:*", address: "🏠 *Address:*", landmark: "📌 *Landmark:*",
        notes: "📝 *Notes:*", items: "📦 *Items:*", total: "💰 *Total:*",
        payment: "💵 *Payment:*", cash_on_delivery: "Cash on Delivery",
    },
};

impl Order {
    /// Validates the contact details and snapshots the cart entries.
    pub fn place(details: CheckoutDetails, entries: &[CartEntry], locale: Locale) -> Result<Self> {
        details.validate()?;
        if entries.is_empty() { return Err(StorefrontError::EmptyCart); }

        let items: Vec<LineItem> = entries.iter().map(|e| LineItem {
            product_id: e.product_id().to_string(),
            name: e.product().name(locale).to_string(),
            quantity: e.quantity(),
            unit_price: *e.product().price(),
            total: e.line_total(),
        }).collect();
        let total = items.iter().map(|i| i.total).sum();

        let mut order = Self {
            id: Uuid::now_v7().to_string(), placed_at: Utc::now(), locale, details, items, total, events: vec![],
        };
        let count = order.item_count();
        order.raise_event(DomainEvent::Order(OrderEvent::Placed { order_id: order.id.clone(), items: count, total }));
        Ok(order)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn placed_at(&self) -> DateTime<Utc> { self.placed_at }
    pub fn locale(&self) -> Locale { self.locale }
    pub fn details(&self) -> &CheckoutDetails { &self.details }
    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn total(&self) -> &Money { &self.total }
    pub fn item_count(&self) -> u32 { self.items.iter().fold(0u32, |acc, i| acc.saturating_add(i.quantity)) }

    /// Human-readable order summary in the order's language.
    pub fn message(&self) -> String {
        let l = LABELS.get(self.locale);
        let currency = Money::currency_label(self.locale);
        let d = &self.details;

        let mut msg = format!("{}\n\n", l.header);
        msg.push_str(&format!("{} {}\n", l.name, d.full_name));
        msg.push_str(&format!("{} {}\n", l.phone, d.phone));
        msg.push_str(&format!("{} {}\n", l.center, center_label(&d.center, self.locale)));
        msg.push_str(&format!("{} {}\n", l.address, d.address_details));
        if let Some(landmark) = d.landmark.as_deref().filter(|s| !s.trim().is_empty()) {
            msg.push_str(&format!("{} {}\n", l.landmark, landmark));
        }
        if let Some(notes) = d.notes.as_deref().filter(|s| !s.trim().is_empty()) {
            msg.push_str(&format!("{} {}\n", l.notes, notes));
        }

        msg.push_str("\n---\n");
        msg.push_str(&format!("{}\n", l.items));
        for item in &self.items {
            msg.push_str(&format!("• {} × {} = {} {}\n", item.name, item.quantity, item.total.format(), currency));
        }

        msg.push_str("\n---\n");
        msg.push_str(&format!("{} {} {}\n{} {}", l.total, self.total.format(), currency, l.payment, l.cash_on_delivery));
        msg
    }

    /// WhatsApp deep link pre-filled with [`Order::message`].
    pub fn deep_link(&self, whatsapp_number: &str) -> String { whatsapp_link(whatsapp_number, Some(&self.message())) }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

/// `https://wa.me/<number>` with an optional percent-encoded text payload.
pub fn whatsapp_link(whatsapp_number: &str, message: Option<&str>) -> String {
    match message.filter(|m| !m.is_empty()) {
        Some(text) => format!("{WHATSAPP_BASE}{whatsapp_number}?text={}", urlencoding::encode(text)),
        None => format!("{WHATSAPP_BASE}{whatsapp_number}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Cart, Product};

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            full_name: "Ahmed Ali".into(),
            phone: "01012345678".into(),
            center: "dayrout".into(),
            address_details: "12 Gomhoria Street, 3rd floor".into(),
            landmark: Some("Near the mosque".into()),
            notes: None,
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        let dell = Product::new("1", "dell", Localized::new("ديل 5520".into(), "Dell 5520".into()), "Dell", Money::egp(14500));
        let hp = Product::new("2", "hp", Localized::new("اتش بي 840".into(), "HP 840".into()), "HP", Money::egp(11500));
        cart.add_item(&dell);
        cart.add_item(&dell);
        cart.add_item(&hp);
        cart
    }

    #[test]
    fn test_order_workflow() {
        let mut order = Order::place(details(), cart().entries(), Locale::En).unwrap();
        assert_eq!(order.total(), &Money::egp(40500));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.items()[0].total, Money::egp(29000));
        let events = order.take_events();
        assert!(matches!(events.as_slice(), [DomainEvent::Order(OrderEvent::Placed { items: 3, .. })]));
    }

    #[test]
    fn test_english_message() {
        let order = Order::place(details(), cart().entries(), Locale::En).unwrap();
        let msg = order.message();
        assert!(msg.starts_with("🛒 *New Order from HD Store Website*\n\n"));
        assert!(msg.contains("📍 *Center:* Dayrout\n"));
        assert!(msg.contains("📌 *Landmark:* Near the mosque\n"));
        assert!(!msg.contains("Notes"));
        assert!(msg.contains("• Dell 5520 × 2 = 29,000 EGP\n"));
        assert!(msg.ends_with("💰 *Total:* 40,500 EGP\n💵 *Payment:* Cash on Delivery"));
    }

    #[test]
    fn test_arabic_message() {
        let order = Order::place(details(), cart().entries(), Locale::Ar).unwrap();
        let msg = order.message();
        assert!(msg.contains("📍 *المركز:* ديروط\n"));
        assert!(msg.contains("• اتش بي 840 × 1 = 11,500 ج.م\n"));
        assert!(msg.contains("الدفع عند الاستلام"));
    }

    #[test]
    fn test_unknown_center_shown_verbatim() {
        assert_eq!(center_label("somewhere", Locale::En), "somewhere");
        assert_eq!(center_label("sedfa", Locale::Ar), "صدفا");
    }

    #[test]
    fn test_invalid_details_rejected() {
        let mut bad = details();
        bad.phone = "0131234567".into();
        assert!(matches!(Order::place(bad, cart().entries(), Locale::En), Err(StorefrontError::InvalidCheckout(_))));

        let mut short = details();
        short.full_name = "Al".into();
        short.address_details = "short".into();
        match Order::place(short, cart().entries(), Locale::En) {
            Err(StorefrontError::InvalidCheckout(errors)) => {
                let fields = errors.field_errors();
                assert!(fields.contains_key("full_name"));
                assert!(fields.contains_key("address_details"));
            }
            other => panic!("expected InvalidCheckout, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(matches!(Order::place(details(), &[], Locale::En), Err(StorefrontError::EmptyCart)));
    }

    #[test]
    fn test_phone_rules() {
        for ok in ["01012345678", "01112345678", "01212345678", "01512345678"] { assert!(validate_phone(ok).is_ok(), "{ok}"); }
        for bad in ["01312345678", "0101234567", "010123456789", "2010123456a", ""] { assert!(validate_phone(bad).is_err(), "{bad}"); }
    }

    #[test]
    fn test_whatsapp_link() {
        assert_eq!(whatsapp_link("201066537666", None), "https://wa.me/201066537666");
        assert_eq!(whatsapp_link("201066537666", Some("")), "https://wa.me/201066537666");
        assert_eq!(whatsapp_link("201066537666", Some("a b\n")), "https://wa.me/201066537666?text=a%20b%0A");
        let order = Order::place(details(), cart().entries(), Locale::En).unwrap();
        let link = order.deep_link("201066537666");
        let encoded = link.strip_prefix("https://wa.me/201066537666?text=").unwrap();
        assert_eq!(urlencoding::decode(encoded).unwrap(), order.message());
    }
}
