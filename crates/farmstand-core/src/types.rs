//! # Domain Types
//!
//! Wire-level domain types shared by every layer of the Farmstand client.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Product      │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  role           │   │  farmer_id      │   │  status         │       │
//! │  │  phone          │   │  price (Money)  │   │  items[]        │       │
//! │  │  farmer_profile?│   │  stock, unit    │   │  total (Money)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    UserRole     │   │  OrderStatus    │   │ Recommendation  │       │
//! │  │  Customer       │   │  Pending ─┐     │   │  product_id     │       │
//! │  │  Farmer         │   │  Confirmed┘ ◄── │   │  score          │       │
//! │  │  Admin          │   │  cancellable    │   │  reason         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All records use camelCase field names on the wire; enum tags follow the
//! casing the API uses for each one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::{self, Money};

// =============================================================================
// Users
// =============================================================================

/// Role of an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Farmer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Farmer => "farmer",
            UserRole::Admin => "admin",
        }
    }

    /// Parses the persisted role flag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Some(UserRole::Customer),
            "farmer" => Some(UserRole::Farmer),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storefront details attached to farmer accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerProfile {
    pub business_name: String,

    /// Running average of customer ratings (0.0 - 5.0).
    #[serde(default)]
    pub rating: f64,

    /// A paused farmer's products are hidden from the catalog.
    #[serde(default)]
    pub is_paused: bool,
}

/// An authenticated account, cached on the device after login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub role: UserRole,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub farmer_profile: Option<FarmerProfile>,
}

impl User {
    pub fn is_farmer(&self) -> bool {
        self.role == UserRole::Farmer
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A product listed by a farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,

    /// Unit price, sent by the API as a decimal.
    #[serde(with = "money::as_major")]
    pub price: Money,

    /// Unit label ("kg", "bunch", "tray").
    pub unit: String,

    #[serde(default)]
    pub stock: i64,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub category_id: Option<String>,

    pub farmer_id: String,

    #[serde(default)]
    pub farmer_name: Option<String>,

    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// First image, used as the cart thumbnail.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn in_stock(&self) -> bool {
        self.is_available && self.stock > 0
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

// =============================================================================
// Orders
// =============================================================================

/// Lifecycle of an order.
///
/// ## State Machine
/// ```text
/// Pending ──► Confirmed ──► Processing ──► Shipped ──► Delivered
///    │            │
///    └────────────┴──► Cancelled   (customer cancel allowed here only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether the customer may still cancel.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment methods accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    #[default]
    Cod,
    Card,
    Upi,
    Netbanking,
    Wallet,
}

impl PaymentMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "COD" => Some(PaymentMethod::Cod),
            "CARD" => Some(PaymentMethod::Card),
            "UPI" => Some(PaymentMethod::Upi),
            "NETBANKING" => Some(PaymentMethod::Netbanking),
            "WALLET" => Some(PaymentMethod::Wallet),
            _ => None,
        }
    }
}

/// A line of a placed order. Price is a snapshot taken at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: u32,
    #[serde(with = "money::as_major")]
    pub price: Money,
    #[serde(default)]
    pub farmer_id: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub order_number: Option<String>,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    #[serde(with = "money::as_major")]
    pub total_amount: Money,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Recommendations
// =============================================================================

/// Which model produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationReason {
    /// Collaborative filtering.
    Cf,
    /// Content-based.
    Cb,
    Hybrid,
    /// Fallback when the user has no history.
    Popular,
}

/// One recommended product. `reasons` lists every model that proposed it;
/// the wire field is `reason` and may be a single tag or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(alias = "product_id")]
    pub product_id: String,
    pub score: f64,
    #[serde(rename = "reason", default, deserialize_with = "one_or_many")]
    pub reasons: Vec<RecommendationReason>,
}

impl Recommendation {
    pub fn has_reason(&self, reason: RecommendationReason) -> bool {
        self.reasons.contains(&reason)
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    #[serde(alias = "user_id")]
    pub user_id: String,
    pub items: Vec<Recommendation>,
    /// Model that produced the set, e.g. `hybrid` or `popular`.
    pub method: String,
}

// =============================================================================
// Chat
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_cancellable() {
        assert!(OrderStatus::Pending.is_cancellable());
        assert!(OrderStatus::Confirmed.is_cancellable());
        assert!(!OrderStatus::Processing.is_cancellable());
        assert!(!OrderStatus::Shipped.is_cancellable());
        assert!(!OrderStatus::Delivered.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_user_deserializes_camel_case() {
        let json = r#"{
            "id": "u1",
            "role": "farmer",
            "name": "Amina",
            "phone": "+254700000001",
            "avatarUrl": null,
            "isVerified": true,
            "farmerProfile": {"businessName": "Green Acres", "rating": 4.5, "isPaused": false}
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_farmer());
        assert!(user.is_verified);
        assert_eq!(user.farmer_profile.unwrap().business_name, "Green Acres");
    }

    #[test]
    fn test_product_price_parsed_to_cents() {
        let json = r#"{
            "id": "p1",
            "name": "Tomatoes",
            "price": 2.75,
            "unit": "kg",
            "stock": 12,
            "images": ["https://cdn.example/t.jpg"],
            "farmerId": "f1"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price.cents(), 275);
        assert!(product.is_available);
        assert!(product.in_stock());
        assert_eq!(product.primary_image(), Some("https://cdn.example/t.jpg"));
    }

    #[test]
    fn test_recommendation_reason_shapes() {
        let single: Recommendation =
            serde_json::from_str(r#"{"productId": "p1", "score": 0.9, "reason": "cf"}"#).unwrap();
        assert_eq!(single.reasons, vec![RecommendationReason::Cf]);

        let many: Recommendation = serde_json::from_str(
            r#"{"product_id": "p2", "score": 0.4, "reason": ["cf", "cb"]}"#,
        )
        .unwrap();
        assert_eq!(many.product_id, "p2");
        assert!(many.has_reason(RecommendationReason::Cb));
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cod).unwrap(),
            "\"COD\""
        );
        assert_eq!(PaymentMethod::parse("upi"), Some(PaymentMethod::Upi));
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("Farmer"), Some(UserRole::Farmer));
        assert_eq!(UserRole::parse(""), None);
    }
}
