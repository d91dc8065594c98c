//! # Cart
//!
//! The local shopping cart: line items plus the reducers over them.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add(item)            same product_id?  yes ──► qty += item.qty        │
//! │                                         no  ──► push (fresh line id)   │
//! │                                                                         │
//! │  set_quantity(id, n)  n ≤ 0 ──► remove(id)                              │
//! │                       n > 0 ──► items[id].qty = n                       │
//! │                                                                         │
//! │  remove(id)           filter out line id                                │
//! │                                                                         │
//! │  clear()              items = []                                        │
//! │                                                                         │
//! │  total()              Σ price × qty      item_count()  Σ qty            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Every line has quantity in `1..=MAX_ITEM_QUANTITY`
//! - At most one line per product id
//! - At most `MAX_CART_LINES` lines
//! - `total()` never overflows; `add` and `set_quantity` refuse changes that would
//! - A line built from a catalog product never exceeds that product's stock
//!
//! Persistence is not this module's concern; see `farmstand-client`'s
//! `CartStore`, which wraps a `Cart` and mirrors it after each mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the local cart.
///
/// Name, unit and price are frozen when the product is added, so the cart
/// renders consistently even if the catalog changes underneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Local line id (UUID v4), never sent to the server.
    pub id: String,
    pub product_id: String,
    pub name: String,
    /// Unit price snapshot in cents.
    pub price: Money,
    pub quantity: u32,
    pub unit: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub farmer_id: String,
    #[serde(default)]
    pub farmer_name: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// Input for [`Cart::add`].
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub product_id: String,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    pub unit: String,
    pub image_url: Option<String>,
    pub farmer_id: String,
    pub farmer_name: Option<String>,
    /// Units available; `None` skips the stock check.
    pub stock: Option<u64>,
}

impl NewCartItem {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        quantity: u32,
        unit: impl Into<String>,
        farmer_id: impl Into<String>,
    ) -> Self {
        NewCartItem {
            product_id: product_id.into(),
            name: name.into(),
            price,
            quantity,
            unit: unit.into(),
            image_url: None,
            farmer_id: farmer_id.into(),
            farmer_name: None,
            stock: None,
        }
    }

    /// Snapshot of a catalog product.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        NewCartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
            unit: product.unit.clone(),
            image_url: product.primary_image().map(str::to_string),
            farmer_id: product.farmer_id.clone(),
            farmer_name: product.farmer_name.clone(),
            stock: Some(product.stock.max(0) as u64),
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_farmer_name(mut self, name: impl Into<String>) -> Self {
        self.farmer_name = Some(name.into());
        self
    }

    pub fn with_stock(mut self, stock: u64) -> Self {
        self.stock = Some(stock);
        self
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Summary figures for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: u64,
    pub total: Money,
}

/// The local cart. Serialized as-is for the persisted mirror.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds a line, merging into an existing line for the same product.
    ///
    /// Returns the local line id that now holds the product.
    pub fn add(&mut self, item: NewCartItem) -> CoreResult<String> {
        if item.quantity == 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        if let Some(index) = self
            .items
            .iter()
            .position(|l| l.product_id == item.product_id)
        {
            let merged = self.items[index].quantity as u64 + item.quantity as u64;
            if merged > MAX_ITEM_QUANTITY as u64 {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            check_stock(&item, merged)?;
            let merged = merged as u32;
            self.check_total_with(Some(index), self.items[index].price, merged)?;

            let line = &mut self.items[index];
            line.quantity = merged;
            return Ok(line.id.clone());
        }

        if item.quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: item.quantity as u64,
                max: MAX_ITEM_QUANTITY,
            });
        }
        check_stock(&item, item.quantity as u64)?;
        self.check_total_with(None, item.price, item.quantity)?;
        if self.items.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let id = Uuid::new_v4().to_string();
        self.items.push(CartItem {
            id: id.clone(),
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            unit: item.unit,
            image_url: item.image_url,
            farmer_id: item.farmer_id,
            farmer_name: item.farmer_name,
            added_at: Utc::now(),
        });
        Ok(id)
    }

    /// Replaces a line's quantity. Zero or negative removes the line.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove(id).map(|_| ());
        }
        if quantity > MAX_ITEM_QUANTITY as i64 {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity as u64,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let index = self
            .items
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| CoreError::CartItemNotFound(id.to_string()))?;
        self.check_total_with(Some(index), self.items[index].price, quantity as u32)?;
        self.items[index].quantity = quantity as u32;
        Ok(())
    }

    /// Fails if the cart total would overflow with line `replacing` (or a new
    /// line when `None`) at `price × quantity`.
    fn check_total_with(
        &self,
        replacing: Option<usize>,
        price: Money,
        quantity: u32,
    ) -> CoreResult<()> {
        let line = price.checked_mul(quantity).ok_or(CoreError::AmountOverflow)?;
        self.items
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != replacing)
            .try_fold(line, |acc, (_, l)| {
                l.price
                    .checked_mul(l.quantity)
                    .and_then(|t| acc.checked_add(t))
            })
            .map(|_| ())
            .ok_or(CoreError::AmountOverflow)
    }

    /// Removes a line by local id, returning it.
    pub fn remove(&mut self, id: &str) -> CoreResult<CartItem> {
        let index = self
            .items
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| CoreError::CartItemNotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|l| l.id == id)
    }

    pub fn find_product(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|l| l.product_id == product_id)
    }

    /// Σ price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Σ quantity (not the number of lines).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| l.quantity as u64).sum()
    }

    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals {
            line_count: self.line_count(),
            item_count: self.item_count(),
            total: self.total(),
        }
    }
}

fn check_stock(item: &NewCartItem, requested: u64) -> CoreResult<()> {
    match item.stock {
        Some(available) if requested > available => Err(CoreError::InsufficientStock {
            product_id: item.product_id.clone(),
            requested,
            available,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Tests
// =============================================================================
