//! # Validation Module
//!
//! Checks run on user input before a request leaves the device.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shell input (CLI args, form fields)                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  THIS MODULE: cheap local checks, no network                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  farmstand-client endpoint call                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Server validation (authoritative, surfaced as ClientError::Server)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use farmstand_core::validation::{validate_phone, validate_otp_code};
//!
//! validate_phone("+254 700 000 001").unwrap();
//! validate_otp_code("123456").unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_CHAT_MESSAGE_LEN: usize = 2000;
pub const MAX_TOP_K: u32 = 100;

// =============================================================================
// Account
// =============================================================================

/// Validates a phone number.
///
/// ## Rules
/// - Optional leading `+`
/// - Spaces and hyphens are ignored
/// - 9 to 15 digits remain
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let mut digits = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' => {}
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "phone".to_string(),
                    reason: "must contain only digits".to_string(),
                })
            }
        }
    }

    if !(9..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must have between 9 and 15 digits".to_string(),
        });
    }
    Ok(())
}

/// Canonical form sent to the API: `+` and digits only.
pub fn normalize_phone(phone: &str) -> String {
    let phone = phone.trim();
    let mut out = String::with_capacity(phone.len());
    if phone.starts_with('+') {
        out.push('+');
    }
    out.extend(phone.chars().filter(char::is_ascii_digit));
    out
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    if len > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// One-time code: 4 to 8 ASCII digits.
pub fn validate_otp_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }
    if !(4..=8).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must be 4 to 8 digits".to_string(),
        });
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }
    Ok(())
}

// =============================================================================
// Catalog & Cart
// =============================================================================

pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }
    Ok(())
}

/// Listing prices must be strictly positive.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Quantity for a cart line or an order line.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if quantity > MAX_ITEM_QUANTITY as i64 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY as i64,
        });
    }
    Ok(())
}

pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Messaging & AI
// =============================================================================

pub fn validate_chat_message(content: &str) -> ValidationResult<()> {
    if content.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "message".to_string(),
        });
    }
    if content.chars().count() > MAX_CHAT_MESSAGE_LEN {
        return Err(ValidationError::TooLong {
            field: "message".to_string(),
            max: MAX_CHAT_MESSAGE_LEN,
        });
    }
    Ok(())
}

pub fn validate_top_k(top_k: u32) -> ValidationResult<()> {
    if !(1..=MAX_TOP_K).contains(&top_k) {
        return Err(ValidationError::OutOfRange {
            field: "topK".to_string(),
            min: 1,
            max: MAX_TOP_K as i64,
        });
    }
    Ok(())
}
