//! Product record model.
//!
//! # Responsibility
//! - Define the product record stored in the inventory table.
//! - Generate product IDs in the `P-XXXXXXXX` format.
//!
//! # Invariants
//! - `product_id` never changes after creation.
//! - `unit_price` must be finite so the record survives a JSON round-trip.
//! - Quantity sign is not checked here; the non-negative stock rule is enforced
//!   by stock adjustments in the service layer.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a product, e.g. `P-1A2B3C4D`.
pub type ProductId = String;

const PRODUCT_ID_PREFIX: &str = "P-";
const PRODUCT_ID_HEX_LEN: usize = 8;

/// Validation error for product records.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    /// `unit_price` is NaN or infinite.
    NonFinitePrice(f64),
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinitePrice(value) => {
                write!(f, "unit_price must be a finite number, got {value}")
            }
        }
    }
}

impl Error for ProductValidationError {}

/// One inventory entry.
///
/// Field names are the durable JSON layout; do not rename them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    /// Units in stock.
    pub quantity: i64,
    pub unit_price: f64,
}

impl Product {
    /// Creates a product with a freshly generated ID.
    ///
    /// The ID is not checked against existing records; collisions are left to
    /// the randomness of the underlying UUID.
    pub fn new(name: impl Into<String>, quantity: i64, unit_price: f64) -> Self {
        Self::with_id(generate_product_id(), name, quantity, unit_price)
    }

    /// Creates a product with a caller-provided ID.
    ///
    /// Used by load paths where identity already exists in the durable file.
    pub fn with_id(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        quantity: i64,
        unit_price: f64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if !self.unit_price.is_finite() {
            return Err(ProductValidationError::NonFinitePrice(self.unit_price));
        }
        Ok(())
    }

    /// Returns a copy of this product with only `quantity` replaced.
    pub fn with_quantity(&self, quantity: i64) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// Generates a product ID: `P-` followed by 8 uppercase hex characters taken
/// from a random v4 UUID.
pub fn generate_product_id() -> ProductId {
    let hex = Uuid::new_v4().simple().to_string();
    format!(
        "{PRODUCT_ID_PREFIX}{}",
        hex[..PRODUCT_ID_HEX_LEN].to_ascii_uppercase()
    )
}

/// Returns whether `value` has the shape produced by [`generate_product_id`].
#[cfg(test)]
fn is_generated_product_id(value: &str) -> bool {
    let Some(hex) = value.strip_prefix(PRODUCT_ID_PREFIX) else {
        return false;
    };
    hex.len() == PRODUCT_ID_HEX_LEN
        && hex
            .chars()
            .all(|ch| ch.is_ascii_digit() || ('A'..='F').contains(&ch))
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProductRequest {
    pub name: String,
    pub initial_quantity: i64,
    pub unit_price: f64,
}

/// Input for a stock adjustment.
///
/// `quantity_change` is positive to restock and negative for sales or losses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    pub product_name: String,
    pub quantity_change: i64,
}

/// Confirmation returned after a product has been removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedProduct {
    pub product_id: ProductId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::{generate_product_id, is_generated_product_id, Product, ProductValidationError};

    #[test]
    fn generated_ids_have_prefix_and_uppercase_hex() {
        for _ in 0..32 {
            let id = generate_product_id();
            assert!(is_generated_product_id(&id), "unexpected id shape: {id}");
        }
    }

    #[test]
    fn id_shape_check_rejects_lowercase_and_short_ids() {
        assert!(!is_generated_product_id("P-001"));
        assert!(!is_generated_product_id("P-1a2b3c4d"));
        assert!(!is_generated_product_id("X-1A2B3C4D"));
        assert!(is_generated_product_id("P-1A2B3C4D"));
    }

    #[test]
    fn validate_rejects_nan_price_but_accepts_negative_values() {
        let negative = Product::new("refund voucher", -5, -1.25);
        assert!(negative.validate().is_ok());

        let nan = Product::new("broken", 1, f64::NAN);
        assert!(matches!(
            nan.validate(),
            Err(ProductValidationError::NonFinitePrice(_))
        ));
    }

    #[test]
    fn with_quantity_keeps_identity_and_price() {
        let product = Product::with_id("P-00000001", "Widget", 10, 2.5);
        let updated = product.with_quantity(7);
        assert_eq!(updated.product_id, "P-00000001");
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.unit_price, 2.5);
    }
}
