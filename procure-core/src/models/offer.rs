use super::{ComponentId, Money, Supplier, SupplierId};
use thiserror::Error;
use time::OffsetDateTime;

/// A supplier's priced willingness to sell a component, as stored.
///
/// Stores may hold inactive (superseded) and unavailable rows; the catalog
/// reader filters those out before anything reaches the optimizer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OfferRecord {
    /// The selling supplier
    pub supplier_id: SupplierId,
    /// The component on offer
    pub component_id: ComponentId,
    /// Unit price in the supplier's native currency
    pub price: Money,
    /// Whether the supplier currently has stock
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub available: bool,
    /// Whether this is the current offer for the pair
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub active: bool,
    /// When the price was last refreshed
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub updated_at: OffsetDateTime,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

/// The ways an offer may be invalid
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OfferError {
    /// A price below zero
    #[error("offer of {component} by {supplier} has a negative price")]
    NegativePrice {
        /// The selling supplier
        supplier: SupplierId,
        /// The component on offer
        component: ComponentId,
    },
}

impl OfferRecord {
    /// Check the invariants a single row must satisfy on its own
    pub fn validate(&self) -> Result<(), OfferError> {
        if self.price < Money::ZERO {
            return Err(OfferError::NegativePrice {
                supplier: self.supplier_id.clone(),
                component: self.component_id.clone(),
            });
        }
        Ok(())
    }
}

/// An eligible offer, annotated with the terms of its supplier.
///
/// Only active, available and fresh offers are ever turned into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offer {
    /// The selling supplier, including its currency and ordering terms
    pub supplier: Supplier,
    /// The component on offer
    pub component_id: ComponentId,
    /// Unit price in the supplier's native currency
    pub price: Money,
    /// When the price was last refreshed
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub updated_at: OffsetDateTime,
}
