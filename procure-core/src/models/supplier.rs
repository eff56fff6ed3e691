use super::{CurrencyCode, Money, SupplierId};
use thiserror::Error;

/// The commercial terms a supplier attaches to every order.
///
/// Amounts are in the supplier's native `currency`. Both amounts are
/// non-negative; this is enforced by [`SupplierTerms::new`] and on
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SupplierTermsDto", into = "SupplierTermsDto")
)]
pub struct SupplierTerms {
    currency: CurrencyCode,
    min_order: Money,
    min_shipping: Money,
}

/// The ways supplier terms may be invalid
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SupplierError {
    /// Minimum order amount below zero
    #[error("minimum order amount must be non-negative, got {0}")]
    NegativeMinimumOrder(Money),
    /// Shipping cost below zero
    #[error("minimum shipping cost must be non-negative, got {0}")]
    NegativeShipping(Money),
}

impl SupplierTerms {
    /// Validate and build a set of terms
    pub fn new(
        currency: CurrencyCode,
        min_order: Money,
        min_shipping: Money,
    ) -> Result<Self, SupplierError> {
        if min_order < Money::ZERO {
            return Err(SupplierError::NegativeMinimumOrder(min_order));
        }
        if min_shipping < Money::ZERO {
            return Err(SupplierError::NegativeShipping(min_shipping));
        }
        Ok(Self {
            currency,
            min_order,
            min_shipping,
        })
    }

    /// Native currency of the supplier
    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Minimum subtotal the supplier accepts, in native currency
    pub fn min_order(&self) -> Money {
        self.min_order
    }

    /// Flat shipping charge per order, in native currency
    pub fn min_shipping(&self) -> Money {
        self.min_shipping
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct SupplierTermsDto {
    currency: CurrencyCode,
    #[cfg_attr(feature = "serde", serde(default))]
    min_order: Money,
    #[cfg_attr(feature = "serde", serde(default))]
    min_shipping: Money,
}

impl TryFrom<SupplierTermsDto> for SupplierTerms {
    type Error = SupplierError;

    fn try_from(value: SupplierTermsDto) -> Result<Self, Self::Error> {
        Self::new(value.currency, value.min_order, value.min_shipping)
    }
}

impl From<SupplierTerms> for SupplierTermsDto {
    fn from(value: SupplierTerms) -> Self {
        Self {
            currency: value.currency,
            min_order: value.min_order,
            min_shipping: value.min_shipping,
        }
    }
}

/// A vendor that offers components.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Supplier {
    /// Unique identifier
    pub id: SupplierId,
    /// Display name
    pub name: String,
    /// Ordering terms
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub terms: SupplierTerms,
}
