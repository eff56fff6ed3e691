use crate::NormalizedTerms;
use procure_core::models::Money;
use thiserror::Error;

/// A sum or product of amounts left the range of exact decimal arithmetic.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("monetary amount exceeds the supported range")]
pub struct AmountOutOfRange;

/// The cost of ordering a set of lines from one supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bundle {
    /// The subtotal clears the minimum order amount
    Eligible {
        /// Sum of line totals
        subtotal: Money,
        /// Flat shipping charge
        shipping: Money,
        /// `subtotal + shipping`
        total: Money,
    },
    /// The subtotal falls short of the minimum order amount. This is not an
    /// error: the caller should try another subset or supplier.
    Ineligible {
        /// Sum of line totals
        subtotal: Money,
        /// How much more would have to be ordered
        shortfall: Money,
    },
}

impl Bundle {
    /// Sum of line totals, eligible or not
    pub fn subtotal(&self) -> Money {
        match self {
            Self::Eligible { subtotal, .. } | Self::Ineligible { subtotal, .. } => *subtotal,
        }
    }

    /// Landed cost, if the bundle may be ordered
    pub fn total(&self) -> Option<Money> {
        match self {
            Self::Eligible { total, .. } => Some(*total),
            Self::Ineligible { .. } => None,
        }
    }

    /// Does the bundle meet the minimum order amount?
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }
}

/// Evaluate the bundle of `lines`, given as (unit price, quantity) pairs in
/// the reporting currency, against a supplier's terms.
///
/// Shipping is a single flat charge, independent of how many lines are in the
/// bundle. A minimum order of zero is always met.
pub fn evaluate_bundle(
    terms: &NormalizedTerms,
    lines: impl IntoIterator<Item = (Money, u32)>,
) -> Result<Bundle, AmountOutOfRange> {
    let subtotal = lines
        .into_iter()
        .try_fold(Money::ZERO, |subtotal, (unit_price, quantity)| {
            unit_price
                .checked_mul(Money::from(quantity))
                .and_then(|line_total| subtotal.checked_add(line_total))
        })
        .ok_or(AmountOutOfRange)?;
    evaluate_subtotal(terms, subtotal)
}

/// Evaluate an already-summed subtotal against a supplier's terms.
pub fn evaluate_subtotal(
    terms: &NormalizedTerms,
    subtotal: Money,
) -> Result<Bundle, AmountOutOfRange> {
    if subtotal < terms.min_order {
        Ok(Bundle::Ineligible {
            subtotal,
            shortfall: terms.min_order - subtotal,
        })
    } else {
        Ok(Bundle::Eligible {
            subtotal,
            shipping: terms.shipping,
            total: subtotal.checked_add(terms.shipping).ok_or(AmountOutOfRange)?,
        })
    }
}
