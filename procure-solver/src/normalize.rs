use crate::{AmountOutOfRange, Map};
use procure_core::models::{
    CatalogSnapshot, ComponentId, CurrencyCode, ExchangeRates, Money, SupplierId, round_money,
};
use thiserror::Error;

/// An amount is in a currency the caller supplied no rate for.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no exchange rate from {currency} into {reporting}")]
pub struct UnsupportedCurrency {
    /// The currency without a rate
    pub currency: CurrencyCode,
    /// The reporting currency
    pub reporting: CurrencyCode,
}

/// Why an amount could not be expressed in the reporting currency.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The amount's currency has no rate
    #[error(transparent)]
    UnsupportedCurrency(#[from] UnsupportedCurrency),

    /// The rate table lists the reporting currency at something other than one
    #[error("exchange rate for the reporting currency {currency} must be 1, got {rate}")]
    ReportingRate {
        /// The reporting currency
        currency: CurrencyCode,
        /// The rate the table gives it
        rate: Money,
    },

    /// The converted amount does not fit in a decimal
    #[error(transparent)]
    OutOfRange(#[from] AmountOutOfRange),
}

fn rate(
    currency: CurrencyCode,
    rates: &ExchangeRates,
    reporting: CurrencyCode,
) -> Result<Money, UnsupportedCurrency> {
    rates
        .rate(currency, reporting)
        .ok_or(UnsupportedCurrency {
            currency,
            reporting,
        })
}

/// Convert a native amount into the reporting currency, rounded once.
pub fn to_reporting(
    amount: Money,
    currency: CurrencyCode,
    rates: &ExchangeRates,
    reporting: CurrencyCode,
) -> Result<Money, ConversionError> {
    let rate = rate(currency, rates, reporting)?;
    let converted = amount.checked_mul(rate).ok_or(AmountOutOfRange)?;
    Ok(round_money(converted))
}

/// Convert a reporting-currency amount back into `currency`, rounded once.
///
/// This is the inverse of [`to_reporting`] up to one unit of the final digit
/// for rates of order one.
pub fn from_reporting(
    amount: Money,
    currency: CurrencyCode,
    rates: &ExchangeRates,
    reporting: CurrencyCode,
) -> Result<Money, ConversionError> {
    let rate = rate(currency, rates, reporting)?;
    let converted = amount.checked_div(rate).ok_or(AmountOutOfRange)?;
    Ok(round_money(converted))
}

/// A supplier's ordering terms expressed in the reporting currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedTerms {
    /// Minimum order amount
    pub min_order: Money,
    /// Flat shipping charge
    pub shipping: Money,
}

/// A supplier after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSupplier {
    /// Identifier
    pub id: SupplierId,
    /// Display name
    pub name: String,
    /// The currency the supplier prices in
    pub native_currency: CurrencyCode,
    /// Terms in the reporting currency
    pub terms: NormalizedTerms,
}

/// An offer after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOffer {
    /// The selling supplier
    pub supplier_id: SupplierId,
    /// The component on offer
    pub component_id: ComponentId,
    /// The price as listed by the supplier
    pub native_price: Money,
    /// The price in the reporting currency
    pub unit_price: Money,
}

/// Every offer and supplier of a snapshot, in one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCatalog {
    /// The currency every amount is expressed in
    pub reporting: CurrencyCode,
    /// Suppliers with at least one offer, in first-seen order
    pub suppliers: Map<SupplierId, NormalizedSupplier>,
    /// Offers, in snapshot order
    pub offers: Vec<NormalizedOffer>,
}

/// Normalize every price and every supplier term of `snapshot`.
///
/// Fails on the first amount whose currency has no rate; nothing is ever
/// converted at an assumed rate. An explicit entry for the reporting currency
/// is only accepted if it is exactly one.
pub fn normalize(
    snapshot: &CatalogSnapshot,
    rates: &ExchangeRates,
    reporting: CurrencyCode,
) -> Result<NormalizedCatalog, ConversionError> {
    if let Some((_, &rate)) = rates.iter().find(|(currency, _)| **currency == reporting) {
        if rate != Money::ONE {
            return Err(ConversionError::ReportingRate {
                currency: reporting,
                rate,
            });
        }
    }

    let mut suppliers = Map::<SupplierId, NormalizedSupplier>::default();
    let mut offers = Vec::with_capacity(snapshot.offers.len());

    for offer in snapshot.offers.iter() {
        let terms = &offer.supplier.terms;
        let currency = terms.currency();

        if !suppliers.contains_key(&offer.supplier.id) {
            let normalized = NormalizedSupplier {
                id: offer.supplier.id.clone(),
                name: offer.supplier.name.clone(),
                native_currency: currency,
                terms: NormalizedTerms {
                    min_order: to_reporting(terms.min_order(), currency, rates, reporting)?,
                    shipping: to_reporting(terms.min_shipping(), currency, rates, reporting)?,
                },
            };
            suppliers.insert(offer.supplier.id.clone(), normalized);
        }

        offers.push(NormalizedOffer {
            supplier_id: offer.supplier.id.clone(),
            component_id: offer.component_id.clone(),
            native_price: offer.price,
            unit_price: to_reporting(offer.price, currency, rates, reporting)?,
        });
    }

    Ok(NormalizedCatalog {
        reporting,
        suppliers,
        offers,
    })
}
