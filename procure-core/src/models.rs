mod allocation;
mod catalog;
mod component;
mod currency;
mod deadline;
mod ids;
mod map;
mod offer;
mod shopping;
mod supplier;

pub use allocation::{
    Allocation, AllocationLine, Baseline, SearchStats, SearchStatus, Savings, SupplierCharge,
};
pub use catalog::{CatalogConfig, CatalogSnapshot, DataQualityWarning};
pub use component::Component;
pub use currency::{
    CurrencyCode, ExchangeRates, MONEY_SCALE, RateError, UnknownCurrency, round_money,
};
pub use deadline::{CancelToken, Deadline};
pub use ids::{BuildId, ComponentId, SupplierId};
pub use map::Map;
pub use offer::{Offer, OfferError, OfferRecord};
pub use shopping::{LineItem, LineItemError, ShoppingList};
pub use supplier::{Supplier, SupplierError, SupplierTerms};

/// Monetary amounts are exact decimals throughout.
pub type Money = rust_decimal::Decimal;
