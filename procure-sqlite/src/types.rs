//! Type definitions for the SQLite implementation.
//!
//! This module contains the public [`DateTime`] type and the internal row types
//! the catalog queries decode into. Rows hold the raw column values; converting
//! them into validated domain models is where malformed data is caught.

use procure_core::models::{
    Component, CurrencyCode, LineItem, Money, OfferRecord, Supplier, SupplierTerms,
};

mod datetime;
pub use datetime::DateTime;

type BoxDynError = Box<dyn std::error::Error + Send + Sync>;

fn decode_error(error: impl Into<BoxDynError>) -> sqlx::Error {
    sqlx::Error::Decode(error.into())
}

fn money(column: &str, value: &str) -> Result<Money, sqlx::Error> {
    value
        .trim()
        .parse::<Money>()
        .map_err(|error| decode_error(format!("{column}: invalid decimal {value:?}: {error}")))
}

#[derive(sqlx::FromRow)]
pub(crate) struct ComponentRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub specification: String,
}

impl From<ComponentRow> for Component {
    fn from(row: ComponentRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            category: row.category,
            brand: row.brand,
            specification: row.specification,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SupplierRow {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub min_order: String,
    pub min_shipping: String,
}

impl TryFrom<SupplierRow> for Supplier {
    type Error = sqlx::Error;

    fn try_from(row: SupplierRow) -> Result<Self, Self::Error> {
        let currency = row.currency.parse::<CurrencyCode>().map_err(decode_error)?;
        let terms = SupplierTerms::new(
            currency,
            money("min_order", &row.min_order)?,
            money("min_shipping", &row.min_shipping)?,
        )
        .map_err(decode_error)?;
        Ok(Self {
            id: row.id.into(),
            name: row.name,
            terms,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct OfferRow {
    pub supplier_id: String,
    pub component_id: String,
    pub price: String,
    pub available: bool,
    pub active: bool,
    pub updated_at: DateTime,
}

impl TryFrom<OfferRow> for OfferRecord {
    type Error = sqlx::Error;

    fn try_from(row: OfferRow) -> Result<Self, Self::Error> {
        Ok(Self {
            supplier_id: row.supplier_id.into(),
            component_id: row.component_id.into(),
            price: money("price", &row.price)?,
            available: row.available,
            active: row.active,
            updated_at: row.updated_at.into(),
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct BuildItemRow {
    pub component_id: String,
    pub quantity: i64,
}

impl TryFrom<BuildItemRow> for LineItem {
    type Error = sqlx::Error;

    fn try_from(row: BuildItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(decode_error)?;
        LineItem::new(row.component_id, quantity).map_err(decode_error)
    }
}
