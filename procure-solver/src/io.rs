use crate::{BranchAndBound, OptimizeError};
use procure_core::{
    models::{
        Allocation, BuildId, CatalogConfig, CatalogSnapshot, Component, ComponentId,
        CurrencyCode, Deadline, ExchangeRates, OfferRecord, ShoppingList, Supplier,
    },
    ports::{CatalogFailure, CatalogRepository, Optimizer},
};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, future::Future};
use thiserror::Error;
use time::OffsetDateTime;

/// A catalog carried inline in a request, in the shape a store would hold it.
///
/// The rows go through the same filtering as any other backend, so inactive,
/// unavailable, stale or duplicated offers in the file behave exactly as they
/// would in a database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineCatalog {
    /// Every known component
    #[serde(default)]
    pub components: Vec<Component>,
    /// Every known supplier
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    /// Raw offer rows
    #[serde(default)]
    pub offers: Vec<OfferRecord>,
    /// Stored shopping lists
    #[serde(default)]
    pub builds: Vec<ShoppingList>,
    /// Freshness policy
    #[serde(default)]
    pub config: CatalogConfig,
}

impl CatalogRepository for InlineCatalog {
    type Error = Infallible;

    fn load_offers(
        &self,
        component_ids: &[ComponentId],
        as_of: OffsetDateTime,
    ) -> impl Future<Output = Result<Result<CatalogSnapshot, CatalogFailure>, Self::Error>> + Send
    {
        let snapshot = CatalogSnapshot::assemble(
            component_ids,
            self.components.iter().cloned(),
            self.suppliers.iter().cloned(),
            self.offers.iter().cloned(),
            as_of,
            &self.config,
        );
        async move { Ok(snapshot) }
    }

    fn load_shopping_list(
        &self,
        build_id: &BuildId,
    ) -> impl Future<Output = Result<Result<ShoppingList, CatalogFailure>, Self::Error>> + Send
    {
        let list = self
            .builds
            .iter()
            .find(|list| &list.build_id == build_id)
            .cloned()
            .ok_or_else(|| CatalogFailure::BuildNotFound(build_id.clone()));
        async move { Ok(list) }
    }
}

/// A self-contained optimization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcurementRequest {
    /// The currency all costs are compared in
    pub reporting_currency: CurrencyCode,
    /// Multipliers into the reporting currency
    #[serde(default)]
    pub rates: ExchangeRates,
    /// What to buy
    pub shopping_list: ShoppingList,
    /// Where it can be bought
    pub catalog: InlineCatalog,
    /// The instant offer freshness is judged against (if omitted, now)
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub as_of: Option<OffsetDateTime>,
}

/// The ways a request can fail
#[derive(Debug, Error)]
pub enum RequestError {
    /// The catalog could not serve the shopping list
    #[error(transparent)]
    Catalog(#[from] CatalogFailure),
    /// The optimizer failed
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}

impl ProcurementRequest {
    /// Load the snapshot for the shopping list and optimize it
    pub async fn solve(
        &self,
        optimizer: &BranchAndBound,
        deadline: &Deadline,
    ) -> Result<Allocation, RequestError> {
        let as_of = self.as_of.unwrap_or_else(OffsetDateTime::now_utc);
        let component_ids = self.shopping_list.component_ids();

        let snapshot = match self.catalog.load_offers(&component_ids, as_of).await {
            Ok(result) => result?,
            Err(never) => match never {},
        };

        Ok(optimizer.optimize(
            &self.shopping_list.items,
            &snapshot,
            &self.rates,
            self.reporting_currency,
            deadline,
        )?)
    }
}
