use crate::models::{BuildId, CatalogSnapshot, ComponentId, ShoppingList};
use std::future::Future;
use thiserror::Error;
use time::OffsetDateTime;

/// Domain-level reasons a catalog read cannot be satisfied.
///
/// These are caller errors (a reference to something the store has never
/// heard of) and are distinct from the repository's own `Error`, which covers
/// infrastructure failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogFailure {
    /// One or more requested components do not exist
    #[error("unknown components: {}", join(.0))]
    NotFound(Vec<ComponentId>),
    /// The requested build does not exist
    #[error("unknown build: {0}")]
    BuildNotFound(BuildId),
}

fn join(ids: &[ComponentId]) -> String {
    ids.iter()
        .map(ComponentId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read access to the external catalog store.
///
/// Implementations never write. Every call returns an owned snapshot so that
/// concurrent optimization runs do not share mutable state.
pub trait CatalogRepository {
    /// Infrastructure failures (connection loss, decoding errors, ...)
    type Error: std::error::Error;

    /// Load the eligible offers for exactly `component_ids`.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(snapshot)) with active, available and fresh offers, each
    ///   annotated with its supplier's terms, plus any data-quality warnings
    /// - Ok(Err(CatalogFailure::NotFound)) if a component id is unknown
    /// - Err(error) if the store could not be read
    fn load_offers(
        &self,
        component_ids: &[ComponentId],
        as_of: OffsetDateTime,
    ) -> impl Future<Output = Result<Result<CatalogSnapshot, CatalogFailure>, Self::Error>> + Send;

    /// Load the shopping list of a build.
    ///
    /// # Returns
    ///
    /// - Ok(Ok(list)) with the lines in entry order
    /// - Ok(Err(CatalogFailure::BuildNotFound)) if the build does not exist
    /// - Err(error) if the store could not be read
    fn load_shopping_list(
        &self,
        build_id: &BuildId,
    ) -> impl Future<Output = Result<Result<ShoppingList, CatalogFailure>, Self::Error>> + Send;
}
