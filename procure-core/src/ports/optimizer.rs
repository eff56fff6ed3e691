use crate::models::{Allocation, CatalogSnapshot, CurrencyCode, Deadline, ExchangeRates, LineItem};

/// Interface for procurement optimizers.
///
/// An optimizer assigns every line item to exactly one supplier holding an
/// eligible offer for it, minimizing the landed cost. It is a pure function of
/// its arguments: no I/O, no retained state between calls, and identical
/// inputs (without a deadline) yield identical allocations. Implementations
/// must be safe to share between threads running independent requests.
pub trait Optimizer: Send + Sync {
    /// Error type for optimization failures
    type Error: std::error::Error;

    /// Allocate `line_items` against `snapshot`.
    ///
    /// # Arguments
    ///
    /// - `line_items`: the shopping list, in order
    /// - `snapshot`: the eligible offers, loaded once before the call
    /// - `rates`: conversion factors into `reporting`
    /// - `reporting`: the currency all costs are compared in
    /// - `deadline`: when to stop and return the best assignment found so far
    fn optimize(
        &self,
        line_items: &[LineItem],
        snapshot: &CatalogSnapshot,
        rates: &ExchangeRates,
        reporting: CurrencyCode,
        deadline: &Deadline,
    ) -> Result<Allocation, Self::Error>;
}
