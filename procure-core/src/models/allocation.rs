use super::{ComponentId, CurrencyCode, DataQualityWarning, Money, SupplierId};

/// Whether the search proved its answer optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SearchStatus {
    /// The search space was exhausted
    Optimal,
    /// The deadline expired first; this is the best assignment found in time
    TimeBounded,
}

/// Counters describing how much work a search did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Partial assignments expanded
    pub nodes: u64,
    /// Branches cut by the cost bound or a minimum-order shortfall
    pub pruned: u64,
    /// Complete assignments evaluated
    pub leaves: u64,
    /// Times a strictly better assignment replaced the incumbent
    pub improvements: u64,
}

/// The decision for one line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationLine {
    /// Position of the line in the shopping list
    pub line: usize,
    /// The component bought
    pub component_id: ComponentId,
    /// The supplier it is bought from
    pub supplier_id: SupplierId,
    /// Units bought
    pub quantity: u32,
    /// Unit price in the reporting currency
    pub unit_price: Money,
    /// `unit_price * quantity`
    pub line_total: Money,
    /// The shipping charge of the chosen supplier for this run. Lines sharing
    /// a supplier share this single charge; it is not a per-line fee.
    pub shipping_charge: Money,
}

/// Everything ordered from one supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupplierCharge {
    /// The supplier
    pub supplier_id: SupplierId,
    /// Display name of the supplier
    pub name: String,
    /// Shopping-list positions fulfilled by this supplier
    pub lines: Vec<usize>,
    /// Minimum order amount, in the reporting currency
    pub min_order: Money,
    /// Sum of line totals
    pub subtotal: Money,
    /// Flat shipping charge
    pub shipping: Money,
    /// `subtotal + shipping`
    pub total: Money,
}

/// The reference an allocation's savings are measured against.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Baseline {
    /// Buying everything from the cheapest supplier able to cover the list alone
    SingleSupplier {
        /// The supplier
        supplier_id: SupplierId,
        /// Landed cost of the bundle
        cost: Money,
    },
    /// No single supplier covers the list; the costliest feasible split instead
    MostExpensiveSplit {
        /// Landed cost of that split
        cost: Money,
        /// False if the search for it was cut short by the deadline or its node budget
        exact: bool,
    },
}

impl Baseline {
    /// Landed cost of the baseline
    pub fn cost(&self) -> Money {
        match self {
            Self::SingleSupplier { cost, .. } | Self::MostExpensiveSplit { cost, .. } => *cost,
        }
    }
}

/// How much the allocation saves over its baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Savings {
    /// What we compare against
    pub baseline: Baseline,
    /// `baseline.cost() - allocation.total`
    pub amount: Money,
}

/// The result of one optimization run.
///
/// Allocations are created fresh per call and never updated; re-running the
/// optimizer produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    /// The currency every amount is expressed in
    pub reporting_currency: CurrencyCode,
    /// Optimal, or best-so-far when the deadline expired
    pub status: SearchStatus,
    /// Landed cost: all line totals plus one shipping charge per supplier used
    pub total: Money,
    /// One entry per shopping-list line, in list order
    pub lines: Vec<AllocationLine>,
    /// One entry per supplier used, ordered by supplier id
    pub suppliers: Vec<SupplierCharge>,
    /// Comparison with the baseline
    pub savings: Savings,
    /// Catalog problems found while loading the snapshot
    pub warnings: Vec<DataQualityWarning>,
    /// Search counters
    pub stats: SearchStats,
}
