use crate::{AmountOutOfRange, ConversionError, UnsupportedCurrency};
use procure_core::models::{ComponentId, CurrencyCode, Money};
use thiserror::Error;

/// Why a particular line could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum InfeasibleReason {
    /// No supplier has an eligible offer for the component
    NoOffers,
    /// Every supplier with an offer falls short of its minimum order amount
    /// even when given every line it could fulfill
    MinimumOrderUnreachable,
    /// Offers exist and minimums are individually reachable, but no
    /// combination satisfies all of them at once
    Conflict,
}

/// A line of the shopping list that no allocation can fulfill.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnfulfillableLine {
    /// Position in the shopping list
    pub line: usize,
    /// The component on that line
    pub component_id: ComponentId,
    /// Why it cannot be placed
    pub reason: InfeasibleReason,
}

/// No assignment of suppliers covers the whole shopping list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no feasible allocation: cannot fulfill {}", describe(.lines))]
pub struct InfeasibleOrder {
    /// The lines at fault
    pub lines: Vec<UnfulfillableLine>,
}

fn describe(lines: &[UnfulfillableLine]) -> String {
    lines
        .iter()
        .map(|line| format!("line {} ({})", line.line, line.component_id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The ways an optimization can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptimizeError {
    /// A price or term is in a currency with no exchange rate
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

    /// A price, term or total does not fit in exact decimal arithmetic
    #[error(transparent)]
    OutOfRange(#[from] AmountOutOfRange),

    /// A line item refers to a component missing from the snapshot
    #[error("line item references component {0}, which is not in the catalog snapshot")]
    UnknownComponent(ComponentId),

    /// No allocation exists
    #[error(transparent)]
    Infeasible(#[from] InfeasibleOrder),

    /// The deadline expired before any complete allocation was found
    #[error("deadline expired before a complete allocation was found")]
    DeadlineExpired,
}

impl From<ConversionError> for OptimizeError {
    fn from(value: ConversionError) -> Self {
        match value {
            ConversionError::UnsupportedCurrency(err) => Self::UnsupportedCurrency(err),
            ConversionError::ReportingRate { currency, rate } => {
                Self::ReportingRate { currency, rate }
            }
            ConversionError::OutOfRange(err) => Self::OutOfRange(err),
        }
    }
}
