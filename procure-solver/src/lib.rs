#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/**
 * Currency normalization of a catalog snapshot into the reporting currency.
 */
mod normalize;
pub use normalize::*;

/**
 * Pricing of a single supplier's bundle against its terms.
 */
mod evaluate;
pub use evaluate::*;

/**
 * The optimizer and the errors it reports.
 */
mod error;
pub use error::*;

mod optimizer;
pub use optimizer::*;

// The search itself is an implementation detail of the optimizer
mod explain;
mod problem;
mod search;

/**
 * A self-contained request format, for use from the command line or tests.
 */
#[cfg(feature = "io")]
pub mod io;

// We use non-std collections here for their ordering semantics and performance
pub(crate) type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
