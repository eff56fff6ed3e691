#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Core domain models for procurement optimization.
///
/// These are plain data structures with validation at their construction
/// boundaries. Every optimization run works against a snapshot built from
/// these types; nothing in this module talks to a store or performs a search.
pub mod models;

/// Interface traits for procurement optimization.
///
/// These are the "ports" of the hexagonal layout: the contract with the
/// external catalog store and the contract of an optimizer implementation.
/// Adapters (a SQLite reader, an in-memory JSON catalog, a branch-and-bound
/// optimizer) live in their own crates.
pub mod ports;
