//! Port implementations for the SQLite database.
//!
//! This module contains the implementation of the catalog read port defined in
//! `procure-core` for the SQLite database backend.

mod catalog;
