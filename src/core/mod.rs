//! Core business logic - framework-agnostic ledger operations.
//!
//! The write path lives in [`ledger::LedgerEngine`]; catalog and audit reads are
//! plain functions over a [`sea_orm::DatabaseConnection`]. Nothing in here knows
//! about transports or sessions: callers pass a resolved [`principal::Principal`]
//! into every write.

/// Audit log read path and dashboard aggregates
pub mod audit;
/// Item catalog operations
pub mod item;
/// Ledger engine - the invariant-preserving movement write path
pub mod ledger;
/// Per-item write serialization
pub mod locks;
/// Consumed access-control identity
pub mod principal;
