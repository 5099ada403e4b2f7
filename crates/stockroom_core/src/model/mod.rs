//! Inventory domain model.
//!
//! # Responsibility
//! - Define the canonical product record persisted by the store.
//! - Define request/confirmation shapes shared by every front-end.
//!
//! # Invariants
//! - Every product is identified by a `ProductId` assigned once at creation.
//! - Deletion is a hard delete; there are no tombstones.

pub mod product;
