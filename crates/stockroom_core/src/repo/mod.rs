//! Repository layer: the product table and its durable backing.
//!
//! # Responsibility
//! - Define the storage contract used by the inventory service.
//! - Keep file format and I/O details out of business orchestration.
//!
//! # Invariants
//! - Read paths reject records that fail schema validation instead of
//!   skipping them.
//! - A save always rewrites the full table; there is no append path.

pub mod json_file;
pub mod product_repo;
