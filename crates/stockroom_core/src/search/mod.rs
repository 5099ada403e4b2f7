//! Product name resolution.
//!
//! # Responsibility
//! - Match free-text name queries against the product table.
//! - Classify matches for the uniqueness policy of mutating operations.

pub mod resolver;
