//! Case-insensitive substring name matching.
//!
//! # Invariants
//! - An absent or empty query matches every product.
//! - Matches are returned in table order; there is no ranking.

use crate::model::product::Product;
use crate::repo::product_repo::ProductTable;

/// Result of resolving a name query to a single product.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NoMatch,
    Unique(Product),
    /// Two or more products matched; carries all of them in table order.
    Ambiguous(Vec<Product>),
}

/// Returns every product whose name contains `query`, ignoring case.
///
/// Whitespace is significant: `" "` is a non-empty query and only matches
/// names containing a space.
pub fn match_products(table: &ProductTable, query: Option<&str>) -> Vec<Product> {
    let needle = match query {
        None | Some("") => return table.iter().cloned().collect(),
        Some(query) => query.to_lowercase(),
    };

    table
        .iter()
        .filter(|product| product.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Resolves `query` and classifies the matches.
pub fn resolve(table: &ProductTable, query: &str) -> Resolution {
    let mut matches = match_products(table, Some(query));
    match matches.len() {
        0 => Resolution::NoMatch,
        1 => Resolution::Unique(matches.remove(0)),
        _ => Resolution::Ambiguous(matches),
    }
}
