//! Core inventory logic for stockroom.
//! This crate is the single source of truth for stock invariants; the HTTP
//! and tool-protocol front-ends only translate requests into its calls.

pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

use std::path::PathBuf;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::product::{
    generate_product_id, AdjustmentRequest, NewProductRequest, Product,
    ProductId, ProductValidationError, RemovedProduct,
};
pub use repo::json_file::JsonFileProductRepository;
pub use repo::product_repo::{
    LoadStatus, MemoryProductRepository, ProductRepository, ProductTable, RepoError, RepoResult,
};
pub use search::resolver::{match_products, resolve, Resolution};
pub use service::inventory_service::{
    InventoryError, InventoryHealth, InventoryResult, InventoryService, LookupOperation,
};

/// Inventory service over the JSON file store, as used by the front-ends.
pub type FileInventoryService = InventoryService<JsonFileProductRepository>;

/// Opens the inventory stored at `path` and performs the initial load.
///
/// A missing file yields an empty inventory. The returned status tells the
/// caller whether a corrupt file was discarded.
pub fn open_inventory(
    path: impl Into<PathBuf>,
) -> InventoryResult<(FileInventoryService, LoadStatus)> {
    let (repo, status) = JsonFileProductRepository::open(path)?;
    Ok((InventoryService::new(repo), status))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
