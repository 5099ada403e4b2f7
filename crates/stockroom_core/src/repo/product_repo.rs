//! Product table and repository contract.
//!
//! # Responsibility
//! - Hold products in an insertion-ordered in-memory table.
//! - Define the load/save contract shared by durable and volatile stores.
//!
//! # Invariants
//! - Table keys always equal the stored product's `product_id`.
//! - Replacing an entry keeps its position in iteration order.

use crate::model::product::{Product, ProductId};
use indexmap::IndexMap;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage error for product persistence and lookups.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
    /// The durable file parsed as JSON but is not a table of products.
    InvalidData(String),
    /// One persisted entry failed schema validation.
    InvalidRecord {
        key: String,
        message: String,
    },
    NotFound(ProductId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "inventory file I/O failed at `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize inventory: {err}"),
            Self::InvalidData(message) => write!(f, "invalid inventory data: {message}"),
            Self::InvalidRecord { key, message } => {
                write!(f, "invalid persisted product `{key}`: {message}")
            }
            Self::NotFound(id) => write!(f, "product not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::InvalidData(_) | Self::InvalidRecord { .. } | Self::NotFound(_) => None,
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Durable state was read; `count` products are now in the table.
    Loaded { count: usize },
    /// No durable file exists yet; the table is empty.
    Missing,
    /// The durable file was not valid JSON and the table was reset to empty.
    ///
    /// The file itself is left as-is until the next save overwrites it.
    RecoveredFromCorruption { reason: String },
}

impl LoadStatus {
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::RecoveredFromCorruption { .. })
    }
}

/// In-memory product table keyed by product ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProductTable {
    entries: IndexMap<ProductId, Product>,
}

impl ProductTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterates products in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or replaces the product stored under its `product_id`.
    ///
    /// Returns the replaced product, if any.
    pub fn insert(&mut self, product: Product) -> Option<Product> {
        self.entries.insert(product.product_id.clone(), product)
    }

    /// Removes a product while keeping the order of the remaining entries.
    pub fn remove(&mut self, id: &str) -> Option<Product> {
        self.entries.shift_remove(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<Product> for ProductTable {
    fn from_iter<T: IntoIterator<Item = Product>>(iter: T) -> Self {
        let mut table = Self::new();
        for product in iter {
            table.insert(product);
        }
        table
    }
}

/// Storage contract for the inventory table.
///
/// Implementations own the in-memory table; `load` replaces it with durable
/// state and `save` writes it back in full.
pub trait ProductRepository {
    /// Re-reads durable state into the table.
    ///
    /// On error the in-memory table is left unchanged.
    fn load(&mut self) -> RepoResult<LoadStatus>;
    /// Writes the whole table to durable storage.
    fn save(&self) -> RepoResult<()>;
    fn table(&self) -> &ProductTable;
    fn table_mut(&mut self) -> &mut ProductTable;

    fn get(&self, id: &str) -> RepoResult<&Product> {
        self.table()
            .get(id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    /// Returns all products in table order.
    fn all(&self) -> Vec<Product> {
        self.table().iter().cloned().collect()
    }
}

/// Volatile repository with no durable backing.
#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    table: ProductTable,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository with existing products.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            table: products.into_iter().collect(),
        }
    }
}

impl ProductRepository for MemoryProductRepository {
    fn load(&mut self) -> RepoResult<LoadStatus> {
        Ok(LoadStatus::Loaded {
            count: self.table.len(),
        })
    }

    fn save(&self) -> RepoResult<()> {
        Ok(())
    }

    fn table(&self) -> &ProductTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut ProductTable {
        &mut self.table
    }
}

pub(crate) fn invalid_record(key: &str, err: impl Display) -> RepoError {
    RepoError::InvalidRecord {
        key: key.to_string(),
        message: err.to_string(),
    }
}
