//! Inventory use-case service.
//!
//! # Responsibility
//! - Expose the list/search, create, adjust and remove operations shared by
//!   every front-end.
//! - Apply the uniqueness policy to name-addressed mutations.
//!
//! # Invariants
//! - Every public operation reloads durable state before acting.
//! - A mutation either commits to the table and the durable file, or leaves
//!   both unchanged.
//! - Stock adjustments never produce a negative quantity.
//! - Operations on one service instance are serialized by a mutex held for
//!   the whole reload-resolve-commit sequence. Separate processes sharing the
//!   same file are not coordinated; the last writer wins.

use crate::model::product::{
    generate_product_id, NewProductRequest, Product, ProductId, ProductValidationError,
    RemovedProduct,
};
use crate::repo::product_repo::{LoadStatus, ProductRepository, ProductTable, RepoError};
use crate::search::resolver::{match_products, resolve, Resolution};
use log::{info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Operation that issued a name lookup; selects the not-found wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOperation {
    Search,
    Adjust,
    Remove,
}

/// Service error for inventory use-cases.
#[derive(Debug)]
pub enum InventoryError {
    /// Name query matched no product.
    NotFound {
        query: String,
        operation: LookupOperation,
    },
    /// Exact ID lookup found nothing.
    ProductNotFound(ProductId),
    /// Name query matched more than one product on a mutating operation.
    Ambiguous { query: String, names: Vec<String> },
    /// Adjustment would leave the quantity negative or out of range.
    InvalidAdjustment {
        product_name: String,
        current: i64,
        change: i64,
    },
    Validation(ProductValidationError),
    Repo(RepoError),
}

impl InventoryError {
    /// Quantity the rejected adjustment would have produced.
    fn attempted_quantity(current: i64, change: i64) -> i128 {
        i128::from(current) + i128::from(change)
    }
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { query, operation } => match operation {
                LookupOperation::Search => write!(f, "No products found matching '{query}'."),
                LookupOperation::Adjust => {
                    write!(f, "Product not found: '{query}'. Cannot adjust stock.")
                }
                LookupOperation::Remove => {
                    write!(f, "Product not found: '{query}'. Cannot remove.")
                }
            },
            Self::ProductNotFound(id) => write!(f, "Product with ID '{id}' not found."),
            Self::Ambiguous { query, names } => {
                let quoted = names
                    .iter()
                    .map(|name| format!("'{name}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Ambiguous product name: '{query}' matched multiple items: [{quoted}]. Please clarify."
                )
            }
            Self::InvalidAdjustment {
                product_name,
                current,
                change,
            } => {
                let attempted = Self::attempted_quantity(*current, *change);
                if attempted < 0 {
                    write!(
                        f,
                        "Cannot process adjustment. Stock level for '{product_name}' would be negative ({attempted})."
                    )
                } else {
                    write!(
                        f,
                        "Cannot process adjustment. Stock level for '{product_name}' would exceed the supported maximum ({attempted})."
                    )
                }
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InventoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for InventoryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ProductNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ProductValidationError> for InventoryError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Liveness summary for health probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryHealth {
    pub status: String,
    pub total_products: usize,
}

/// Use-case service over one product repository.
pub struct InventoryService<R: ProductRepository> {
    repo: Mutex<R>,
}

impl<R: ProductRepository> InventoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo: Mutex::new(repo),
        }
    }

    /// Consumes the service and returns the repository.
    pub fn into_inner(self) -> R {
        self.repo.into_inner()
    }

    /// Reloads durable state into the table.
    ///
    /// Corruption recovery is not an error here; it is returned as
    /// [`LoadStatus::RecoveredFromCorruption`] and logged at `warn`.
    pub fn refresh(&self) -> InventoryResult<LoadStatus> {
        let mut repo = self.repo.lock();
        refresh_locked(&mut *repo)
    }

    /// Lists all products, or those whose name contains `name_query`.
    ///
    /// # Contract
    /// - `None` or `Some("")` returns the whole table.
    /// - A non-empty query with no matches fails with `NotFound`.
    /// - Multiple matches are not an error on reads.
    pub fn list_or_search(&self, name_query: Option<&str>) -> InventoryResult<Vec<Product>> {
        let mut repo = self.repo.lock();
        refresh_locked(&mut *repo)?;

        let matches = match_products(repo.table(), name_query);
        match name_query {
            Some(query) if !query.is_empty() && matches.is_empty() => {
                Err(InventoryError::NotFound {
                    query: query.to_string(),
                    operation: LookupOperation::Search,
                })
            }
            _ => Ok(matches),
        }
    }

    /// Gets one product by exact ID.
    pub fn get_product(&self, product_id: &str) -> InventoryResult<Product> {
        let mut repo = self.repo.lock();
        refresh_locked(&mut *repo)?;
        Ok(repo.get(product_id)?.clone())
    }

    /// Creates a product with a generated ID and persists it.
    ///
    /// # Contract
    /// - Quantity and price sign are not checked; only a non-finite price is
    ///   rejected.
    /// - The generated ID is redrawn until it names no existing product.
    pub fn create(
        &self,
        name: impl Into<String>,
        initial_quantity: i64,
        unit_price: f64,
    ) -> InventoryResult<Product> {
        let mut product = Product::new(name, initial_quantity, unit_price);
        product.validate()?;

        let mut repo = self.repo.lock();
        refresh_locked(&mut *repo)?;
        while repo.table().contains(&product.product_id) {
            product.product_id = generate_product_id();
        }

        let snapshot = repo.table().clone();
        repo.table_mut().insert(product.clone());
        commit_locked(&mut *repo, snapshot)?;

        info!(
            "event=product_create module=service status=ok product_id={} quantity={}",
            product.product_id, product.quantity
        );
        Ok(product)
    }

    /// Creates a product from a front-end request model.
    pub fn create_from_request(&self, request: &NewProductRequest) -> InventoryResult<Product> {
        self.create(
            request.name.clone(),
            request.initial_quantity,
            request.unit_price,
        )
    }

    /// Adds `quantity_change` to the stock of the uniquely named product.
    ///
    /// # Contract
    /// - Zero matches fail with `NotFound`, two or more with `Ambiguous`.
    /// - A resulting quantity below zero fails with `InvalidAdjustment` and
    ///   changes nothing.
    /// - On success only `quantity` changes; ID, name and price are kept.
    pub fn adjust(&self, product_name: &str, quantity_change: i64) -> InventoryResult<Product> {
        let mut repo = self.repo.lock();
        refresh_locked(&mut *repo)?;

        let target = resolve_unique(&*repo, product_name, LookupOperation::Adjust)?;
        let new_quantity = match target.quantity.checked_add(quantity_change) {
            Some(quantity) if quantity >= 0 => quantity,
            _ => {
                warn!(
                    "event=product_adjust module=service status=rejected error_code=invalid_adjustment product_id={} change={}",
                    target.product_id, quantity_change
                );
                return Err(InventoryError::InvalidAdjustment {
                    product_name: target.name,
                    current: target.quantity,
                    change: quantity_change,
                });
            }
        };

        let updated = target.with_quantity(new_quantity);
        let snapshot = repo.table().clone();
        repo.table_mut().insert(updated.clone());
        commit_locked(&mut *repo, snapshot)?;

        info!(
            "event=product_adjust module=service status=ok product_id={} change={} quantity={}",
            updated.product_id, quantity_change, updated.quantity
        );
        Ok(updated)
    }

    /// Permanently removes the uniquely named product.
    pub fn remove(&self, product_name: &str) -> InventoryResult<RemovedProduct> {
        let mut repo = self.repo.lock();
        refresh_locked(&mut *repo)?;

        let target = resolve_unique(&*repo, product_name, LookupOperation::Remove)?;
        let snapshot = repo.table().clone();
        repo.table_mut().remove(&target.product_id);
        commit_locked(&mut *repo, snapshot)?;

        info!(
            "event=product_remove module=service status=ok product_id={}",
            target.product_id
        );
        Ok(RemovedProduct {
            product_id: target.product_id,
            name: target.name,
        })
    }

    /// Returns the number of products currently stored.
    pub fn health(&self) -> InventoryResult<InventoryHealth> {
        let mut repo = self.repo.lock();
        refresh_locked(&mut *repo)?;
        Ok(InventoryHealth {
            status: "healthy".to_string(),
            total_products: repo.table().len(),
        })
    }
}

fn refresh_locked<R: ProductRepository>(repo: &mut R) -> InventoryResult<LoadStatus> {
    let status = repo.load()?;
    if let LoadStatus::RecoveredFromCorruption { .. } = &status {
        warn!("event=store_refresh module=service status=warn error_code=corrupt_file_discarded");
    }
    Ok(status)
}

fn commit_locked<R: ProductRepository>(
    repo: &mut R,
    snapshot: ProductTable,
) -> InventoryResult<()> {
    if let Err(err) = repo.save() {
        *repo.table_mut() = snapshot;
        return Err(err.into());
    }
    Ok(())
}

fn resolve_unique<R: ProductRepository>(
    repo: &R,
    query: &str,
    operation: LookupOperation,
) -> InventoryResult<Product> {
    match resolve(repo.table(), query) {
        Resolution::Unique(product) => Ok(product),
        Resolution::NoMatch => Err(InventoryError::NotFound {
            query: query.to_string(),
            operation,
        }),
        Resolution::Ambiguous(products) => {
            warn!(
                "event=product_resolve module=service status=rejected error_code=ambiguous match_count={}",
                products.len()
            );
            Err(InventoryError::Ambiguous {
                query: query.to_string(),
                names: products.into_iter().map(|product| product.name).collect(),
            })
        }
    }
}
