//! JSON file-backed product repository.
//!
//! # Responsibility
//! - Load the product table from a single JSON object keyed by product ID.
//! - Rewrite the whole file after every committed mutation.
//!
//! # Invariants
//! - A missing file is an empty inventory, not an error.
//! - A file that is not valid JSON resets the table to empty and is reported
//!   as [`LoadStatus::RecoveredFromCorruption`] plus a `warn` log event.
//! - Valid JSON with the wrong shape, any entry failing product validation,
//!   or an entry whose key differs from its `product_id` is a fatal load
//!   error and leaves the table untouched.
//! - Saves write a sibling temp file and rename it over the target; a save
//!   that fails at any step leaves the previous file byte-for-byte intact.

use super::product_repo::{
    invalid_record, LoadStatus, ProductRepository, ProductTable, RepoError, RepoResult,
};
use crate::model::product::Product;
use indexmap::IndexMap;
use log::{error, info, warn};
use serde_json::error::Category;
use serde_json::Value;
use std::fs::File;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Repository persisting the product table to one JSON file.
#[derive(Debug)]
pub struct JsonFileProductRepository {
    path: PathBuf,
    table: ProductTable,
}

impl JsonFileProductRepository {
    /// Creates a repository for `path` with an empty table.
    ///
    /// Nothing is read until [`ProductRepository::load`] is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: ProductTable::new(),
        }
    }

    /// Creates a repository and performs the initial load.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<(Self, LoadStatus)> {
        let mut repo = Self::new(path);
        let status = repo.load()?;
        Ok((repo, status))
    }

    fn io_error(&self, source: std::io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ProductRepository for JsonFileProductRepository {
    fn load(&mut self) -> RepoResult<LoadStatus> {
        let started_at = Instant::now();

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.table.clear();
                info!(
                    "event=store_load module=repo status=ok mode=missing duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                return Ok(LoadStatus::Missing);
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=read_failed error={}",
                    err
                );
                return Err(self.io_error(err));
            }
        };

        let entries = match serde_json::from_str::<IndexMap<String, Value>>(&raw) {
            Ok(entries) => entries,
            Err(err) if matches!(err.classify(), Category::Syntax | Category::Eof) => {
                warn!(
                    "event=store_load module=repo status=warn error_code=corrupt_file line={} column={} action=reset_empty",
                    err.line(),
                    err.column()
                );
                self.table.clear();
                return Ok(LoadStatus::RecoveredFromCorruption {
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=invalid_shape error={}",
                    err
                );
                return Err(RepoError::InvalidData(err.to_string()));
            }
        };

        let table = parse_entries(entries).inspect_err(|err| {
            error!(
                "event=store_load module=repo status=error error_code=invalid_record error={}",
                err
            );
        })?;

        let count = table.len();
        self.table = table;
        info!(
            "event=store_load module=repo status=ok mode=file count={} duration_ms={}",
            count,
            started_at.elapsed().as_millis()
        );
        Ok(LoadStatus::Loaded { count })
    }

    fn save(&self) -> RepoResult<()> {
        let started_at = Instant::now();
        let payload = serde_json::to_string_pretty(&self.table)?;

        if let Err(err) = replace_file(&self.path, |file| file.write_all(payload.as_bytes())) {
            error!(
                "event=store_save module=repo status=error error_code=write_failed error={}",
                err
            );
            return Err(self.io_error(err));
        }

        info!(
            "event=store_save module=repo status=ok count={} duration_ms={}",
            self.table.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn table(&self) -> &ProductTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut ProductTable {
        &mut self.table
    }
}

/// Replaces `path` with whatever `write` puts into a fresh temp file in the
/// same directory.
fn replace_file(
    path: &Path,
    write: impl FnOnce(&mut File) -> io::Result<()>,
) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    write(temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn parse_entries(entries: IndexMap<String, Value>) -> RepoResult<ProductTable> {
    let mut table = ProductTable::new();
    for (key, value) in entries {
        let product: Product =
            serde_json::from_value(value).map_err(|err| invalid_record(&key, err))?;
        product.validate().map_err(|err| invalid_record(&key, err))?;
        if product.product_id != key {
            return Err(invalid_record(
                &key,
                format!("product_id `{}` does not match its key", product.product_id),
            ));
        }
        table.insert(product);
    }
    Ok(table)
}
