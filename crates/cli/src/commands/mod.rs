//! CLI command implementations.

pub mod cart;
pub mod catalog;

use std::path::Path;
use std::sync::Arc;

use metalworks_core::{CurrencyCode, IdError, Product, ProductId};
use metalworks_storefront::cart::CartError;
use metalworks_storefront::catalog::{Catalog, CatalogError};
use metalworks_storefront::storage::{CartStorage, FileStorage, StorageError};
use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("cart storage: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("invalid product id: {0}")]
    InvalidId(#[from] IdError),

    #[error("no product with id {0} in the catalog")]
    UnknownProduct(ProductId),
}

/// Catalog and cart storage shared by the commands.
pub struct Context {
    pub catalog: Catalog,
    pub storage: Arc<dyn CartStorage>,
}

impl Context {
    /// Load the catalog and open the cart directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the directory
    /// cannot be created.
    pub fn open(
        catalog_path: &Path,
        data_dir: &Path,
        currency: CurrencyCode,
    ) -> Result<Self, CommandError> {
        Ok(Self {
            catalog: Catalog::load(catalog_path, currency)?,
            storage: Arc::new(FileStorage::open(data_dir)?),
        })
    }

    /// Look up a catalog product by its raw id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is blank or not in the catalog.
    pub fn product(&self, raw: &str) -> Result<Product, CommandError> {
        let id = ProductId::parse(raw)?;
        self.catalog
            .get_product_by_id(&id)
            .cloned()
            .ok_or(CommandError::UnknownProduct(id))
    }
}
