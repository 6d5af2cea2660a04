//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info, warn};

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, Pagination, ProductUpdate},
        errors::ProductsServiceError,
        records::{ProductId, ProductRecord},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, pagination).await?;

        tx.commit().await?;

        debug!(
            count = products.len(),
            skip = pagination.skip(),
            limit = pagination.limit(),
            "fetched products"
        );

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductId,
    ) -> Result<Option<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        if found.is_none() {
            debug!(product_id = %product, "product not found");
        }

        Ok(found)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        if self
            .repository
            .name_taken(&mut tx, &product.name, None)
            .await?
        {
            warn!(name = %product.name, "product name already exists");

            return Err(ProductsServiceError::AlreadyExists {
                name: product.name.into_inner(),
            });
        }

        let name = product.name.as_str();

        let created = self
            .repository
            .create_product(&mut tx, &product)
            .await
            .map_err(|error| ProductsServiceError::from_write(error, name))?;

        tx.commit()
            .await
            .map_err(|error| ProductsServiceError::from_write(error, name))?;

        info!(product_id = %created.id, name = %created.name, "created product");

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(current) = self.repository.lock_product(&mut tx, product).await? else {
            debug!(product_id = %product, "product not found for update");

            return Ok(None);
        };

        if let Some(name) = update
            .name
            .as_ref()
            .filter(|name| name.as_str() != current.name)
            && self
                .repository
                .name_taken(&mut tx, name, Some(product))
                .await?
        {
            warn!(product_id = %product, name = %name, "product name already exists");

            return Err(ProductsServiceError::AlreadyExists {
                name: name.as_str().to_owned(),
            });
        }

        let name = update
            .name
            .as_ref()
            .map_or(current.name.as_str(), |name| name.as_str());

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await
            .map_err(|error| ProductsServiceError::from_write(error, name))?;

        tx.commit()
            .await
            .map_err(|error| ProductsServiceError::from_write(error, name))?;

        info!(product_id = %product, "updated product");

        Ok(Some(updated))
    }

    async fn delete_product(&self, product: ProductId) -> Result<bool, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            debug!(product_id = %product, "product not found for deletion");

            return Ok(false);
        }

        tx.commit().await?;

        info!(product_id = %product, "deleted product");

        Ok(true)
    }
}

/// Product persistence operations.
///
/// Each call runs in its own transaction, which is rolled back when the call
/// fails. A missing product is reported as `None`/`false`, not as an error.
#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves a window of products ordered by ascending id.
    async fn list_products(
        &self,
        pagination: Pagination,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(
        &self,
        product: ProductId,
    ) -> Result<Option<ProductRecord>, ProductsServiceError>;

    /// Creates a new product, rejecting names that are already in use.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Applies the supplied fields of `update` and refreshes `updated_at`.
    async fn update_product(
        &self,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<ProductRecord>, ProductsServiceError>;

    /// Deletes a product, returning whether it existed.
    async fn delete_product(&self, product: ProductId) -> Result<bool, ProductsServiceError>;
}
