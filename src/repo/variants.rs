use sqlx::PgPool;

use crate::domain::ProductVariant;
use crate::repo::StoreError;

/// Catalog lookup of product variants by their external code.
/// NOTE: Intended to facilitate easier testing/mocking
#[async_trait::async_trait]
pub trait VariantCatalog: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<ProductVariant>, StoreError>;
}

/// Postgres variant catalog
#[derive(Debug, Clone)]
pub struct PgVariantCatalog {
    pool: PgPool,
}

impl PgVariantCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VariantCatalog for PgVariantCatalog {
    #[tracing::instrument(name = "Find variant by code", skip(self))]
    async fn find_by_code(&self, code: &str) -> Result<Option<ProductVariant>, StoreError> {
        let variant =
            sqlx::query_as::<_, ProductVariant>("select * from product_variants where code=$1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(variant)
    }
}
