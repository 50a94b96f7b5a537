use chrono::Utc;

use tokio::sync::RwLock;

use uuid::Uuid;

use crate::domain::{EmailAddress, NewSubscription, ProductVariant, Subscription};
use crate::repo::{StoreError, SubscriptionStore, VariantCatalog};

/// In-memory subscription store, used by the test suites and local demos.
/// The write lock around insert closes the check-then-insert race the same
/// way the Postgres unique constraint does.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    records: RwLock<Vec<Subscription>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn insert(&self, new: &NewSubscription) -> Result<Subscription, StoreError> {
        let mut records = self.records.write().await;

        let duplicate = records.iter().any(|s| {
            s.email == new.email.as_ref() && s.product_variant_code == new.product_variant_code
        });
        if duplicate {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let subscription = Subscription {
            id: Uuid::new_v4(),
            email: new.email.as_ref().to_string(),
            customer_id: new.customer_id,
            product_variant_code: new.product_variant_code.clone(),
            channel_code: new.channel_code.clone(),
            locale_code: new.locale_code.clone(),
            token: new.token.as_ref().to_string(),
            created_at: now,
            updated_at: now,
        };
        records.push(subscription.clone());

        Ok(subscription)
    }

    async fn find_by_email_and_variant(
        &self,
        email: &EmailAddress,
        variant_code: &str,
    ) -> Result<Option<Subscription>, StoreError> {
        let records = self.records.read().await;
        let found = records
            .iter()
            .find(|s| s.email == email.as_ref() && s.product_variant_code == variant_code)
            .cloned();

        Ok(found)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Subscription>, StoreError> {
        let records = self.records.read().await;
        let found = records.iter().find(|s| s.token == token).cloned();

        Ok(found)
    }

    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Subscription>, StoreError> {
        let records = self.records.read().await;
        let found = records
            .iter()
            .filter(|s| s.customer_id == Some(customer_id))
            .cloned()
            .collect();

        Ok(found)
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.retain(|s| s.id != id);
        Ok(())
    }
}

/// In-memory variant catalog
#[derive(Debug, Default)]
pub struct InMemoryVariantCatalog {
    variants: Vec<ProductVariant>,
}

impl InMemoryVariantCatalog {
    pub fn new(variants: Vec<ProductVariant>) -> Self {
        Self { variants }
    }
}

#[async_trait::async_trait]
impl VariantCatalog for InMemoryVariantCatalog {
    async fn find_by_code(&self, code: &str) -> Result<Option<ProductVariant>, StoreError> {
        let found = self.variants.iter().find(|v| v.code == code).cloned();

        Ok(found)
    }
}
