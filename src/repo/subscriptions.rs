use uuid::Uuid;

use sqlx::PgPool;

use crate::domain::{EmailAddress, NewSubscription, Subscription};
use crate::repo::StoreError;

/// Keyed store of subscription records.
/// NOTE: Intended to facilitate easier testing/mocking
/// TODO: Swap async-trait for std async traits when those become stable
/// https://github.com/orgs/rust-lang/projects/28/views/2?pane=issue&itemId=21990165
#[async_trait::async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert a new subscription and return the stored record.
    /// A `(email, variant)` conflict is reported as [`StoreError::Duplicate`].
    async fn insert(&self, new: &NewSubscription) -> Result<Subscription, StoreError>;

    /// Fetch the subscription for a `(email, variant)` pair, if any
    async fn find_by_email_and_variant(
        &self,
        email: &EmailAddress,
        variant_code: &str,
    ) -> Result<Option<Subscription>, StoreError>;

    /// Fetch the subscription addressed by a deletion token, if any
    async fn find_by_token(&self, token: &str) -> Result<Option<Subscription>, StoreError>;

    /// Fetch all subscriptions owned by a customer, in insertion order
    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Subscription>, StoreError>;

    /// Remove a subscription by ID
    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Postgres subscription store
#[derive(Debug, Clone)]
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    #[tracing::instrument(name = "Insert subscription", skip(self))]
    async fn insert(&self, new: &NewSubscription) -> Result<Subscription, StoreError> {
        sqlx::query_as::<_, Subscription>(
            "insert into stock_subscriptions \
             (email, customer_id, product_variant_code, channel_code, locale_code, token) \
             values ($1, $2, $3, $4, $5, $6) returning *",
        )
        .bind(new.email.as_ref())
        .bind(new.customer_id)
        .bind(&new.product_variant_code)
        .bind(&new.channel_code)
        .bind(&new.locale_code)
        .bind(new.token.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    #[tracing::instrument(name = "Find subscription by email and variant", skip(self))]
    async fn find_by_email_and_variant(
        &self,
        email: &EmailAddress,
        variant_code: &str,
    ) -> Result<Option<Subscription>, StoreError> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "select * from stock_subscriptions where email=$1 and product_variant_code=$2",
        )
        .bind(email.as_ref())
        .bind(variant_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    #[tracing::instrument(name = "Find subscription by token", skip(self, token))]
    async fn find_by_token(&self, token: &str) -> Result<Option<Subscription>, StoreError> {
        let subscription =
            sqlx::query_as::<_, Subscription>("select * from stock_subscriptions where token=$1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;

        Ok(subscription)
    }

    #[tracing::instrument(name = "Find subscriptions by customer", skip(self))]
    async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<Subscription>, StoreError> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            "select * from stock_subscriptions where customer_id=$1 order by created_at",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Remove subscription", skip(self))]
    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("delete from stock_subscriptions where id=$1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(e),
    }
}
