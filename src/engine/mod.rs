mod eligibility;
mod outcome;

pub use outcome::*;

use std::sync::Arc;

use uuid::Uuid;

use crate::crypto::{DeletionToken, TokenError};
use crate::domain::{Customer, NewSubscription, Subscription};
use crate::engine::eligibility::EligibilityEvaluator;
use crate::inventory::AvailabilityChecker;
use crate::notify::{NotificationContext, NotificationDispatcher, TEMPLATE_SUBSCRIPTION_SUCCESS};
use crate::repo::{StoreError, SubscriptionStore, VariantCatalog};

/// Inbound request for a new subscription. Channel and locale arrive as
/// explicit values resolved by the calling layer, so the engine stays a
/// pure function of its inputs and collaborators.
#[derive(Debug)]
pub struct CreateRequest {
    /// Raw submitted address; absent when an authenticated customer's
    /// address should be used instead
    pub email: Option<String>,
    pub product_variant_code: String,
    pub channel_code: String,
    pub locale_code: String,
}

/// Infrastructure failures, fatal to the single request
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to generate deletion token")]
    Token(#[from] TokenError),

    #[error("Storage failure")]
    Store(#[from] StoreError),
}

/// Orchestrates the subscription lifecycle: eligibility, token assignment,
/// persistence, and confirmation dispatch for creation; token lookup and
/// removal for deletion.
#[derive(Clone)]
pub struct SubscriptionEngine {
    store: Arc<dyn SubscriptionStore>,
    catalog: Arc<dyn VariantCatalog>,
    checker: Arc<dyn AvailabilityChecker>,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl SubscriptionEngine {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        catalog: Arc<dyn VariantCatalog>,
        checker: Arc<dyn AvailabilityChecker>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            store,
            catalog,
            checker,
            dispatcher,
        }
    }

    /// Create a subscription for `(email-or-customer, variant)`.
    ///
    /// Rejections carry no side effects. A confirmation message is
    /// dispatched after persistence; dispatch failure does not undo the
    /// creation.
    #[tracing::instrument(name = "Create subscription", skip(self, customer))]
    pub async fn create(
        &self,
        request: CreateRequest,
        customer: Option<&Customer>,
    ) -> Result<Outcome, EngineError> {
        let evaluator = EligibilityEvaluator {
            catalog: self.catalog.as_ref(),
            checker: self.checker.as_ref(),
            store: self.store.as_ref(),
        };
        let eligible = match evaluator.evaluate(&request, customer).await? {
            Ok(eligible) => eligible,
            Err(rejection) => return Ok(Outcome::Rejected(rejection)),
        };

        // The token must exist before anything is persisted
        let token = DeletionToken::generate()?;

        let email = eligible.email.clone();
        let new = NewSubscription {
            email: eligible.email,
            customer_id: eligible.customer_id,
            product_variant_code: eligible.variant.code,
            channel_code: request.channel_code,
            locale_code: request.locale_code,
            token,
        };

        let subscription = match self.store.insert(&new).await {
            Ok(subscription) => subscription,
            // Lost the race against a concurrent identical submission
            Err(StoreError::Duplicate) => {
                return Ok(Outcome::Rejected(Rejection::AlreadySubscribed { email }))
            }
            Err(e) => return Err(e.into()),
        };

        let context = NotificationContext {
            channel_code: subscription.channel_code.clone(),
            locale_code: subscription.locale_code.clone(),
            subscription: subscription.clone(),
        };
        if let Err(e) = self
            .dispatcher
            .send(TEMPLATE_SUBSCRIPTION_SUCCESS, &[email], &context)
            .await
        {
            // The subscription stands even if the confirmation never arrives
            tracing::warn!("Failed to dispatch subscription confirmation: {:#}", e);
        }

        Ok(Outcome::Success(subscription))
    }

    /// Delete the subscription addressed by a token. Possession of the
    /// token is the entire authorization; an unknown token is reported as
    /// informational since the link may simply be stale.
    #[tracing::instrument(name = "Delete subscription by token", skip(self, token))]
    pub async fn delete(&self, token: &str) -> Result<Outcome, EngineError> {
        match self.store.find_by_token(token).await? {
            Some(subscription) => {
                self.store.remove(subscription.id).await?;
                Ok(Outcome::Success(subscription))
            }
            None => Ok(Outcome::Informational("nothing to delete".into())),
        }
    }

    /// All subscriptions owned by a customer, in insertion order.
    /// Refusing unauthenticated callers is the calling layer's decision.
    #[tracing::instrument(name = "List subscriptions for customer", skip(self))]
    pub async fn list_for_owner(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<Subscription>, EngineError> {
        let subscriptions = self.store.find_by_customer(customer_id).await?;
        Ok(subscriptions)
    }
}
