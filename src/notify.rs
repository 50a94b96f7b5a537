use url::Url;

use crate::client::{EmailClient, EmailContent};
use crate::domain::{EmailAddress, Subscription};

/// Template key for the message confirming a new subscription
pub const TEMPLATE_SUBSCRIPTION_SUCCESS: &str = "back_in_stock_subscription_success";

/// Render context handed to the dispatcher alongside the template key.
/// Channel and locale ride along so the message can be rendered for the
/// right storefront later, even though the default renderer only uses the
/// subscription itself.
#[derive(Debug, Clone)]
pub struct NotificationContext {
    pub subscription: Subscription,
    pub channel_code: String,
    pub locale_code: String,
}

/// Outbound notification collaborator. The engine treats `send` as
/// fire-and-forget: a failure is logged by the caller, never rolled back.
/// NOTE: Intended to facilitate easier testing/mocking
#[async_trait::async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(
        &self,
        template: &str,
        recipients: &[EmailAddress],
        context: &NotificationContext,
    ) -> anyhow::Result<()>;
}

/// Dispatcher that renders known template keys into emails and sends them
/// through the transactional mail API
pub struct EmailNotificationDispatcher {
    client: EmailClient,
    /// Public base URL of the storefront, used to build the deletion link
    base_url: Url,
}

impl EmailNotificationDispatcher {
    pub fn new(client: EmailClient, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait::async_trait]
impl NotificationDispatcher for EmailNotificationDispatcher {
    #[tracing::instrument(name = "Dispatch notification", skip(self, context))]
    async fn send(
        &self,
        template: &str,
        recipients: &[EmailAddress],
        context: &NotificationContext,
    ) -> anyhow::Result<()> {
        // One rendering serves every recipient of the notification
        let content = render(template, &context.subscription, &self.base_url)?;
        for recipient in recipients {
            self.client.send(recipient, &content).await?;
        }
        Ok(())
    }
}

/// Render a template key into concrete email content
fn render(
    template: &str,
    subscription: &Subscription,
    base_url: &Url,
) -> anyhow::Result<EmailContent> {
    match template {
        TEMPLATE_SUBSCRIPTION_SUCCESS => Ok(render_subscription_success(subscription, base_url)?),
        other => anyhow::bail!("Unknown notification template: {}", other),
    }
}

fn render_subscription_success(
    subscription: &Subscription,
    base_url: &Url,
) -> Result<EmailContent, url::ParseError> {
    let deletion_url = deletion_url(base_url, &subscription.token)?;

    let subject = format!(
        "We will let you know when {} is back in stock",
        subscription.product_variant_code
    );
    let html_body = format!(
        "<h1>You are on the list!</h1>\
         <p>We will send you an email as soon as <b>{}</b> is available again.</p>\
         <p>Changed your mind? <a href=\"{}\">Cancel this notification</a>.</p>",
        subscription.product_variant_code, deletion_url
    );
    let text_body = format!(
        "You are on the list!\n\n\
         We will send you an email as soon as {} is available again.\n\n\
         Changed your mind? Cancel here: {}",
        subscription.product_variant_code, deletion_url
    );

    Ok(EmailContent {
        subject,
        html_body,
        text_body,
    })
}

/// Build the tokenized self-service deletion link
pub fn deletion_url(base_url: &Url, token: &str) -> Result<Url, url::ParseError> {
    base_url.join(&format!("subscriptions/delete/{}", token))
}
