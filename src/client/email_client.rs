use std::time::Duration;

use reqwest::Client;

use serde::Serialize;

use secrecy::Secret;

use url::Url;

use crate::domain::EmailAddress;

const POSTMARK_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// REST client for the transactional mail API that carries subscription
/// confirmations
#[derive(Debug)]
pub struct EmailClient {
    client: Client,
    sender: EmailAddress,

    api_send_email_url: Url,
    api_auth_token: Secret<String>,
}

impl EmailClient {
    pub fn new(
        sender: EmailAddress,
        api_timeout: Duration,
        api_base_url: Url,
        api_auth_token: Secret<String>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(api_timeout).build()?;

        let api_send_email_url = api_base_url.join("email")?;

        Ok(Self {
            client,
            sender,
            api_send_email_url,
            api_auth_token,
        })
    }

    /// Deliver one rendered message to one recipient. The content comes
    /// from the notification templates; this client only moves it.
    #[tracing::instrument(name = "Send an email via API", skip(self, content))]
    pub async fn send(
        &self,
        recipient: &EmailAddress,
        content: &EmailContent,
    ) -> reqwest::Result<()> {
        use secrecy::ExposeSecret;

        let body = SendEmailRequest {
            to: recipient.as_ref(),
            from: self.sender.as_ref(),
            subject: &content.subject,
            html_body: &content.html_body,
            text_body: &content.text_body,
        };

        self.client
            .post(self.api_send_email_url.clone())
            .header(POSTMARK_TOKEN_HEADER, self.api_auth_token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Rendered message body. The recipient is supplied separately at send
/// time, so the same rendering can serve several recipients.
#[derive(Debug)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    to: &'a str,
    from: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}
