use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response};

use secrecy::Secret;

use serde::Serialize;

use url::Url;

use uuid::Uuid;

use wiremock::MockServer;

use backinstock::app;
use backinstock::client::EmailClient;
use backinstock::domain::ProductVariant;
use backinstock::engine::SubscriptionEngine;
use backinstock::inventory::OnHandAvailabilityChecker;
use backinstock::notify::EmailNotificationDispatcher;
use backinstock::repo::{InMemorySubscriptionStore, InMemoryVariantCatalog};
use backinstock::settings::StorefrontSettings;

#[derive(Debug, Default, Serialize)]
pub struct NewSubscription {
    pub email: Option<String>,
    pub product_variant_code: Option<String>,
    pub channel_code: Option<String>,
    pub locale_code: Option<String>,
}

/// Identity headers as forwarded by the upstream storefront session layer
#[derive(Debug, Clone)]
pub struct Identity {
    pub customer_id: Uuid,
    pub email: Option<String>,
}

pub struct TestApp {
    addr: String,

    pub client: Client,
    pub email_server: MockServer,
    pub store: Arc<InMemorySubscriptionStore>,
}

impl TestApp {
    pub async fn spawn(variants: Vec<ProductVariant>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let email_server = MockServer::start().await;

        let email_client = {
            let sender = "test@test.com"
                .parse()
                .expect("Failed to parse sender email address");
            let api_base_url =
                Url::parse(&email_server.uri()).expect("Failed to parse mock server uri");
            let api_auth_token = Secret::new("TestAuthorization".into());
            let api_timeout = Duration::from_secs(2);

            EmailClient::new(sender, api_timeout, api_base_url, api_auth_token)
                .expect("Failed to create email client")
        };

        let base_url = Url::parse(&format!("{}/", addr)).expect("Failed to parse app base url");
        let dispatcher = EmailNotificationDispatcher::new(email_client, base_url);

        let store = Arc::new(InMemorySubscriptionStore::new());
        let engine = SubscriptionEngine::new(
            store.clone(),
            Arc::new(InMemoryVariantCatalog::new(variants)),
            Arc::new(OnHandAvailabilityChecker),
            Arc::new(dispatcher),
        );

        let storefront = StorefrontSettings::new("WEB", "en_US");

        let server =
            app::run(listener, engine, storefront).expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self {
            addr,
            client,
            email_server,
            store,
        }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub fn identified_request(
        &self,
        method: Method,
        url: &str,
        identity: Option<&Identity>,
    ) -> reqwest::RequestBuilder {
        let mut req = self.request(method, url);
        if let Some(identity) = identity {
            req = req.header("x-customer-id", identity.customer_id.to_string());
            if let Some(email) = &identity.email {
                req = req.header("x-customer-email", email.clone());
            }
        }
        req
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn subscription_create(
        &self,
        new_subscription: &NewSubscription,
        identity: Option<&Identity>,
    ) -> reqwest::Result<Response> {
        self.identified_request(Method::POST, "subscriptions", identity)
            .form(new_subscription)
            .send()
            .await
    }

    pub async fn subscription_delete(&self, token: &str) -> reqwest::Result<Response> {
        self.request(Method::GET, &format!("subscriptions/delete/{}", token))
            .send()
            .await
    }

    pub async fn account_list(&self, identity: Option<&Identity>) -> reqwest::Result<Response> {
        self.identified_request(Method::GET, "account/subscriptions", identity)
            .send()
            .await
    }
}

pub fn out_of_stock_variant(code: &str) -> ProductVariant {
    ProductVariant {
        id: Uuid::new_v4(),
        code: code.into(),
        name: format!("Variant {}", code),
        tracked: true,
        on_hand: 0,
        on_hold: 0,
    }
}

pub fn in_stock_variant(code: &str) -> ProductVariant {
    ProductVariant {
        on_hand: 10,
        ..out_of_stock_variant(code)
    }
}
