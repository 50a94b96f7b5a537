use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use sqlx::PgPool;

use backinstock::client::EmailClient;
use backinstock::engine::SubscriptionEngine;
use backinstock::inventory::OnHandAvailabilityChecker;
use backinstock::notify::EmailNotificationDispatcher;
use backinstock::repo::{PgSubscriptionStore, PgVariantCatalog};
use backinstock::settings::Settings;
use backinstock::{app, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("backinstock=info,actix_web=info")?;

    let settings = Settings::load().context("Failed to load settings")?;

    let pool = PgPool::connect_with(settings.database.with_db()).await?;
    sqlx::migrate!().run(&pool).await?;

    let email_client = EmailClient::new(
        settings.email.sender(),
        settings.email.api_timeout(),
        settings.email.api_base_url(),
        settings.email.api_auth_token(),
    )?;
    let dispatcher = EmailNotificationDispatcher::new(email_client, settings.app.base_url());

    let engine = SubscriptionEngine::new(
        Arc::new(PgSubscriptionStore::new(pool.clone())),
        Arc::new(PgVariantCatalog::new(pool)),
        Arc::new(OnHandAvailabilityChecker),
        Arc::new(dispatcher),
    );

    let listener = TcpListener::bind(settings.app.addr())?;

    app::run(listener, engine, settings.storefront)?
        .await
        .context("Failed to run app")
}
