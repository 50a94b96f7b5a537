use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::controller;
use crate::engine::SubscriptionEngine;
use crate::settings::StorefrontSettings;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("I am alive")
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    engine: SubscriptionEngine,
    storefront: StorefrontSettings,
) -> anyhow::Result<Server> {
    // Wrap application data
    let engine = web::Data::new(engine);
    let storefront = web::Data::new(storefront);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(engine.clone())
            .app_data(storefront.clone())
            .service(health_check)
            .service(controller::subscriptions_scope())
            .service(controller::account_scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
