use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web::Data, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

use campus_chat_proxy::config::{AppConfig, API_KEY_VAR, ENDPOINT_VAR};
use campus_chat_proxy::web::routes;
use campus_chat_proxy::{ChatProxy, HttpTransport};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting campus chat proxy");

    let config = AppConfig::from_env()?;
    if !config.upstream.is_complete() {
        warn!(
            "{} or {} is not set; chat requests will fail until both are configured",
            ENDPOINT_VAR, API_KEY_VAR
        );
    }

    let proxy = Data::new(ChatProxy::new(
        config.upstream.clone(),
        Arc::new(HttpTransport::new()),
    ));

    info!("Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(proxy.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await
    .context("server terminated with an error")
}
