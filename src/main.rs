use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

use push_relay::{
    config::Config,
    handlers,
    services::{
        api::HttpServerApi,
        coordinator::{HandshakeOutcome, SubscriptionCoordinator},
        delivery::DeliveryAdapter,
        headless::HeadlessRuntime,
    },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    let runtime = Arc::new(HeadlessRuntime::new(
        config.host.clone(),
        config.server.base_url.clone(),
    ));
    let api = Arc::new(HttpServerApi::new(config.server.clone()));
    let coordinator = SubscriptionCoordinator::new(runtime.clone(), api, config.worker.clone());
    let agent = Data::new(DeliveryAdapter::new(runtime.clone(), config.notifications.clone()));
    let runtime = Data::from(runtime);

    let bind_address = format!("0.0.0.0:{}", config.host.port);
    log::info!(
        "Push endpoint listening on {} (public url {})",
        bind_address,
        config.host.public_url
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(runtime.clone())
            .app_data(agent.clone())
            .configure(handlers::push::configure)
    })
    .bind(&bind_address)?
    .run();

    actix_web::rt::spawn(async move {
        match coordinator.ensure_subscribed().await {
            HandshakeOutcome::Subscribed(subscription) => {
                log::info!("Subscribed to push delivery at {}", subscription.endpoint)
            }
            HandshakeOutcome::Unsupported => log::warn!("Push delivery unavailable on this host"),
            HandshakeOutcome::Declined(permission) => {
                log::info!("Push delivery declined ({})", permission)
            }
            HandshakeOutcome::Failed { stage, reason } => {
                log::error!("Push handshake failed at {}: {}", stage, reason)
            }
        }
    });

    server.await?;
    Ok(())
}
