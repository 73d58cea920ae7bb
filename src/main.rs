use std::sync::Arc;

use salvo::{listener::TcpListener, Server};
use tracing_subscriber::EnvFilter;

use config::{env_var, event};
use infra::{
    controller::Context,
    database::connection,
    router,
    service::{
        security::{Argon2HashService, JWTEncryptionService},
        storage::LocalFileStorage,
    },
};

mod app;
mod base;
mod config;
mod domain;
mod error;
mod infra;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let env = env_var::get();
    let ctx = Context {
        pool: connection::create_sqlx_pool().await,
        hash_service: Arc::new(Argon2HashService::new()),
        token_service: Arc::new(JWTEncryptionService::new(&env.token_key)),
        storage: Arc::new(LocalFileStorage::new(&env.media_root)),
        settings: event::get(),
    };

    let address = format!("0.0.0.0:{}", env.port);
    tracing::info!("listening on {address}");
    let listener = TcpListener::bind(&address);
    Server::new(listener).serve(router::app(ctx)).await;
}
