use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use portal_auth::auth::AuthService;
use portal_auth::config::ServerConfig;
use portal_auth::server::routes;
use portal_auth::storage::{AccountStore, MemoryAccountStore};

#[tokio::main]
async fn main() {
    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Load config from .env
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, cors={:?}, tls={}",
        config.host, config.port, config.cors, config.enable_tls
    );

    let store = Arc::new(MemoryAccountStore::new());
    match store.count().await {
        Ok(count) => info!("Account store ready with {} accounts", count),
        Err(e) => {
            error!("Account store unavailable: {}", e);
            std::process::exit(1);
        }
    }
    let service = match AuthService::from_config(&config, store) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("Failed to initialize auth service: {}", e);
            std::process::exit(1);
        }
    };

    let routes = routes(service, &config.cors);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    match (config.enable_tls, &config.tls_cert_path, &config.tls_key_path) {
        (true, Some(cert_path), Some(key_path)) => {
            info!("Starting portal auth server on https://{}", addr);
            warp::serve(routes)
                .tls()
                .cert_path(cert_path)
                .key_path(key_path)
                .run(addr)
                .await;
        }
        _ => {
            info!("Starting portal auth server on http://{}", addr);
            warp::serve(routes).run(addr).await;
        }
    }
}
