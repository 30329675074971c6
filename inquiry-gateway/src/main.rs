//! Entry point for the `inquiry-gateway` HTTP server.

use std::sync::Arc;

use inquiry_core::TokenSigner;
use inquiry_gateway::{
    auth::GoTrueAuthClient,
    config::Config,
    forwarder::InquiryForwarder,
    routes::{create_router, AppState},
};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let signer = TokenSigner::new(config.identity_base(), config.service_key.as_bytes());
    let forwarder =
        InquiryForwarder::new(config.inquiry_api_url.clone(), config.project_ref(), signer);
    let auth = GoTrueAuthClient::new(config.identity_base(), config.service_key.clone());
    let app = create_router(Arc::new(AppState { forwarder, auth: Box::new(auth) }));

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %config.listen_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %config.listen_addr, "inquiry-gateway listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
