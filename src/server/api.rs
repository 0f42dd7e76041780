#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use crate::agent::{ RelayAgent, RelayError };
use crate::cli::ServeArgs;
use crate::models::chat::{ ChatRequest, ChatResponse, ErrorBody };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::post,
    Json,
    Router,
    extract::State,
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use tower_http::cors::{ Any, CorsLayer };
use tower_http::services::ServeDir;
use log::{ debug, error, info, warn };

#[derive(Clone)]
struct AppState {
    agent: Arc<RelayAgent>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            RelayError::MissingMessage => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody { error: self.client_message().to_string() })).into_response()
    }
}

pub fn router(agent: Arc<RelayAgent>, static_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().route("/api/chat", post(chat_handler));

    if let Some(dir) = static_dir.filter(|d| !d.trim().is_empty()) {
        info!("Serving static files from: {}", dir);
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors).with_state(AppState { agent })
}

pub async fn start_http_server(
    agent: Arc<RelayAgent>,
    args: &ServeArgs,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr.parse::<SocketAddr>()?;
    let app = router(agent, args.static_dir.as_deref());

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert), Some(key)) => (cert, key),
            _ => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                return Err("TLS enabled without cert/key".into());
            }
        };

        // Ignore the error: another component may already have installed a provider.
        let _ = rustls::crypto::ring::default_provider().install_default();

        info!(
            "TLS enabled. Loading certificate from '{}' and key from '{}'",
            cert_path,
            key_path
        );
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("HTTPS server listening on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
        })?;
        info!("HTTP server listening on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let request = match serde_json::from_slice::<ChatRequest>(&body) {
        Ok(req) => req,
        Err(e) => {
            let err = RelayError::InvalidBody(e.to_string());
            error!("Error in chat API: {}", err);
            return err.into_response();
        }
    };

    debug!(
        "Chat request received with {} history entries",
        request.conversation_history.as_ref().map_or(0, |h| h.len())
    );

    match state.agent.handle(request).await {
        Ok(text) => (StatusCode::OK, Json(ChatResponse { response: text })).into_response(),
        Err(err) => {
            match &err {
                RelayError::MissingMessage => warn!("Rejected chat request: {}", err),
                RelayError::NotConfigured => error!("Configuration error in chat API: {}", err),
                _ => error!("Error in chat API: {}", err),
            }
            err.into_response()
        }
    }
}
