use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use chirp_api::AppStateInner;
use chirp_store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chirp_server=debug,chirp_api=debug,chirp_store=debug,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let host = std::env::var("CHIRP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CHIRP_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let data_path = std::env::var("CHIRP_DATA_PATH").unwrap_or_else(|_| "data.json".into());
    let public_dir = std::env::var("CHIRP_PUBLIC_DIR").unwrap_or_else(|_| "public".into());

    // State
    let store = Store::open(&data_path);
    let state = Arc::new(AppStateInner { store });

    // Routes: the /api table plus the static document root. ServeDir refuses
    // paths that escape the root.
    let app = Router::new()
        .merge(chirp_api::router(state))
        .fallback_service(ServeDir::new(&public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Chirp listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
