use std::{net::SocketAddr, path::PathBuf};

use axum::{
    Router,
    extract::State,
    http::Method,
    routing::{get, post},
};
use clap::Parser;
use logo::sharing::Relay;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

mod api;
mod err;
#[cfg(test)]
mod test;
mod ws;

type AppState = State<Relay>;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: SocketAddr,
    /// directory with a web client, served for all other paths
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logo::init_tracing("info,tower_http=debug");
    let listener = TcpListener::bind(args.addr).await?;
    info!(addr = %args.addr, "relay listening");
    axum::serve(listener, router(Relay::new(), args.static_dir)).await?;
    Ok(())
}

fn router(relay: Relay, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);
    let app = Router::new()
        .route("/share", get(ws::share))
        .route("/sessions", get(api::sessions))
        .route("/sessions/{id}", get(api::session))
        .route("/demos", get(api::demos))
        .route("/run", post(api::run));
    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };
    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(relay)
}
