//! This file defines the summarist binary entry point.

use summarist::app;
use summarist::app_state::AppState;
use summarist::cli;
use summarist::metrics;
use summarist::server;
use summarist::tracing;

use std::sync::Arc;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    println!("{:?}", args);
    tracing::init_tracing();
    metrics::register_metrics();
    let state = Arc::new(AppState::new(&args).expect("failed to load reference tables"));
    let app = app::router(state);
    server::serve(&args, app).await;
}
