//! Payroll engine HTTP server.
//!
//! Environment:
//! - `PAYROLL_PARAMETERS_DIR`: regulatory parameter directory (default `./config/cl`)
//! - `PAYROLL_BIND_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `PAYROLL_LOG_JSON`: emit JSON logs when true (default false)
//! - `RUST_LOG`: log filter (default `info`)

use std::env;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("PAYROLL_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let parameters_dir =
        env::var("PAYROLL_PARAMETERS_DIR").unwrap_or_else(|_| "./config/cl".to_string());
    let bind_addr = env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let config = ConfigLoader::load(&parameters_dir).map_err(|e| e.to_string())?;
    tracing::info!(
        parameters_dir = %parameters_dir,
        code = %config.metadata().code,
        version = %config.metadata().version,
        "Regulatory parameters ready"
    );

    let app = create_router(AppState::new(config));
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("failed to bind {}: {}", bind_addr, e))?;
    tracing::info!(addr = %bind_addr, "Payroll engine listening");

    axum::serve(listener, app).await.map_err(|e| e.to_string())
}
