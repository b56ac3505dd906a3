//! lingualink realtime client (CLI)
//!
//! - Loads `lingualink.yaml` (or the path given as first argument)
//! - Connects with the token in `LINGUALINK_TOKEN`
//! - Logs every application event until Ctrl-C, then disconnects

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use lingualink_client::{config, AppEvent, EventBus, RealtimeClient};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "lingualink.yaml".to_string());
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, error = %e, "config load failed");
            std::process::exit(2);
        }
    };

    let token = std::env::var("LINGUALINK_TOKEN").unwrap_or_default();

    let bus = Arc::new(EventBus::new());
    bus.on_any(|ev| match ev {
        AppEvent::Inbound { payload, .. } => {
            tracing::info!(event = ev.name(), %payload, "inbound");
        }
        AppEvent::Lifecycle(l) => {
            tracing::info!(event = ev.name(), detail = ?l, "lifecycle");
        }
    });

    let client = RealtimeClient::with_websocket(&cfg.client, bus);

    tracing::info!(url = %cfg.client.url, "lingualink-client starting");
    if let Err(e) = client.connect(&token).await {
        tracing::error!(error = %e, code = e.code().as_str(), "connect failed");
        std::process::exit(1);
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler failed");
    }
    client.disconnect();
}
