//! poolcounter exporter
//!
//! Serves poolcounter `STATS FULL` counters as Prometheus metrics. Every scrape
//! of `/prometheus` opens a fresh connection to the counter service.

use std::process::ExitCode;

use poolcounter_exporter::{app_state, config, obs, router};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("poolcounter-exporter: {e}");
            return ExitCode::FAILURE;
        }
    };
    obs::logging::init(cfg.logs_as_json);

    let listen = cfg.listen_address.clone();
    tracing::info!(target_addr = %cfg.pool_counter_address, "configuring collector");

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    let listener = match tokio::net::TcpListener::bind(listen.as_str()).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%listen, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%listen, "poolcounter-exporter starting");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
