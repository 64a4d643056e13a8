//! Serve command - run the HTTP service

use std::sync::Arc;

use idverify::api::AppState;
use idverify::config::Config;
use idverify::server::tiny_http;

/// Start the HTTP service and block until it stops
pub fn serve(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let addr = config.bind_addr();
    let server = tiny_http::bind(&addr)?;

    log::info!(
        "Server is running on {addr} with {} worker(s)",
        config.worker_count()
    );
    tiny_http::run(Arc::new(server), state, config.worker_count());
    Ok(())
}
