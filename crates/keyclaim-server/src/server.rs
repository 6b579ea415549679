//! Server runner: binds the listen address and serves the router.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::http::{self, AppState};

/// Bind the configured address and serve until shutdown.
pub async fn run(state: Arc<AppState>) -> crate::Result<()> {
    let listen = state.config.listen;
    let app = http::router(Arc::clone(&state));

    let listener = TcpListener::bind(listen).await?;
    info!(addr = %listen, domain = %state.config.domain, "keyclaim server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
