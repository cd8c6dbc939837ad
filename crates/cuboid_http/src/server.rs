use crate::router::build_router;
use crate::state::AppState;
use log::{info, warn};
use tokio::net::TcpListener;

/// Serves the API on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!("event=http_listen module=http status=ok addr={addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=http_stop module=http status=ok addr={addr}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=http_stop module=http status=error error={err}");
    }
}
