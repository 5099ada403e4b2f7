//! HTTP front-end for the inventory store.
//!
//! # Responsibility
//! - Expose the inventory operations as REST routes under `/api`.
//! - Map inventory failures to HTTP status codes with a `{"detail": ..}` body.
//!
//! # Invariants
//! - Handlers never touch storage directly; every call goes through the
//!   shared `InventoryService`.
//! - Service calls run on the blocking pool because the store does
//!   synchronous file I/O.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::router;

use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use stockroom_core::{InventoryService, ProductRepository};
use tokio::net::TcpListener;

/// Binds `addr` and serves the API until Ctrl-C.
pub async fn serve<R>(service: Arc<InventoryService<R>>, addr: SocketAddr) -> std::io::Result<()>
where
    R: ProductRepository + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(
        "event=http_listen module=http status=ok addr={}",
        listener.local_addr()?
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=http_shutdown module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!(
            "event=http_shutdown module=http status=error error_code=signal_failed error={}",
            err
        );
        std::future::pending::<()>().await;
    }
}
