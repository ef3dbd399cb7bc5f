//! Graceful shutdown helper for the server entrypoint.

use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Returns a token that is cancelled when the process receives ctrl-c.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let tc = token.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tc.cancel();
        }
    });
    token
}
