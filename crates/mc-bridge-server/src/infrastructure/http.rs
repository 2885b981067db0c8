//! Inbound webhook endpoint.
//!
//! A single route: `POST /` with a form-encoded body.  Axum answers other
//! methods on `/` with `405 Method Not Allowed` on its own.
//!
//! | Outcome                          | Status |
//! |----------------------------------|--------|
//! | forwarded                        | 200    |
//! | sender on the ignore list        | 200    |
//! | token mismatch                   | 401    |
//! | game server could not run it     | 500    |

use std::future::Future;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::application::{CommandExecutor, ForwardChatUseCase, ForwardError};
use crate::domain::WebhookPayload;

/// Builds the webhook router around `use_case`.
pub fn router<E>(use_case: Arc<ForwardChatUseCase<E>>) -> Router
where
    E: CommandExecutor + ?Sized + 'static,
{
    Router::new()
        .route("/", post(handle_webhook::<E>))
        .with_state(use_case)
}

async fn handle_webhook<E>(
    State(use_case): State<Arc<ForwardChatUseCase<E>>>,
    Form(payload): Form<WebhookPayload>,
) -> StatusCode
where
    E: CommandExecutor + ?Sized + 'static,
{
    match use_case.handle(&payload).await {
        Ok(_) => StatusCode::OK,
        Err(ForwardError::Unauthorized) => StatusCode::UNAUTHORIZED,
        Err(ForwardError::Command(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Serves `app` on `listener` until `shutdown` resolves, then lets in-flight
/// requests finish.
///
/// # Errors
///
/// Returns the accept loop's I/O error, if any.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "webhook endpoint listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
