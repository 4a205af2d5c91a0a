//! HTTP surface: `/api/apply` plus the static site as fallback.

use crate::mail::{Application, Mailer};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::routing::any;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

pub const APPLY_PATH: &str = "/api/apply";

pub const MSG_SUBMITTED: &str = "Application submitted successfully!";
pub const MSG_POST_ONLY: &str = "Only POST requests allowed";
pub const MSG_BAD_PAYLOAD: &str = "Invalid application payload.";
pub const MSG_INTERNAL: &str = "Internal Server Error.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

fn reply(status: StatusCode, message: &str) -> (StatusCode, Json<Message>) {
    (
        status,
        Json(Message {
            message: message.to_string(),
        }),
    )
}

pub fn router<M: Mailer>(mailer: M, web_root: impl AsRef<Path>) -> Router {
    Router::new()
        .route(APPLY_PATH, any(apply::<M>))
        .fallback_service(ServeDir::new(web_root.as_ref()))
        .with_state(Arc::new(mailer))
}

async fn apply<M: Mailer>(
    State(mailer): State<Arc<M>>,
    method: Method,
    body: Bytes,
) -> (StatusCode, Json<Message>) {
    if method != Method::POST {
        return reply(StatusCode::METHOD_NOT_ALLOWED, MSG_POST_ONLY);
    }
    let application: Application = match serde_json::from_slice(&body) {
        Ok(application) => application,
        Err(e) => {
            log::warn!("[apply] rejected payload: {e}");
            return reply(StatusCode::BAD_REQUEST, MSG_BAD_PAYLOAD);
        }
    };

    log::info!(
        "[apply] application from {} ({})",
        application.name,
        application.company
    );
    match mailer.deliver(application).await {
        Ok(()) => reply(StatusCode::OK, MSG_SUBMITTED),
        Err(e) => {
            log::error!("[apply] delivery failed: {e}");
            reply(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
        }
    }
}
