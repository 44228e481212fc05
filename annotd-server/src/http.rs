//! HTTP facade over the annotation service
//!
//! `GET /corenlp/api/v1/hello` answers a fixed greeting;
//! `POST /corenlp/api/v1/analysis` accepts a form-encoded `text` field and
//! maps the request outcome onto status codes: 400 when the field is
//! missing, 204 for blank input, 201 with an XML body on success, 500 with
//! a plain-text message on pipeline failure.

use anyhow::{Context, Result};
use axum::extract::{OriginalUri, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use tracing::info;

use crate::service::{AnnotationService, RequestOutcome};

/// Form payload for the analysis endpoint
#[derive(Debug, Deserialize)]
pub struct AnalysisForm {
    text: Option<String>,
}

/// Build the facade router.
pub fn router(service: AnnotationService) -> Router {
    Router::new()
        .route("/corenlp/api/v1/hello", get(hello))
        .route("/corenlp/api/v1/analysis", post(analyze))
        .with_state(service)
}

/// Serve the facade on `port` until the process exits.
pub async fn serve(port: u16, service: AnnotationService) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("could not bind HTTP port {port}"))?;
    info!(
        "HTTP facade is listening on port {}",
        listener.local_addr()?.port()
    );
    axum::serve(listener, router(service)).await?;
    Ok(())
}

async fn hello() -> Html<&'static str> {
    info!("hello request received");
    Html("Hello, world!")
}

async fn analyze(
    State(service): State<AnnotationService>,
    OriginalUri(uri): OriginalUri,
    Form(form): Form<AnalysisForm>,
) -> Response {
    let Some(text) = form.text else {
        return (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain")],
            "please provide a form parameter named 'text'",
        )
            .into_response();
    };
    match service.handle(&text).await {
        RequestOutcome::Empty => StatusCode::NO_CONTENT.into_response(),
        RequestOutcome::Success(xml) => (
            StatusCode::CREATED,
            [
                (header::LOCATION, uri.to_string()),
                (header::CONTENT_TYPE, "application/xml".to_string()),
            ],
            xml,
        )
            .into_response(),
        RequestOutcome::Error(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            message,
        )
            .into_response(),
    }
}
