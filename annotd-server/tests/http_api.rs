//! HTTP facade tests against the router, no sockets involved

use std::sync::Arc;

use annotd_pipeline::{AnnotationPipeline, PipelineConfig};
use annotd_server::http;
use annotd_server::service::AnnotationService;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::util::ServiceExt;

fn app() -> Router {
    let pipeline = AnnotationPipeline::new(PipelineConfig::default()).unwrap();
    http::router(AnnotationService::new(Arc::new(pipeline), 2))
}

async fn post_analysis(body: &'static str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri("/corenlp/api/v1/analysis")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    app().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_hello_greets() {
    let request = Request::builder()
        .uri("/corenlp/api/v1/hello")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    assert_eq!(body_text(response).await, "Hello, world!");
}

#[tokio::test]
async fn test_missing_text_field_is_bad_request() {
    let response = post_analysis("lang=en").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    assert!(body_text(response).await.contains("'text'"));
}

#[tokio::test]
async fn test_blank_text_is_no_content() {
    let response = post_analysis("text=%20%20%20").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_text(response).await.is_empty());
}

#[tokio::test]
async fn test_successful_analysis_is_created_with_xml() {
    let response = post_analysis("text=Hello%20world.").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/corenlp/api/v1/analysis"
    );
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
    let body = body_text(response).await;
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<word>Hello</word>"));
}

#[tokio::test]
async fn test_pipeline_failure_is_internal_error() {
    let response = post_analysis("text=bad%00input").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    assert!(body_text(response).await.contains("invalid input"));
}

#[tokio::test]
async fn test_analysis_rejects_get() {
    let request = Request::builder()
        .uri("/corenlp/api/v1/analysis")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
