//! Transport-neutral request processing
//!
//! Both transports funnel request text through [`AnnotationService::handle`]
//! and encode the resulting [`RequestOutcome`] themselves; nothing here
//! knows about sockets or status codes.

use std::sync::Arc;

use annotd_pipeline::Pipeline;
use tokio::sync::Semaphore;
use tracing::warn;

/// What one request produced, before transport-specific encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Annotation succeeded; the payload is the serialized XML
    Success(String),
    /// The input was empty after trimming
    Empty,
    /// Annotation failed for this input
    Error(String),
}

/// Shared processing path behind both transports
///
/// The pipeline instance lives for the process lifetime. Invocations are
/// CPU-bound, so they run on blocking workers, with concurrency bounded by
/// a semaphore sized from the `threads` configuration value.
#[derive(Clone)]
pub struct AnnotationService {
    pipeline: Arc<dyn Pipeline>,
    permits: Arc<Semaphore>,
}

impl AnnotationService {
    /// Wrap a pipeline, allowing up to `threads` concurrent invocations.
    pub fn new(pipeline: Arc<dyn Pipeline>, threads: usize) -> Self {
        Self {
            pipeline,
            permits: Arc::new(Semaphore::new(threads.max(1))),
        }
    }

    /// Process one request body.
    pub async fn handle(&self, text: &str) -> RequestOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return RequestOutcome::Empty;
        }

        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => return RequestOutcome::Error("annotation service is shut down".to_string()),
        };
        let pipeline = Arc::clone(&self.pipeline);
        let input = trimmed.to_string();
        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pipeline
                .process(&input)
                .map(|annotation| pipeline.to_xml(&annotation))
        })
        .await;

        match result {
            Ok(Ok(xml)) => RequestOutcome::Success(xml),
            Ok(Err(err)) => {
                warn!(%err, "annotation failed");
                RequestOutcome::Error(err.to_string())
            }
            Err(err) => {
                warn!(%err, "annotation task aborted");
                RequestOutcome::Error("annotation task aborted".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotd_pipeline::{AnnotationPipeline, PipelineConfig};

    fn service() -> AnnotationService {
        let pipeline = AnnotationPipeline::new(PipelineConfig::default()).unwrap();
        AnnotationService::new(Arc::new(pipeline), 2)
    }

    #[tokio::test]
    async fn test_empty_input_is_classified_without_annotation() {
        assert_eq!(service().handle("").await, RequestOutcome::Empty);
        assert_eq!(service().handle("   \t ").await, RequestOutcome::Empty);
    }

    #[tokio::test]
    async fn test_successful_annotation_yields_xml() {
        match service().handle("Hello world.").await {
            RequestOutcome::Success(xml) => {
                assert!(xml.contains("<word>Hello</word>"));
                assert!(xml.contains("</root>"));
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pipeline_failure_becomes_error_outcome() {
        match service().handle("bad\u{0000}input").await {
            RequestOutcome::Error(message) => assert!(message.contains("invalid input")),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_all_answer() {
        let service = service();
        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.handle(&format!("Sentence number {i}.")).await
            }));
        }
        for handle in handles {
            assert!(matches!(
                handle.await.unwrap(),
                RequestOutcome::Success(_)
            ));
        }
    }
}
