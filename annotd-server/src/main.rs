//! annotd - line-protocol and HTTP server around a text-annotation pipeline

use std::env;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use annotd_pipeline::{AnnotationPipeline, PipelineConfig};
use annotd_server::config::{self, Resolution, ServerConfig};
use annotd_server::help;
use annotd_server::http;
use annotd_server::service::AnnotationService;
use annotd_server::socket::LineProtocolServer;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let resolution = match config::resolve(&args) {
        Ok(resolution) => resolution,
        Err(err) => {
            eprintln!("{err}");
            help::print_usage(&mut io::stderr());
            return ExitCode::FAILURE;
        }
    };

    let config = match resolution {
        Resolution::Help(topic) => {
            help::print_help(&mut io::stderr(), &topic);
            return ExitCode::SUCCESS;
        }
        Resolution::Run(config) => config,
    };

    info!("annotd {} starting", env!("CARGO_PKG_VERSION"));
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<()> {
    info!("creating the annotation pipeline");
    let pipeline_config = PipelineConfig::from_properties(config.pipeline.iter())?
        .with_resource_dir(&config.nlp_dir);
    let pipeline = AnnotationPipeline::new(pipeline_config)?;
    let threads = pipeline.config().threads;
    let service = AnnotationService::new(Arc::new(pipeline), threads);

    let http_service = service.clone();
    let http_port = config.http_port;
    tokio::spawn(async move {
        if let Err(err) = http::serve(http_port, http_service).await {
            error!("HTTP facade failed: {err:#}");
        }
    });

    let server = LineProtocolServer::bind(config.port, service).await?;
    server.run().await
}
