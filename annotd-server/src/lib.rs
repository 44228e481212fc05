//! annotd server library
//!
//! Configuration resolution, the transport-neutral annotation service, and
//! the two transports: the newline-delimited TCP protocol and the HTTP
//! facade. The annotation engine itself lives in `annotd-pipeline` and is
//! reached only through its `Pipeline` trait.

pub mod config;
pub mod error;
pub mod help;
pub mod http;
pub mod service;
pub mod socket;

pub use config::{Resolution, ServerConfig};
pub use error::ConfigError;
pub use service::{AnnotationService, RequestOutcome};
