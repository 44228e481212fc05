//! Pipeline configuration derived from the effective server configuration

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{PipelineError, Result};

/// Annotators the built-in pipeline can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotator {
    /// Split text into offset-annotated tokens
    Tokenize,
    /// Group tokens into sentences
    Ssplit,
}

impl Annotator {
    /// Property-file name of this annotator
    pub fn name(&self) -> &'static str {
        match self {
            Annotator::Tokenize => "tokenize",
            Annotator::Ssplit => "ssplit",
        }
    }
}

impl FromStr for Annotator {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tokenize" => Ok(Annotator::Tokenize),
            "ssplit" => Ok(Annotator::Ssplit),
            other => Err(PipelineError::UnknownAnnotator(other.to_string())),
        }
    }
}

/// Configuration for [`AnnotationPipeline`](crate::AnnotationPipeline)
///
/// Built from the merged key/value pairs the server resolved at startup.
/// Keys the pipeline does not understand are passed over silently, so
/// deployments can carry properties for other consumers.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Annotators to run, in order
    pub annotators: Vec<Annotator>,
    /// Tokenize purely on whitespace instead of the classic rules
    pub whitespace_tokenization: bool,
    /// Concurrent-invocation budget granted to callers
    pub threads: usize,
    /// Directory holding optional annotation resources
    pub resource_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            annotators: vec![Annotator::Tokenize, Annotator::Ssplit],
            whitespace_tokenization: false,
            threads: 1,
            resource_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Build a configuration from `key=value` pairs
    ///
    /// Recognized keys: `annotators`, `tokenize.whitespace`, `threads`.
    pub fn from_properties<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            match key {
                "annotators" => config.annotators = parse_annotators(value)?,
                "tokenize.whitespace" => {
                    config.whitespace_tokenization = value.eq_ignore_ascii_case("true")
                }
                "threads" => {
                    config.threads = value.parse().map_err(|_| {
                        PipelineError::Configuration(format!(
                            "threads: was not given a valid number: {value}"
                        ))
                    })?
                }
                _ => {}
            }
        }
        Ok(config)
    }

    /// Set the directory searched for annotation resources
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }
}

fn parse_annotators(value: &str) -> Result<Vec<Annotator>> {
    let mut annotators = Vec::new();
    for name in value.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        annotators.push(name.parse()?);
    }
    if annotators.is_empty() {
        return Err(PipelineError::Configuration(
            "the annotators list is empty".to_string(),
        ));
    }
    if let Some(pos) = annotators.iter().position(|a| *a == Annotator::Ssplit) {
        if !annotators[..pos].contains(&Annotator::Tokenize) {
            return Err(PipelineError::MissingRequirement {
                earlier: "tokenize",
                later: "ssplit",
            });
        }
    }
    Ok(annotators)
}
