//! The pipeline trait and the built-in annotator chain

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::annotation::{Annotation, Sentence, Token};
use crate::config::{Annotator, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::{splitter, tokenizer, xml};

/// The seam between the transports and the annotation engine.
///
/// Implementations must be callable concurrently; the server shares one
/// instance across all connections for the process lifetime.
pub trait Pipeline: Send + Sync {
    /// Annotate one input text.
    fn process(&self, text: &str) -> Result<Annotation>;

    /// Serialize an annotation to its XML wire form.
    fn to_xml(&self, annotation: &Annotation) -> String;
}

/// Name of the optional abbreviation resource inside the NLP directory.
const ABBREVIATION_FILE: &str = "abbreviations.txt";

const BUILTIN_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "inc", "ltd", "co", "corp",
    "no", "dept", "univ", "fig", "al", "approx",
];

/// Built-in annotator chain: tokenization plus sentence splitting.
pub struct AnnotationPipeline {
    config: PipelineConfig,
    abbreviations: HashSet<String>,
}

impl AnnotationPipeline {
    /// Build a pipeline from a validated configuration.
    ///
    /// Loads the abbreviation resource from the configured directory when
    /// present; the built-in list is always available.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let mut abbreviations: HashSet<String> = BUILTIN_ABBREVIATIONS
            .iter()
            .map(|s| s.to_string())
            .collect();
        if let Some(dir) = &config.resource_dir {
            load_abbreviations(dir, &mut abbreviations);
        }
        Ok(Self {
            config,
            abbreviations,
        })
    }

    /// The configuration this pipeline was built from
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl Pipeline for AnnotationPipeline {
    fn process(&self, text: &str) -> Result<Annotation> {
        if let Some(ch) = text
            .chars()
            .find(|&c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
        {
            // XML 1.0 has no representation for these
            return Err(PipelineError::InvalidInput(format!(
                "control character U+{:04X} cannot be annotated",
                ch as u32
            )));
        }

        let mut tokens: Vec<Token> = Vec::new();
        let mut sentences: Option<Vec<Sentence>> = None;
        for annotator in &self.config.annotators {
            match annotator {
                Annotator::Tokenize => {
                    tokens = tokenizer::tokenize(text, self.config.whitespace_tokenization)
                }
                Annotator::Ssplit => {
                    sentences = Some(splitter::split(
                        std::mem::take(&mut tokens),
                        &self.abbreviations,
                    ))
                }
            }
        }
        let sentences = match sentences {
            Some(sentences) => sentences,
            None if tokens.is_empty() => Vec::new(),
            None => vec![Sentence { tokens }],
        };

        Ok(Annotation {
            text: text.to_string(),
            sentences,
        })
    }

    fn to_xml(&self, annotation: &Annotation) -> String {
        xml::serialize(annotation)
    }
}

fn load_abbreviations(dir: &Path, into: &mut HashSet<String>) {
    let path = dir.join(ABBREVIATION_FILE);
    match fs::read_to_string(&path) {
        Ok(content) => {
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                into.insert(line.trim_end_matches('.').to_lowercase());
            }
            debug!(path = %path.display(), "loaded abbreviation resource");
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no abbreviation resource, using built-ins");
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "could not read abbreviation resource");
        }
    }
}
