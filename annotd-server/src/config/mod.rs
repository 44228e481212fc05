//! Configuration resolution
//!
//! Scans the raw argument sequence, loads the optional properties file
//! named by one of the alias flags, extracts the server's own flags, and
//! merges everything into the effective configuration handed to pipeline
//! construction. All failures here are fatal: a misconfigured server must
//! not start.

mod properties;

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ConfigError;

pub use properties::Properties;

/// Flags that all mean "the next token names a properties file".
///
/// Only the first occurrence is honored, and both tokens are removed
/// before any further parsing; the properties loader in the annotation
/// stack must never see the flag itself.
const PROPERTY_ALIASES: &[&str] = &["-prop", "-props", "-properties", "-args", "-arguments"];

/// Default line-protocol port
pub const DEFAULT_PORT: u16 = 9900;

/// Default HTTP facade port
pub const DEFAULT_HTTP_PORT: u16 = 9901;

/// Default annotation-resource directory
pub const DEFAULT_NLP_DIR: &str = "/usr/lib/annotd";

/// The effective configuration, built once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Line-protocol listener port
    pub port: u16,
    /// HTTP facade listener port
    pub http_port: u16,
    /// Directory searched for annotation resources
    pub nlp_dir: PathBuf,
    /// Merged pipeline properties (file entries layered over CLI pairs)
    pub pipeline: Properties,
}

/// Outcome of resolving the argument sequence
#[derive(Debug)]
pub enum Resolution {
    /// `-h`/`-help` was present; print help for this topic and exit.
    /// A bare flag carries the topic `"true"`.
    Help(String),
    /// Start the server with this configuration
    Run(ServerConfig),
}

/// Resolve the raw argument sequence into a [`Resolution`].
pub fn resolve(args: &[String]) -> Result<Resolution, ConfigError> {
    let (mut remaining, file_props) = extract_properties_file(args)?;

    let port = parse_port(
        "-port",
        take_server_flag(&mut remaining, "-port")?,
        DEFAULT_PORT,
    )?;
    let http_port = parse_port(
        "-httpport",
        take_server_flag(&mut remaining, "-httpport")?,
        DEFAULT_HTTP_PORT,
    )?;
    let nlp_dir = match take_server_flag(&mut remaining, "-nlpdir")? {
        Some(path) => {
            let dir = PathBuf::from(&path);
            if !dir.is_dir() {
                return Err(ConfigError::InvalidNlpDir { path });
            }
            dir
        }
        None => PathBuf::from(DEFAULT_NLP_DIR),
    };

    let mut pipeline = parse_flag_pairs(&remaining)?;
    for (key, value) in file_props.iter() {
        if PROPERTY_ALIASES.iter().any(|alias| &alias[1..] == key) {
            warn!("ignoring '{key}' entry in the properties file");
            continue;
        }
        pipeline.set(key, value);
    }

    if let Some(topic) = help_topic(&pipeline) {
        return Ok(Resolution::Help(topic));
    }

    if let Some(threads) = pipeline.get("threads") {
        match threads.parse::<usize>() {
            Ok(n) if n > 0 => {}
            _ => {
                return Err(ConfigError::InvalidThreads {
                    value: threads.to_string(),
                })
            }
        }
    }

    Ok(Resolution::Run(ServerConfig {
        port,
        http_port,
        nlp_dir,
        pipeline,
    }))
}

/// Strip the first properties-file alias and its filename, loading the file.
fn extract_properties_file(args: &[String]) -> Result<(Vec<String>, Properties), ConfigError> {
    let mut remaining = args.to_vec();
    let Some(index) = remaining
        .iter()
        .position(|arg| PROPERTY_ALIASES.contains(&arg.as_str()))
    else {
        return Ok((remaining, Properties::new()));
    };
    if index + 1 >= remaining.len() {
        return Err(ConfigError::MissingPropertiesFile {
            flag: remaining[index].clone(),
        });
    }
    let path = remaining.remove(index + 1);
    remaining.remove(index);
    info!("reading properties file: {path}");
    let props =
        Properties::load(Path::new(&path)).map_err(|source| ConfigError::UnreadableProperties {
            path: path.clone(),
            source,
        })?;
    Ok((remaining, props))
}

/// Remove a `-flag value` pair the server consumes itself.
fn take_server_flag(args: &mut Vec<String>, flag: &str) -> Result<Option<String>, ConfigError> {
    let Some(index) = args.iter().position(|arg| arg == flag) else {
        return Ok(None);
    };
    if index + 1 >= args.len() {
        return Err(ConfigError::MissingValue {
            flag: flag.to_string(),
        });
    }
    let value = args.remove(index + 1);
    args.remove(index);
    Ok(Some(value))
}

fn parse_port(
    flag: &'static str,
    value: Option<String>,
    default: u16,
) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidInteger { flag, value }),
    }
}

/// Parse the remaining arguments as `-flag value` pairs.
///
/// A flag followed by another flag, or by nothing, reads as the boolean
/// `true`; a leading-dash token that parses as a number still counts as a
/// value.
fn parse_flag_pairs(args: &[String]) -> Result<Properties, ConfigError> {
    let mut props = Properties::new();
    let mut index = 0;
    while index < args.len() {
        let arg = &args[index];
        let key = arg.trim_start_matches('-');
        if key.is_empty() || key.len() == arg.len() {
            return Err(ConfigError::UnexpectedArgument { token: arg.clone() });
        }
        match args.get(index + 1) {
            Some(value) if !value.starts_with('-') || value.parse::<f64>().is_ok() => {
                props.set(key, value.clone());
                index += 2;
            }
            _ => {
                props.set(key, "true");
                index += 1;
            }
        }
    }
    Ok(props)
}

fn help_topic(props: &Properties) -> Option<String> {
    props
        .get("h")
        .or_else(|| props.get("help"))
        .map(|topic| topic.to_string())
}
