//! Fatal configuration errors
//!
//! Every variant prevents the server from starting; `main` prints the
//! message plus a usage summary to stderr and exits non-zero.

use thiserror::Error;

/// Errors produced while resolving the startup configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A properties-file alias was the last argument
    #[error("the {flag} argument requires a filename for a value")]
    MissingPropertiesFile {
        /// The alias as it was spelled on the command line
        flag: String,
    },

    /// The properties file could not be read
    #[error("unable to read the properties file: {path}")]
    UnreadableProperties {
        /// Path given after the alias flag
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A server flag was the last argument
    #[error("the {flag} option requires a value")]
    MissingValue {
        /// The flag missing its value
        flag: String,
    },

    /// A port flag was given a non-integer value
    #[error("the {flag} option requires a valid integer argument: {value}")]
    InvalidInteger {
        /// `-port` or `-httpport`
        flag: &'static str,
        /// The rejected token
        value: String,
    },

    /// `-nlpdir` does not name an existing directory
    #[error("the -nlpdir option requires a valid pathname argument: {path}")]
    InvalidNlpDir {
        /// The rejected path
        path: String,
    },

    /// The `threads` key is not a positive integer
    #[error("threads: was not given a valid number: {value}")]
    InvalidThreads {
        /// The rejected value
        value: String,
    },

    /// A token that is neither a flag nor a flag value
    #[error("unexpected argument: {token}")]
    UnexpectedArgument {
        /// The stray token
        token: String,
    },
}
