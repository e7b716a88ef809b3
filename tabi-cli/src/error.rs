//! Error types emitted by the tabi CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use tabi_core::OptimizeError;
use tabi_solver_aco::ConfigError;
use thiserror::Error;

/// Errors emitted by the tabi CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// An option was set to a value outside its accepted range.
    #[error("{field} must be {expected}, found {value}")]
    OutOfRange {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Human-readable accepted range.
        expected: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The merged colony settings were rejected.
    #[error("invalid colony configuration: {0}")]
    ColonyConfig(#[from] ConfigError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was looked up.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was looked up.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was looked up.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the optimization request file failed.
    #[error("failed to open optimization request at {path:?}: {source}")]
    OpenRequest {
        /// Request file path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Request JSON could not be decoded.
    #[error("failed to parse optimization request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request file path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The optimizer rejected the request.
    #[error("optimization failed: {source}")]
    Optimize {
        /// Optimizer failure.
        source: OptimizeError,
    },
    /// Serializing the optimization output failed.
    #[error("failed to serialize optimization output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the optimization output failed.
    #[error("failed to write optimization output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
