//! Error types emitted by the inspection CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use inspection_core::RequestError;
use inspection_data::ClientBuildError;
use inspection_scorer::DomainTableError;
use thiserror::Error;

/// Errors emitted by the inspection CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required positional argument is missing after configuration
    /// merging.
    #[error("missing {field} (pass the {field} path as an argument or set {env})")]
    MissingPositional {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the recorded events file failed.
    #[error("failed to open events at {path:?}: {source}")]
    OpenEvents {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The recorded events file was not a JSON array of map events.
    #[error("failed to parse events JSON at {path:?}: {source}")]
    ParseEvents {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Loading the feature domain table failed.
    #[error(transparent)]
    DomainTable(#[from] DomainTableError),
    /// The replayed session could not produce a request.
    #[error(transparent)]
    Request(#[from] RequestError),
    /// Constructing the inference client failed.
    #[error("failed to build inference client for {base_url:?}: {source}")]
    BuildClient {
        base_url: String,
        #[source]
        source: ClientBuildError,
    },
    /// Constructing the background dispatcher failed.
    #[error("failed to start inference dispatcher: {0}")]
    BuildDispatcher(#[source] ClientBuildError),
    /// The inference service reported a failure.
    #[error("{0}")]
    InferenceFailed(String),
    /// Serializing the feature vector failed.
    #[error("failed to serialize features: {0}")]
    SerialiseFeatures(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
