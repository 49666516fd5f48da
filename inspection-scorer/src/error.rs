//! Error types raised while building or loading a feature domain table.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while building or loading a [`crate::FeatureDomainTable`].
#[derive(Debug, Error)]
pub enum DomainTableError {
    /// The table holds no records, so no bounds can be derived.
    #[error("feature domain table must contain at least one record")]
    Empty,
    /// A record's coordinates were NaN or infinite.
    #[error("record {index} has non-finite coordinates")]
    NonFiniteCoordinate {
        /// Zero-based position of the record.
        index: usize,
    },
    /// Opening the table file failed.
    #[error("failed to open feature domain table at {path}")]
    OpenFile {
        /// Requested file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The table file was not a JSON array of records.
    #[error("failed to parse feature domain table at {path}")]
    Parse {
        /// Requested file path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
}
