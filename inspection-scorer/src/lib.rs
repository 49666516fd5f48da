//! Location-risk scoring for the inspection map.
//!
//! A [`FeatureDomainTable`] holds per-location violation counts. The
//! [`DomainTableScorer`] looks up a clicked coordinate in that table and
//! combines the min-max normalised violation count, longitude, and latitude
//! into a score in `0.0..=1.0`. It implements
//! [`LocationScorer`](inspection_core::LocationScorer) so a
//! [`MapSession`](inspection_core::MapSession) can use it directly.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use inspection_core::MapSession;
//! use inspection_scorer::{DomainTableScorer, FeatureDomainTable};
//!
//! let table = FeatureDomainTable::load(Utf8Path::new("data/domain.json"))
//!     .expect("load domain table");
//! let session = MapSession::new(DomainTableScorer::new(table));
//! assert!(session.selection().is_none());
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod scorer;
mod table;

pub use error::DomainTableError;
pub use scorer::{DomainTableScorer, LocationWeights};
pub use table::{DomainBounds, FeatureDomainTable, LocationRecord, Span};
