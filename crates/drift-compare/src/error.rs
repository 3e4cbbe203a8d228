//! The comparator's sole thrown error: everything else is expressed as
//! data in the returned diff.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("baseline format versions are incompatible: {source_version} vs {target_version}")]
    VersionIncompatible { source_version: String, target_version: String },
}
