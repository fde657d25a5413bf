//! In-memory catalog backing the ranking engine: snapshot documents, the
//! evaluation-log importer, and a [`CatalogSource`](crate::ranking::CatalogSource)
//! implementation over them.

mod import;
mod memory;
mod snapshot;

pub use import::evaluations_from_csv;
pub use memory::InMemoryCatalog;
pub use snapshot::{CatalogSnapshot, CourseRecord};

use crate::ranking::SourceError;

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Source(SourceError),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "failed to read catalog data: {}", err),
            CatalogError::Json(err) => write!(f, "invalid catalog snapshot: {}", err),
            CatalogError::Csv(err) => write!(f, "invalid evaluation log: {}", err),
            CatalogError::Source(err) => write!(f, "could not index catalog snapshot: {}", err),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Json(err) => Some(err),
            CatalogError::Csv(err) => Some(err),
            CatalogError::Source(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<SourceError> for CatalogError {
    fn from(err: SourceError) -> Self {
        Self::Source(err)
    }
}
