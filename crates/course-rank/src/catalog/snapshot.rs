use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::ranking::{
    Category, CategoryId, CourseId, Criterion, CriterionType, Evaluation, PfrProfile, RecordStatus,
};

/// Course row as exported by the catalog, referencing its category by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub status: RecordStatus,
    #[serde(default)]
    pub pfr: PfrProfile,
}

/// Point-in-time export of everything a ranking call reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub criterion_types: Vec<CriterionType>,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
    #[serde(default)]
    pub evaluations: Vec<Evaluation>,
}

impl CatalogSnapshot {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
