use std::io::Read;

use serde::Deserialize;

use super::CatalogError;
use crate::ranking::{CourseId, CriterionTypeId, Evaluation, EvaluationKind};

#[derive(Debug, Deserialize)]
struct EvaluationRow {
    course_id: u64,
    criteria_type_id: u32,
    #[serde(rename = "type")]
    kind: String,
}

/// Read an evaluation log export (`course_id,criteria_type_id,type` headers;
/// extra columns are ignored).
pub fn evaluations_from_csv<R: Read>(reader: R) -> Result<Vec<Evaluation>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut evaluations = Vec::new();

    for record in csv_reader.deserialize::<EvaluationRow>() {
        let row = record?;
        evaluations.push(Evaluation {
            course_id: CourseId(row.course_id),
            criteria_type_id: CriterionTypeId(row.criteria_type_id),
            kind: EvaluationKind::from_label(&row.kind),
        });
    }

    Ok(evaluations)
}
