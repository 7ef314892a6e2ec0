//! Wide-to-long reshaping of parsed rows.

use serde::Serialize;
use tracing::debug;

use crate::cycle::{Cycle, classify};
use crate::ingest::parser::RawRow;
use crate::subject::Subject;

/// One student's score in one subject for one test sitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    pub calendar: String,
    pub test: String,
    pub grade: i64,
    pub group: String,
    pub cycle: Cycle,
    pub student: String,
    pub subject: Subject,
    /// Missing or unparsable scores are stored as 0.
    pub score: f64,
}

/// Emits one record per subject cell present in `row`.
///
/// Rows without a grade (blank, non-integer, or 0) yield nothing.
pub fn pivot_row(row: &RawRow) -> Vec<LongRecord> {
    let grade = match row.grade {
        Some(grade) if grade != 0 => grade,
        _ => return Vec::new(),
    };
    let cycle = classify(grade);

    row.scores
        .iter()
        .map(|&(subject, score)| LongRecord {
            calendar: row.calendar.clone().unwrap_or_default(),
            test: row.test.clone().unwrap_or_default(),
            grade,
            group: row.group.clone().unwrap_or_default(),
            cycle,
            student: row.student.clone().unwrap_or_default(),
            subject,
            score: score.unwrap_or(0.0),
        })
        .collect()
}

/// Pivots every row, dropping the ones without a grade.
pub fn pivot_rows(rows: &[RawRow]) -> Vec<LongRecord> {
    let mut records = Vec::with_capacity(rows.len() * Subject::ALL.len());
    let mut skipped = 0usize;

    for row in rows {
        let emitted = pivot_row(row);
        if emitted.is_empty() && row.grade.is_none_or(|g| g == 0) {
            skipped += 1;
        }
        records.extend(emitted);
    }

    if skipped > 0 {
        debug!(skipped, "Rows without a grade were dropped");
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(grade: Option<i64>, scores: Vec<(Subject, Option<f64>)>) -> RawRow {
        RawRow {
            calendar: Some("A".into()),
            test: Some("Simulacro 1".into()),
            grade,
            group: Some("A".into()),
            student: Some("ANA".into()),
            scores,
        }
    }

    #[test]
    fn test_one_record_per_present_subject() {
        let r = row(
            Some(5),
            vec![
                (Subject::Matematicas, Some(4.2)),
                (Subject::Ingles, Some(3.0)),
                (Subject::LecturaCritica, None),
            ],
        );
        let records = pivot_row(&r);
        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.calendar, "A");
            assert_eq!(record.test, "Simulacro 1");
            assert_eq!(record.grade, 5);
            assert_eq!(record.group, "A");
            assert_eq!(record.student, "ANA");
            assert_eq!(record.cycle, Cycle::II);
        }
        let subjects: Vec<_> = records.iter().map(|r| r.subject).collect();
        assert_eq!(
            subjects,
            vec![Subject::Matematicas, Subject::Ingles, Subject::LecturaCritica]
        );
    }

    #[test]
    fn test_missing_score_defaults_to_zero() {
        let records = pivot_row(&row(Some(8), vec![(Subject::Ingles, None)]));
        assert_eq!(records[0].score, 0.0);
        assert_eq!(records[0].cycle, Cycle::IV);
    }

    #[test]
    fn test_row_without_grade_is_dropped() {
        let scores = vec![(Subject::Matematicas, Some(4.0))];
        assert!(pivot_row(&row(None, scores.clone())).is_empty());
        assert!(pivot_row(&row(Some(0), scores)).is_empty());
    }

    #[test]
    fn test_out_of_range_grade_is_kept_with_sentinel_cycle() {
        let records = pivot_row(&row(Some(12), vec![(Subject::Matematicas, Some(4.0))]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cycle, Cycle::NotApplicable);
    }

    #[test]
    fn test_pivot_rows_flattens() {
        let rows = vec![
            row(Some(3), vec![(Subject::Matematicas, Some(1.0))]),
            row(None, vec![(Subject::Matematicas, Some(2.0))]),
            row(
                Some(9),
                vec![(Subject::Matematicas, Some(3.0)), (Subject::Ingles, Some(4.0))],
            ),
        ];
        let records = pivot_rows(&rows);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].grade, 3);
        assert_eq!(records[2].score, 4.0);
    }
}
