//! Semicolon-delimited parser for wide score exports.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::subject::Subject;

const CALENDAR_COLUMNS: &[&str] = &["Calandario", "Calendario"];
const TEST_COLUMN: &str = "prueba";
const GRADE_COLUMN: &str = "grado";
const GROUP_COLUMN: &str = "grupo";
const STUDENT_COLUMN: &str = "Estudiante";

/// One row of the export: a student's sitting of one test.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub calendar: Option<String>,
    pub test: Option<String>,
    pub grade: Option<i64>,
    pub group: Option<String>,
    pub student: Option<String>,
    /// Subjects whose cell is present in the row, with the parsed score when
    /// the cell held a number.
    pub scores: Vec<(Subject, Option<f64>)>,
}

/// Header positions resolved once per file.
struct Columns {
    calendar: Option<usize>,
    test: Option<usize>,
    grade: Option<usize>,
    group: Option<usize>,
    student: Option<usize>,
    subjects: Vec<(Subject, usize)>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let position_of = |name: &str| headers.iter().position(|h| h == name);
        Self {
            calendar: CALENDAR_COLUMNS.iter().find_map(|name| position_of(*name)),
            test: position_of(TEST_COLUMN),
            grade: position_of(GRADE_COLUMN),
            group: position_of(GROUP_COLUMN),
            student: position_of(STUDENT_COLUMN),
            subjects: Subject::ALL
                .into_iter()
                .filter_map(|subject| position_of(subject.column_name()).map(|idx| (subject, idx)))
                .collect(),
        }
    }
}

/// Parses normalized export text (decimal points, `;` separators) into rows.
///
/// The first line names the columns. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if the header row cannot be read or a record is malformed.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(Trim::Fields)
        .from_reader(text.as_bytes());

    let headers = rdr.headers().context("failed to read header row")?.clone();
    let columns = Columns::from_headers(&headers);
    debug!(
        columns = headers.len(),
        subjects = columns.subjects.len(),
        "Header parsed"
    );

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("malformed record {}", idx + 1))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(row_from_record(&record, &columns));
    }

    Ok(rows)
}

fn row_from_record(record: &StringRecord, columns: &Columns) -> RawRow {
    let text = |idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    RawRow {
        calendar: text(columns.calendar),
        test: text(columns.test),
        grade: columns
            .grade
            .and_then(|i| record.get(i))
            .and_then(parse_grade),
        group: text(columns.group),
        student: text(columns.student),
        scores: columns
            .subjects
            .iter()
            .filter_map(|&(subject, i)| record.get(i).map(|v| (subject, parse_score(v))))
            .collect(),
    }
}

/// Reads a grade cell as an integer; `"5"` and `"5.0"` are both grade 5.
pub fn parse_grade(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(grade) = value.parse::<i64>() {
        return Some(grade);
    }
    let float = value.parse::<f64>().ok()?;
    if float.is_finite() && float.fract() == 0.0 {
        Some(float as i64)
    } else {
        None
    }
}

/// Reads a score cell; anything that is not a finite number is `None`.
pub fn parse_score(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
