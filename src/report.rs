//! Presentation payloads: colored bar series and the per-student table.
//!
//! Rendering is left to whatever consumes these structures; this module only
//! decides their shape and colors.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::dataset::Dataset;
use crate::ingest::LongRecord;
use crate::query::{FilterCriteria, GroupAverage, GroupBy, Selection, average_by};
use crate::subject::Subject;
use crate::tiers::{TierConfig, TierKey};

/// One bar chart: labels, values and per-bar colors, index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub title: String,
    pub labels: Vec<String>,
    /// Averages rounded to two decimals.
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

impl BarSeries {
    /// Builds a series from sorted averages. Colors use the unrounded average.
    pub fn from_averages(
        title: impl Into<String>,
        averages: &[GroupAverage],
        tiers: &TierConfig,
    ) -> Self {
        Self {
            title: title.into(),
            labels: averages.iter().map(|a| a.key.to_string()).collect(),
            values: averages.iter().map(|a| round2(a.average)).collect(),
            colors: averages
                .iter()
                .map(|a| tiers.color(a.key.tier_key(), a.average).to_string())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A score cell of the student table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentCell {
    pub subject: Subject,
    pub score: f64,
    /// Two decimals with a decimal comma, e.g. `4,20`.
    pub text: String,
    /// Tier label, `N/A` when no band matches.
    pub tier: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRow {
    pub student: String,
    pub group: String,
    pub cells: Vec<StudentCell>,
}

/// One row per student, one column per known subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudentTable {
    pub subjects: Vec<Subject>,
    pub rows: Vec<StudentRow>,
}

impl StudentTable {
    /// Pivots records back to one row per trimmed student name, in first-seen order.
    ///
    /// The group comes from the student's first record. When a student has
    /// several records for one subject the last one wins; a subject with no
    /// record shows 0.
    pub fn build(records: &[&LongRecord], tiers: &TierConfig) -> Self {
        struct Pending<'a> {
            student: &'a str,
            group: &'a str,
            scores: HashMap<Subject, f64>,
        }

        let mut order: Vec<Pending<'_>> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for &record in records {
            let name = record.student.trim();
            let slot = *index.entry(name).or_insert_with(|| {
                order.push(Pending {
                    student: name,
                    group: &record.group,
                    scores: HashMap::new(),
                });
                order.len() - 1
            });
            order[slot].scores.insert(record.subject, record.score);
        }

        let rows = order
            .into_iter()
            .map(|pending| StudentRow {
                student: pending.student.to_string(),
                group: if pending.group.is_empty() {
                    "N/A".to_string()
                } else {
                    pending.group.to_string()
                },
                cells: Subject::ALL
                    .into_iter()
                    .map(|subject| {
                        let score = pending.scores.get(&subject).copied().unwrap_or(0.0);
                        let key = TierKey::Subject(subject);
                        StudentCell {
                            subject,
                            score,
                            text: decimal_comma(score),
                            tier: tiers.label(key, score).to_string(),
                            color: tiers.color(key, score).to_string(),
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            subjects: Subject::ALL.to_vec(),
            rows,
        }
    }
}

/// Everything a query produces when at least one record matched.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub criteria: FilterCriteria,
    pub matched: usize,
    pub charts: Vec<BarSeries>,
    pub table: StudentTable,
}

/// Result of running a query against a dataset.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    NoResults,
    Results(Dashboard),
}

/// Filters, aggregates, and shapes the dashboard for `criteria`.
///
/// Always charts averages by subject. The second chart is by grade when the
/// grade is wildcarded and by group within the selected grade otherwise.
/// Nothing is aggregated when no record matches.
pub fn run_query(dataset: &Dataset, criteria: &FilterCriteria) -> QueryOutcome {
    let matched = criteria.apply(&dataset.records);
    if matched.is_empty() {
        return QueryOutcome::NoResults;
    }

    let by_subject = average_by(matched.iter().copied(), GroupBy::Subject);
    let (title, by) = match criteria.grade {
        Selection::All => ("Average by grade".to_string(), GroupBy::Grade),
        Selection::Only(grade) => (format!("Average by group - grade {grade}"), GroupBy::Group),
    };
    let second = average_by(matched.iter().copied(), by);

    let charts = [
        BarSeries::from_averages("Average by subject", &by_subject, &dataset.tiers),
        BarSeries::from_averages(title, &second, &dataset.tiers),
    ]
    .into_iter()
    .filter(|series| !series.is_empty())
    .collect();

    QueryOutcome::Results(Dashboard {
        generated_at: Utc::now(),
        criteria: criteria.clone(),
        matched: matched.len(),
        charts,
        table: StudentTable::build(&matched, &dataset.tiers),
    })
}

/// Distinct values available for each selection input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub calendars: Vec<String>,
    pub tests: Vec<String>,
    /// Numeric order.
    pub grades: Vec<i64>,
    pub subjects: Vec<Subject>,
}

impl FilterOptions {
    pub fn from_records(records: &[LongRecord]) -> Self {
        let calendars: BTreeSet<&str> = records.iter().map(|r| r.calendar.as_str()).collect();
        let tests: BTreeSet<&str> = records.iter().map(|r| r.test.as_str()).collect();
        let grades: BTreeSet<i64> = records.iter().map(|r| r.grade).collect();
        let subjects: BTreeSet<Subject> = records.iter().map(|r| r.subject).collect();

        Self {
            calendars: calendars.into_iter().map(str::to_string).collect(),
            tests: tests.into_iter().map(str::to_string).collect(),
            grades: grades.into_iter().collect(),
            subjects: subjects.into_iter().collect(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats a score with two decimals and a decimal comma.
pub fn decimal_comma(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}
