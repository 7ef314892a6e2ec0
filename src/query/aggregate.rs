//! Grouped score averages.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::ingest::LongRecord;
use crate::subject::Subject;
use crate::tiers::TierKey;

/// Dimension to group records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Subject,
    Grade,
    Group,
}

/// A group key. Subjects and groups order by text, grades numerically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Subject(Subject),
    Grade(i64),
    Group(String),
}

impl GroupKey {
    fn of(record: &LongRecord, by: GroupBy) -> Option<Self> {
        match by {
            GroupBy::Subject => Some(GroupKey::Subject(record.subject)),
            GroupBy::Grade => Some(GroupKey::Grade(record.grade)),
            GroupBy::Group if record.group.is_empty() => None,
            GroupBy::Group => Some(GroupKey::Group(record.group.clone())),
        }
    }

    /// Tier rules a bar for this key is colored with.
    pub fn tier_key(&self) -> TierKey {
        match self {
            GroupKey::Subject(subject) => TierKey::Subject(*subject),
            GroupKey::Grade(_) | GroupKey::Group(_) => TierKey::Overall,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Subject(subject) => write!(f, "{subject}"),
            GroupKey::Grade(grade) => write!(f, "{grade}"),
            GroupKey::Group(group) => f.write_str(group),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Running sum and count for one key.
#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    sum: f64,
    count: usize,
}

/// Average score of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    pub key: GroupKey,
    pub average: f64,
    pub count: usize,
}

/// Averages `records` per key of `by`, sorted by key.
///
/// Keys with no numeric score are left out, so no average is ever NaN.
pub fn average_by<'a, I>(records: I, by: GroupBy) -> Vec<GroupAverage>
where
    I: IntoIterator<Item = &'a LongRecord>,
{
    let mut buckets: BTreeMap<GroupKey, Bucket> = BTreeMap::new();

    for record in records {
        let Some(key) = GroupKey::of(record, by) else {
            continue;
        };
        let bucket = buckets.entry(key).or_default();
        if record.score.is_finite() {
            bucket.sum += record.score;
            bucket.count += 1;
        }
    }

    buckets
        .into_iter()
        .filter(|(_, bucket)| bucket.count > 0)
        .map(|(key, bucket)| GroupAverage {
            key,
            average: bucket.sum / bucket.count as f64,
            count: bucket.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::classify;

    fn record(grade: i64, group: &str, subject: Subject, score: f64) -> LongRecord {
        LongRecord {
            calendar: "A".into(),
            test: "Simulacro 1".into(),
            grade,
            group: group.into(),
            cycle: classify(grade),
            student: "ANA".into(),
            subject,
            score,
        }
    }

    #[test]
    fn test_grades_sort_numerically() {
        let records = vec![
            record(10, "A", Subject::Matematicas, 3.0),
            record(9, "A", Subject::Matematicas, 4.0),
            record(3, "A", Subject::Matematicas, 2.0),
            record(9, "B", Subject::Matematicas, 2.0),
        ];
        let averages = average_by(&records, GroupBy::Grade);
        let keys: Vec<_> = averages.iter().map(|a| a.key.to_string()).collect();
        assert_eq!(keys, vec!["3", "9", "10"]);
        assert_eq!(averages[1].average, 3.0);
        assert_eq!(averages[1].count, 2);
    }

    #[test]
    fn test_subjects_sort_by_name() {
        let records = vec![
            record(5, "A", Subject::SocialesCiudadanas, 1.0),
            record(5, "A", Subject::CienciasNaturales, 2.0),
            record(5, "A", Subject::Matematicas, 3.0),
        ];
        let keys: Vec<_> = average_by(&records, GroupBy::Subject)
            .iter()
            .map(|a| a.key.to_string())
            .collect();
        assert_eq!(
            keys,
            vec!["CIENCIAS NATURALES", "MATEMÁTICAS", "SOCIALES Y CIUDADANAS"]
        );
    }

    #[test]
    fn test_groups_skip_empty_keys() {
        let records = vec![
            record(5, "B", Subject::Ingles, 4.0),
            record(5, "", Subject::Ingles, 1.0),
            record(5, "A", Subject::Ingles, 2.0),
        ];
        let averages = average_by(&records, GroupBy::Group);
        let keys: Vec<_> = averages.iter().map(|a| a.key.to_string()).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn test_non_numeric_scores_never_produce_nan() {
        let records = vec![
            record(5, "A", Subject::Ingles, f64::NAN),
            record(6, "A", Subject::Ingles, 3.0),
        ];
        let averages = average_by(&records, GroupBy::Grade);
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].key, GroupKey::Grade(6));
        assert!(averages.iter().all(|a| a.average.is_finite()));
    }

    #[test]
    fn test_empty_input() {
        assert!(average_by(&Vec::<LongRecord>::new(), GroupBy::Subject).is_empty());
    }

    #[test]
    fn test_tier_keys() {
        assert_eq!(
            GroupKey::Subject(Subject::Ingles).tier_key(),
            TierKey::Subject(Subject::Ingles)
        );
        assert_eq!(GroupKey::Grade(5).tier_key(), TierKey::Overall);
        assert_eq!(GroupKey::Group("A".into()).tier_key(), TierKey::Overall);
    }
}
