//! Selection criteria over long records.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::cycle::Cycle;
use crate::ingest::LongRecord;
use crate::subject::Subject;

/// Wildcard spellings accepted on input, in both Spanish genders and English.
const WILDCARDS: &[&str] = &["all", "todos", "todas"];

/// Either a specific value or the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if WILDCARDS.iter().any(|w| w.eq_ignore_ascii_case(s)) {
            return Ok(Selection::All);
        }
        s.parse::<T>()
            .map(Selection::Only)
            .map_err(|e| anyhow::anyhow!("invalid selection '{s}': {e}"))
    }
}

/// The five selection inputs of a query.
///
/// An unset calendar matches no record at all; pass `Selection::All`
/// explicitly to cover every calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub calendar: Option<Selection<String>>,
    pub test: Selection<String>,
    pub cycle: Selection<Cycle>,
    pub grade: Selection<i64>,
    pub subject: Selection<Subject>,
}

impl FilterCriteria {
    pub fn matches(&self, record: &LongRecord) -> bool {
        let calendar_ok = match &self.calendar {
            None => false,
            Some(Selection::Only(calendar)) if calendar.is_empty() => false,
            Some(selection) => selection.matches(&record.calendar),
        };

        calendar_ok
            && self.test.matches(&record.test)
            && self.cycle.matches(&record.cycle)
            && self.grade.matches(&record.grade)
            && self.subject.matches(&record.subject)
    }

    /// Records matching every criterion, in their original order.
    pub fn apply<'a>(&self, records: &'a [LongRecord]) -> Vec<&'a LongRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::classify;

    fn record(calendar: &str, grade: i64, subject: Subject) -> LongRecord {
        LongRecord {
            calendar: calendar.into(),
            test: "Simulacro 1".into(),
            grade,
            group: "A".into(),
            cycle: classify(grade),
            student: "ANA".into(),
            subject,
            score: 3.0,
        }
    }

    fn open_criteria() -> FilterCriteria {
        FilterCriteria {
            calendar: Some(Selection::All),
            ..Default::default()
        }
    }

    #[test]
    fn test_unset_calendar_matches_nothing() {
        let r = record("A", 5, Subject::Matematicas);
        assert!(!FilterCriteria::default().matches(&r));

        let empty = FilterCriteria {
            calendar: Some(Selection::Only(String::new())),
            ..Default::default()
        };
        assert!(!empty.matches(&record("", 5, Subject::Matematicas)));
    }

    #[test]
    fn test_wildcards_match_everything() {
        let criteria = open_criteria();
        assert!(criteria.matches(&record("A", 5, Subject::Matematicas)));
        assert!(criteria.matches(&record("B", 11, Subject::Ingles)));
    }

    #[test]
    fn test_exact_criteria() {
        let criteria = FilterCriteria {
            calendar: Some(Selection::Only("A".into())),
            grade: Selection::Only(9),
            subject: Selection::Only(Subject::Ingles),
            ..Default::default()
        };
        assert!(criteria.matches(&record("A", 9, Subject::Ingles)));
        assert!(!criteria.matches(&record("B", 9, Subject::Ingles)));
        assert!(!criteria.matches(&record("A", 8, Subject::Ingles)));
        assert!(!criteria.matches(&record("A", 9, Subject::Matematicas)));
    }

    #[test]
    fn test_cycle_criterion() {
        let criteria = FilterCriteria {
            cycle: Selection::Only(Cycle::IV),
            ..open_criteria()
        };
        assert!(criteria.matches(&record("A", 8, Subject::Ingles)));
        assert!(!criteria.matches(&record("A", 10, Subject::Ingles)));
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!("todos".parse::<Selection<i64>>().unwrap(), Selection::All);
        assert_eq!("ALL".parse::<Selection<i64>>().unwrap(), Selection::All);
        assert_eq!("9".parse::<Selection<i64>>().unwrap(), Selection::Only(9));
        assert_eq!(
            "MATEMÁTICAS".parse::<Selection<Subject>>().unwrap(),
            Selection::Only(Subject::Matematicas)
        );
        assert_eq!(
            "Ciclo-II".parse::<Selection<Cycle>>().unwrap(),
            Selection::Only(Cycle::II)
        );
        assert!("nine".parse::<Selection<i64>>().is_err());
    }

    #[test]
    fn test_apply_preserves_order() {
        let records = vec![
            record("A", 3, Subject::Matematicas),
            record("B", 3, Subject::Matematicas),
            record("A", 9, Subject::Ingles),
        ];
        let criteria = FilterCriteria {
            calendar: Some(Selection::Only("A".into())),
            ..Default::default()
        };
        let matched = criteria.apply(&records);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].grade, 3);
        assert_eq!(matched[1].grade, 9);
    }
}
