//! The fixed catalog of subject columns found in score exports.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Tier-config key used for anything that is not a subject (grade and group averages).
pub const OVERALL_TIER_KEY: &str = "puntaje_global";

/// A subject column of the wide export.
///
/// Ordering follows the column name so sorted subject lists match what the
/// header text would sort to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    LecturaCritica,
    Matematicas,
    CienciasNaturales,
    SocialesCiudadanas,
    Ingles,
}

impl Subject {
    /// Every known subject, in export column order.
    pub const ALL: [Subject; 5] = [
        Subject::LecturaCritica,
        Subject::Matematicas,
        Subject::CienciasNaturales,
        Subject::SocialesCiudadanas,
        Subject::Ingles,
    ];

    /// Header text of the subject's column. Matched exactly.
    pub fn column_name(self) -> &'static str {
        match self {
            Subject::LecturaCritica => "LECTURA CRÍTICA",
            Subject::Matematicas => "MATEMÁTICAS",
            Subject::CienciasNaturales => "CIENCIAS NATURALES",
            Subject::SocialesCiudadanas => "SOCIALES Y CIUDADANAS",
            Subject::Ingles => "INGLÉS",
        }
    }

    /// Key of the subject's rule sequence in the tier document.
    pub fn tier_key(self) -> &'static str {
        match self {
            Subject::LecturaCritica => "Lenguaje",
            Subject::Matematicas => "matematicas",
            Subject::CienciasNaturales => "ciencias_naturales",
            Subject::SocialesCiudadanas => "sociales_ciudadanas",
            Subject::Ingles => "ingles",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Subject {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.column_name() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown subject '{s}'"))
    }
}

impl PartialOrd for Subject {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Subject {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.column_name().cmp(other.column_name())
    }
}

impl Serialize for Subject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column_name())
    }
}
