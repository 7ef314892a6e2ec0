//! Grade to academic cycle classification.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A coarse grouping of consecutive grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cycle {
    I,
    II,
    III,
    IV,
    V,
    /// Grade outside 1–11.
    NotApplicable,
}

/// Maps a grade to its cycle.
///
/// | Grades | Cycle     |
/// |--------|-----------|
/// | 1–3    | Cycle-I   |
/// | 4–5    | Cycle-II  |
/// | 6–7    | Cycle-III |
/// | 8–9    | Cycle-IV  |
/// | 10–11  | Cycle-V   |
/// | other  | N/A       |
pub fn classify(grade: i64) -> Cycle {
    match grade {
        1..=3 => Cycle::I,
        4..=5 => Cycle::II,
        6..=7 => Cycle::III,
        8..=9 => Cycle::IV,
        10..=11 => Cycle::V,
        _ => Cycle::NotApplicable,
    }
}

impl Cycle {
    pub fn label(self) -> &'static str {
        match self {
            Cycle::I => "Cycle-I",
            Cycle::II => "Cycle-II",
            Cycle::III => "Cycle-III",
            Cycle::IV => "Cycle-IV",
            Cycle::V => "Cycle-V",
            Cycle::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cycle {
    type Err = anyhow::Error;

    /// Accepts `Cycle-II` as well as the export's Spanish `Ciclo-II`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("N/A") {
            return Ok(Cycle::NotApplicable);
        }
        let numeral = s
            .strip_prefix("Cycle-")
            .or_else(|| s.strip_prefix("Ciclo-"))
            .ok_or_else(|| anyhow::anyhow!("unknown cycle '{s}'"))?;
        match numeral {
            "I" => Ok(Cycle::I),
            "II" => Ok(Cycle::II),
            "III" => Ok(Cycle::III),
            "IV" => Ok(Cycle::IV),
            "V" => Ok(Cycle::V),
            _ => anyhow::bail!("unknown cycle '{s}'"),
        }
    }
}

impl Serialize for Cycle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
