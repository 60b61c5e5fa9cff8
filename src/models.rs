//models.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Column names of the persisted table, in file order.
pub const COLUMNS: [&str; 6] = [
    "Дата",
    "Тренировка",
    "Упражнение",
    "Подход",
    "Повторения",
    "Вес",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Program {
    #[serde(rename = "Тренировка A", alias = "A")]
    A,
    #[serde(rename = "Тренировка B", alias = "B")]
    B,
    #[serde(rename = "Тренировка C", alias = "C")]
    C,
    #[serde(rename = "Тренировка D", alias = "D")]
    D,
}

impl Program {
    /// Cycle order.
    pub const ALL: [Program; 4] = [Program::A, Program::B, Program::C, Program::D];

    pub fn next(self) -> Program {
        match self {
            Program::A => Program::B,
            Program::B => Program::C,
            Program::C => Program::D,
            Program::D => Program::A,
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Program::A => "A",
            Program::B => "B",
            Program::C => "C",
            Program::D => "D",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Program::A => "Тренировка A",
            Program::B => "Тренировка B",
            Program::C => "Тренировка C",
            Program::D => "Тренировка D",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One completed set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    #[serde(rename = "Дата", deserialize_with = "trimmed")]
    pub date: NaiveDate,
    #[serde(rename = "Тренировка")]
    pub program: Program,
    #[serde(rename = "Упражнение")]
    pub exercise: String,
    #[serde(rename = "Подход", deserialize_with = "count")]
    pub set_number: u32,
    #[serde(rename = "Повторения", deserialize_with = "count")]
    pub reps: u32,
    #[serde(rename = "Вес", deserialize_with = "trimmed")]
    pub weight: f64,
}

impl WorkoutRecord {
    pub fn new(
        date: NaiveDate,
        program: Program,
        exercise: impl Into<String>,
        set_number: u32,
        reps: u32,
        weight: f64,
    ) -> Self {
        WorkoutRecord {
            date,
            program,
            exercise: exercise.into(),
            set_number,
            reps,
            weight,
        }
    }
}

// Typed columns tolerate padding; the exercise name is kept verbatim.
fn trimmed<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(serde::de::Error::custom)
}

// Other tools sometimes write integer columns as "10.0".
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u32>() {
        return Ok(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err(serde::de::Error::custom(format!(
            "expected a whole number, got {raw:?}"
        ))),
    }
}
