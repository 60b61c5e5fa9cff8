//! Derived views over a loaded snapshot
//!
//! Every function here is pure: it reads the records it is given and
//! returns a fresh value. Nothing is cached between calls.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;

use crate::models::{Program, WorkoutRecord};

/// Program logged on each date.
///
/// When more than one program shares a date, the record that comes last in
/// load order decides.
pub fn workout_dates_by_date(records: &[WorkoutRecord]) -> BTreeMap<NaiveDate, Program> {
    let mut dates = BTreeMap::new();
    for record in records {
        dates.insert(record.date, record.program);
    }
    dates
}

/// All sets of the most recent session of `exercise` under `program`.
pub fn previous_session(
    records: &[WorkoutRecord],
    program: Program,
    exercise: &str,
) -> Option<Vec<WorkoutRecord>> {
    let matching = || {
        records
            .iter()
            .filter(move |r| r.program == program && r.exercise == exercise)
    };
    let last_date = matching().map(|r| r.date).max()?;
    Some(matching().filter(|r| r.date == last_date).cloned().collect())
}

pub fn recommend_next_program(records: &[WorkoutRecord]) -> Program {
    workout_dates_by_date(records)
        .into_iter()
        .next_back()
        .map(|(_, program)| program.next())
        .unwrap_or(Program::A)
}

/// Best values of one exercise on one date.
///
/// `max_reps` and `max_weight` are independent maxima and may come from
/// different sets.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub max_reps: u32,
    pub max_weight: f64,
}

/// Per-date maxima of `exercise`, oldest first.
pub fn progress_series(records: &[WorkoutRecord], exercise: &str) -> Vec<ProgressPoint> {
    let mut by_date: BTreeMap<NaiveDate, ProgressPoint> = BTreeMap::new();
    for record in records.iter().filter(|r| r.exercise == exercise) {
        by_date
            .entry(record.date)
            .and_modify(|p| {
                p.max_reps = p.max_reps.max(record.reps);
                p.max_weight = p.max_weight.max(record.weight);
            })
            .or_insert_with(|| ProgressPoint {
                date: record.date,
                max_reps: record.reps,
                max_weight: record.weight,
            });
    }
    by_date.into_values().collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PercentChange {
    Percent(f64),
    InsufficientData,
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::Percent(p) => write!(f, "{p:.1}%"),
            PercentChange::InsufficientData => f.write_str("Недостаточно данных"),
        }
    }
}

/// Weight change from the first to the last point of `series`.
///
/// A zero starting weight reports 0% rather than infinity.
pub fn percent_change(series: &[ProgressPoint]) -> PercentChange {
    match series {
        [first, .., last] => {
            if first.max_weight > 0.0 {
                let delta = last.max_weight - first.max_weight;
                PercentChange::Percent(delta / first.max_weight * 100.0)
            } else {
                PercentChange::Percent(0.0)
            }
        }
        _ => PercentChange::InsufficientData,
    }
}

/// The three headline metrics shown next to the progress charts.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSummary {
    pub max_weight: f64,
    pub max_reps: u32,
    pub change: PercentChange,
}

pub fn progress_summary(series: &[ProgressPoint]) -> Option<ProgressSummary> {
    if series.is_empty() {
        return None;
    }
    Some(ProgressSummary {
        max_weight: series.iter().map(|p| p.max_weight).fold(f64::MIN, f64::max),
        max_reps: series.iter().map(|p| p.max_reps).max().unwrap_or(0),
        change: percent_change(series),
    })
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryFilter {
    pub program: Option<Program>,
    pub exercise: Option<String>,
}

impl HistoryFilter {
    fn matches(&self, record: &WorkoutRecord) -> bool {
        self.program.map_or(true, |p| record.program == p)
            && self.exercise.as_deref().map_or(true, |e| record.exercise == e)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionHistory {
    pub date: NaiveDate,
    pub program: Program,
    /// Exercises by name, each with its sets ordered by set number.
    pub exercises: Vec<(String, Vec<WorkoutRecord>)>,
}

/// Sessions matching `filter`, newest first, programs in cycle order within a date.
pub fn history(records: &[WorkoutRecord], filter: &HistoryFilter) -> Vec<SessionHistory> {
    let mut sessions: BTreeMap<(NaiveDate, Program), BTreeMap<String, Vec<WorkoutRecord>>> =
        BTreeMap::new();
    for record in records.iter().filter(|r| filter.matches(r)) {
        sessions
            .entry((record.date, record.program))
            .or_default()
            .entry(record.exercise.clone())
            .or_default()
            .push(record.clone());
    }

    let mut out: Vec<SessionHistory> = sessions
        .into_iter()
        .map(|((date, program), exercises)| SessionHistory {
            date,
            program,
            exercises: exercises
                .into_iter()
                .map(|(name, mut sets)| {
                    sets.sort_by_key(|r| r.set_number);
                    (name, sets)
                })
                .collect(),
        })
        .collect();
    // Dates descending, program ascending.
    out.sort_by(|a, b| b.date.cmp(&a.date).then(a.program.cmp(&b.program)));
    out
}

/// Rows of one exercise grouped by date, newest date first.
pub fn exercise_sessions(
    records: &[WorkoutRecord],
    exercise: &str,
) -> Vec<(NaiveDate, Vec<WorkoutRecord>)> {
    let dates: BTreeSet<NaiveDate> = records
        .iter()
        .filter(|r| r.exercise == exercise)
        .map(|r| r.date)
        .collect();
    dates
        .into_iter()
        .rev()
        .map(|date| {
            let rows = records
                .iter()
                .filter(|r| r.exercise == exercise && r.date == date)
                .cloned()
                .collect();
            (date, rows)
        })
        .collect()
}
