use std::ops::RangeInclusive;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Program, WorkoutRecord};
use crate::store::{RecordStore, Synced};

pub const SETS_RANGE: RangeInclusive<u32> = 1..=5;
pub const REPS_RANGE: RangeInclusive<u32> = 1..=100;
pub const WEIGHT_RANGE: RangeInclusive<f64> = 0.0..=500.0;
pub const WEIGHT_STEP: f64 = 2.5;

pub const DEFAULT_SETS: u32 = 3;
pub const DEFAULT_REPS: u32 = 10;
pub const DEFAULT_WEIGHT: f64 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SetEntry {
    pub set_number: u32,
    pub completed: bool,
    pub reps: u32,
    pub weight: f64,
}

/// Entry state for one exercise of one session.
#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseForm {
    pub program: Program,
    pub exercise: String,
    pub sets: Vec<SetEntry>,
    previous: Option<Vec<WorkoutRecord>>,
}

impl ExerciseForm {
    /// A form whose sets default to what was done last time.
    pub fn seeded(program: Program, exercise: &str, previous: Option<Vec<WorkoutRecord>>) -> Self {
        let mut form = ExerciseForm {
            program,
            exercise: exercise.to_string(),
            sets: Vec::new(),
            previous,
        };
        form.resize(DEFAULT_SETS);
        form
    }

    /// Reps and weight of set `set_number` in the previous session, else the defaults.
    pub fn defaults_for(&self, set_number: u32) -> (u32, f64) {
        self.previous
            .as_deref()
            .and_then(|rows| rows.iter().find(|r| r.set_number == set_number))
            .map(|r| (r.reps, r.weight))
            .unwrap_or((DEFAULT_REPS, DEFAULT_WEIGHT))
    }

    /// Grows or shrinks the form to `count` sets, clamped to the allowed range.
    pub fn resize(&mut self, count: u32) {
        let count = count.clamp(*SETS_RANGE.start(), *SETS_RANGE.end());
        self.sets.truncate(count as usize);
        while (self.sets.len() as u32) < count {
            let set_number = self.sets.len() as u32 + 1;
            let (reps, weight) = self.defaults_for(set_number);
            self.sets.push(SetEntry {
                set_number,
                completed: false,
                reps,
                weight,
            });
        }
    }

    /// Records for every completed set, checking the numeric ranges.
    pub fn completed_records(&self, date: NaiveDate) -> Result<Vec<WorkoutRecord>> {
        self.sets
            .iter()
            .filter(|s| s.completed)
            .map(|s| {
                if !REPS_RANGE.contains(&s.reps) {
                    return Err(Error::OutOfRange {
                        field: "reps",
                        value: s.reps.to_string(),
                    });
                }
                if !WEIGHT_RANGE.contains(&s.weight) {
                    return Err(Error::OutOfRange {
                        field: "weight",
                        value: s.weight.to_string(),
                    });
                }
                Ok(WorkoutRecord::new(
                    date,
                    self.program,
                    self.exercise.clone(),
                    s.set_number,
                    s.reps,
                    s.weight,
                ))
            })
            .collect()
    }

    /// Appends every completed set; `None` when no set was completed.
    ///
    /// A set is unticked as soon as its record is stored, so retrying after a
    /// failed append only writes the sets that are still missing.
    pub fn save(
        &mut self,
        store: &dyn RecordStore,
        date: NaiveDate,
    ) -> Result<Option<Synced<Vec<WorkoutRecord>>>> {
        let records = self.completed_records(date)?;
        if records.is_empty() {
            return Ok(None);
        }

        let count = records.len();
        let mut saved: Option<Synced<Vec<WorkoutRecord>>> = None;
        for record in records {
            let set_number = record.set_number;
            let Synced { value, warnings } = store.append(record)?;
            if let Some(set) = self.sets.iter_mut().find(|s| s.set_number == set_number) {
                set.completed = false;
            }
            saved = Some(match saved {
                None => Synced { value, warnings },
                Some(mut prev) => {
                    prev.value = value;
                    prev.warnings.extend(warnings);
                    prev
                }
            });
        }
        info!(exercise = %self.exercise, sets = count, "saved exercise");
        Ok(saved)
    }
}
