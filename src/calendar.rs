use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Program, WorkoutRecord};
use crate::queries::workout_dates_by_date;

pub const WEEKDAYS: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

/// Weeks of a month, Monday first; `None` pads days outside the month.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<[Option<u32>; 7]>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let days = next_month.signed_duration_since(first).num_days() as u32;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = first.weekday().num_days_from_monday() as usize;
    for day in 1..=days {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    Some(weeks)
}

/// One month of the calendar view with the program logged on each day.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[Option<u32>; 7]>,
    pub workouts: BTreeMap<u32, Program>,
}

impl MonthView {
    pub fn build(records: &[WorkoutRecord], year: i32, month: u32) -> Option<MonthView> {
        let weeks = month_grid(year, month)?;
        let workouts = workout_dates_by_date(records)
            .into_iter()
            .filter(|(date, _)| date.year() == year && date.month() == month)
            .map(|(date, program)| (date.day(), program))
            .collect();
        Some(MonthView {
            year,
            month,
            weeks,
            workouts,
        })
    }

    pub fn program_on(&self, day: u32) -> Option<Program> {
        self.workouts.get(&day).copied()
    }
}
