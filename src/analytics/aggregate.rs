use std::collections::BTreeSet;

use serde::Serialize;
use time::{Date, Duration};

use crate::dates::short_weekday;
use crate::entries::repo_types::FoodEntry;

/// Days in the weekly chart, today included.
pub const WEEK_DAYS: i64 = 7;
/// How far back the streak looks, today included.
pub const STREAK_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct DailyTotals {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl From<DailyTotals> for Macros {
    fn from(t: DailyTotals) -> Self {
        Self {
            protein: t.protein,
            carbs: t.carbs,
            fat: t.fat,
        }
    }
}

/// Chart-ready calories per day, oldest first. Either 7 points or empty.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct WeeklySeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

/// First day of the inclusive `[start, today]` range covering `days` calendar days.
/// Saturates at `Date::MIN` for days at the very start of the calendar.
pub fn window_start(today: Date, days: i64) -> Date {
    today
        .checked_sub(Duration::days(days - 1))
        .unwrap_or(Date::MIN)
}

pub fn daily_totals(entries: &[FoodEntry]) -> DailyTotals {
    entries.iter().fold(DailyTotals::default(), |mut acc, e| {
        acc.calories += e.calories;
        acc.protein += e.protein;
        acc.carbs += e.carbs;
        acc.fat += e.fat;
        acc
    })
}

pub fn weekly_series(entries: &[FoodEntry], today: Date) -> WeeklySeries {
    let start = window_start(today, WEEK_DAYS);
    let mut values = vec![0i64; WEEK_DAYS as usize];
    for e in entries {
        let offset = (e.date - start).whole_days();
        if (0..WEEK_DAYS).contains(&offset) {
            values[offset as usize] += e.calories;
        }
    }
    let labels = (0..WEEK_DAYS)
        .filter_map(|i| start.checked_add(Duration::days(i)))
        .map(short_weekday)
        .collect();
    WeeklySeries { labels, values }
}

/// Consecutive days with at least one entry, ending today or yesterday.
pub fn entry_streak(entries: &[FoodEntry], today: Date) -> u32 {
    let start = window_start(today, STREAK_WINDOW_DAYS);
    let days: BTreeSet<Date> = entries
        .iter()
        .map(|e| e.date)
        .filter(|d| *d >= start && *d <= today)
        .collect();

    let mut recent_first = days.into_iter().rev();
    let Some(mut prev) = recent_first.next() else {
        return 0;
    };
    if (today - prev).whole_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    for day in recent_first {
        if (prev - day).whole_days() != 1 {
            break;
        }
        streak += 1;
        prev = day;
    }
    streak
}
