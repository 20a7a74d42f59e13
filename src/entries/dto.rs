use serde::{Deserialize, Serialize};
use time::Date;

use super::lenient;
use super::repo_types::{FoodEntry, MealType};
use crate::analytics::DailyTotals;
use crate::dates::iso_date;

/// Body of `POST /entries`. Numbers are coerced, see [`lenient`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateEntryRequest {
    #[serde(default)]
    pub food_name: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub calories: i32,
    #[serde(default, deserialize_with = "lenient::real")]
    pub protein: f64,
    #[serde(default, deserialize_with = "lenient::real")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "lenient::real")]
    pub fat: f64,
    #[serde(default)]
    pub serving_size: Option<String>,
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub meal_type: MealType,
    pub entries: Vec<FoodEntry>,
}

/// Entries of one day grouped by meal, with the day's totals.
#[derive(Debug, Serialize)]
pub struct DayJournal {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub totals: DailyTotals,
    pub groups: Vec<MealGroup>,
}

impl DayJournal {
    /// Groups keep the incoming order of `entries`; empty meals are left out.
    pub fn build(date: Date, entries: Vec<FoodEntry>) -> Self {
        let totals = crate::analytics::daily_totals(&entries);
        let mut groups: Vec<MealGroup> = MealType::ALL
            .iter()
            .map(|&meal_type| MealGroup {
                meal_type,
                entries: Vec::new(),
            })
            .collect();
        for entry in entries {
            if let Some(g) = groups.iter_mut().find(|g| g.meal_type == entry.meal_type) {
                g.entries.push(entry);
            }
        }
        groups.retain(|g| !g.entries.is_empty());
        Self {
            date,
            totals,
            groups,
        }
    }
}
