use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::iso_date;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => anyhow::bail!("unknown meal type: {other}"),
        }
    }
}

/// Row as stored in `food_entries`.
#[derive(Debug, FromRow)]
pub struct FoodEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    pub calories: Option<i32>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub serving_size: Option<String>,
    pub meal_type: String,
    pub entry_date: Date,
    pub created_at: OffsetDateTime,
}

/// One logged meal item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    #[serde(default)]
    pub calories: i64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub serving_size: Option<String>,
    #[serde(default)]
    pub meal_type: MealType,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<FoodEntryRow> for FoodEntry {
    fn from(r: FoodEntryRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            food_name: r.food_name,
            calories: r.calories.map(i64::from).unwrap_or(0),
            protein: r.protein.unwrap_or(0.0),
            carbs: r.carbs.unwrap_or(0.0),
            fat: r.fat.unwrap_or(0.0),
            serving_size: r.serving_size,
            meal_type: r.meal_type.parse().unwrap_or_default(),
            date: r.entry_date,
            created_at: r.created_at,
        }
    }
}

/// Validated input for an insert; numbers already coerced.
#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub user_id: Uuid,
    pub food_name: String,
    pub calories: i32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: Option<String>,
    pub meal_type: MealType,
    pub date: Date,
}
