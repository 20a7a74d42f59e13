use serde::{Deserialize, Serialize};
use time::Date;

use super::aggregate::{Macros, WeeklySeries};
use crate::dates::iso_date;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub today_calories: i64,
    pub total_entries: i64,
    pub macros: Macros,
    pub weekly_calories: WeeklySeries,
    pub streak: u32,
}
