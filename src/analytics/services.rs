use time::Date;
use tracing::error;
use uuid::Uuid;

use super::aggregate::{
    daily_totals, entry_streak, weekly_series, window_start, DailyTotals, WeeklySeries,
    STREAK_WINDOW_DAYS, WEEK_DAYS,
};
use super::dto::Dashboard;
use crate::entries::repo::EntryRepository;

// Each fetch degrades to its own zero value; one failure never hides the others.

pub async fn today_totals(repo: &dyn EntryRepository, user_id: Uuid, today: Date) -> DailyTotals {
    match repo.list_for_date(user_id, today).await {
        Ok(entries) => daily_totals(&entries),
        Err(e) => {
            error!(error = %e, %user_id, "fetching today's entries failed");
            DailyTotals::default()
        }
    }
}

pub async fn total_entries(repo: &dyn EntryRepository, user_id: Uuid) -> i64 {
    repo.count(user_id).await.unwrap_or_else(|e| {
        error!(error = %e, %user_id, "counting entries failed");
        0
    })
}

pub async fn week_calories(repo: &dyn EntryRepository, user_id: Uuid, today: Date) -> WeeklySeries {
    match repo
        .list_entries(user_id, window_start(today, WEEK_DAYS), today)
        .await
    {
        Ok(entries) => weekly_series(&entries, today),
        Err(e) => {
            error!(error = %e, %user_id, "fetching weekly entries failed");
            WeeklySeries::default()
        }
    }
}

pub async fn streak(repo: &dyn EntryRepository, user_id: Uuid, today: Date) -> u32 {
    match repo
        .list_entries(user_id, window_start(today, STREAK_WINDOW_DAYS), today)
        .await
    {
        Ok(entries) => entry_streak(&entries, today),
        Err(e) => {
            error!(error = %e, %user_id, "calculating streak failed");
            0
        }
    }
}

pub async fn dashboard(repo: &dyn EntryRepository, user_id: Uuid, today: Date) -> Dashboard {
    let (totals, total_entries, weekly_calories, streak) = tokio::join!(
        today_totals(repo, user_id, today),
        total_entries(repo, user_id),
        week_calories(repo, user_id, today),
        streak(repo, user_id, today),
    );
    Dashboard {
        date: today,
        today_calories: totals.calories,
        total_entries,
        macros: totals.into(),
        weekly_calories,
        streak,
    }
}
