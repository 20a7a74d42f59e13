use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{FoodEntry, FoodEntryRow, NewFoodEntry};

/// Storage for food entries, always scoped to one user.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Entries with `start <= date <= end`, oldest date first.
    async fn list_entries(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<FoodEntry>>;
    /// Entries of one day, newest `created_at` first.
    async fn list_for_date(&self, user_id: Uuid, date: Date) -> anyhow::Result<Vec<FoodEntry>>;
    async fn insert(&self, entry: NewFoodEntry) -> anyhow::Result<FoodEntry>;
    /// Returns false when no entry with this id belongs to the user.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
    async fn count(&self, user_id: Uuid) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgEntryRepository {
    db: PgPool,
}

impl PgEntryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn list_entries(
        &self,
        user_id: Uuid,
        start: Date,
        end: Date,
    ) -> anyhow::Result<Vec<FoodEntry>> {
        let rows = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            SELECT id, user_id, food_name, calories, protein, carbs, fat,
                   serving_size, meal_type, entry_date, created_at
              FROM food_entries
             WHERE user_id = $1
               AND entry_date >= $2
               AND entry_date <= $3
             ORDER BY entry_date ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
        .context("list food entries by range")?;
        Ok(rows.into_iter().map(FoodEntry::from).collect())
    }

    async fn list_for_date(&self, user_id: Uuid, date: Date) -> anyhow::Result<Vec<FoodEntry>> {
        let rows = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            SELECT id, user_id, food_name, calories, protein, carbs, fat,
                   serving_size, meal_type, entry_date, created_at
              FROM food_entries
             WHERE user_id = $1 AND entry_date = $2
             ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await
        .context("list food entries by date")?;
        Ok(rows.into_iter().map(FoodEntry::from).collect())
    }

    async fn insert(&self, entry: NewFoodEntry) -> anyhow::Result<FoodEntry> {
        let row = sqlx::query_as::<_, FoodEntryRow>(
            r#"
            INSERT INTO food_entries
                (id, user_id, food_name, calories, protein, carbs, fat,
                 serving_size, meal_type, entry_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, food_name, calories, protein, carbs, fat,
                      serving_size, meal_type, entry_date, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.user_id)
        .bind(&entry.food_name)
        .bind(entry.calories)
        .bind(entry.protein)
        .bind(entry.carbs)
        .bind(entry.fat)
        .bind(entry.serving_size.as_deref())
        .bind(entry.meal_type.as_str())
        .bind(entry.date)
        .fetch_one(&self.db)
        .await
        .context("insert food entry")?;
        Ok(row.into())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM food_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete food entry")?;
        Ok(res.rows_affected() > 0)
    }

    async fn count(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM food_entries WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await
            .context("count food entries")?;
        Ok(n)
    }
}
