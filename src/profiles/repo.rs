use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_CALORIE_GOAL: i32 = 2000;
pub const DEFAULT_PROTEIN_GOAL: i32 = 120;
pub const DEFAULT_CARBS_GOAL: i32 = 250;
pub const DEFAULT_FAT_GOAL: i32 = 70;

/// Display name and daily targets of a user.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Profile {
    pub user_id: Uuid,
    pub username: Option<String>,
    pub daily_calorie_goal: i32,
    pub daily_protein_goal: i32,
    pub daily_carbs_goal: i32,
    pub daily_fat_goal: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Profile {
    /// What a user sees before saving a profile.
    pub fn defaults(user_id: Uuid) -> Self {
        Self {
            user_id,
            username: None,
            daily_calorie_goal: DEFAULT_CALORIE_GOAL,
            daily_protein_goal: DEFAULT_PROTEIN_GOAL,
            daily_carbs_goal: DEFAULT_CARBS_GOAL,
            daily_fat_goal: DEFAULT_FAT_GOAL,
            updated_at: None,
        }
    }

    pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, username, daily_calorie_goal, daily_protein_goal,
                   daily_carbs_goal, daily_fat_goal, updated_at
              FROM profiles
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("load profile")?;
        Ok(profile)
    }

    /// Inserts the profile or overwrites the stored one.
    pub async fn upsert(db: &PgPool, p: &Profile) -> anyhow::Result<Profile> {
        let saved = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles
                (user_id, username, daily_calorie_goal, daily_protein_goal,
                 daily_carbs_goal, daily_fat_goal, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            ON CONFLICT (user_id) DO UPDATE SET
                username = EXCLUDED.username,
                daily_calorie_goal = EXCLUDED.daily_calorie_goal,
                daily_protein_goal = EXCLUDED.daily_protein_goal,
                daily_carbs_goal = EXCLUDED.daily_carbs_goal,
                daily_fat_goal = EXCLUDED.daily_fat_goal,
                updated_at = now()
            RETURNING user_id, username, daily_calorie_goal, daily_protein_goal,
                      daily_carbs_goal, daily_fat_goal, updated_at
            "#,
        )
        .bind(p.user_id)
        .bind(p.username.as_deref())
        .bind(p.daily_calorie_goal)
        .bind(p.daily_protein_goal)
        .bind(p.daily_carbs_goal)
        .bind(p.daily_fat_goal)
        .fetch_one(db)
        .await
        .context("upsert profile")?;
        Ok(saved)
    }
}
