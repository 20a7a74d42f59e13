use anyhow::Context;
use serde::Deserialize;
use time::UtcOffset;

pub const DEFAULT_NUTRITIONIX_URL: &str = "https://trackapi.nutritionix.com/v2";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Credentials for the Nutritionix API. Absent when the app runs on the mock catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct NutritionixConfig {
    pub app_id: String,
    pub app_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub nutritionix: Option<NutritionixConfig>,
    pub production: bool,
    pub utc_offset_minutes: i32,
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("missing environment variable {name}"))
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = required("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "calorie-journal".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "calorie-journal-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };

        let nutritionix = match (
            std::env::var("NUTRITIONIX_APP_ID").ok().filter(|v| !v.is_empty()),
            std::env::var("NUTRITIONIX_APP_KEY").ok().filter(|v| !v.is_empty()),
        ) {
            (Some(app_id), Some(app_key)) => Some(NutritionixConfig {
                app_id,
                app_key,
                base_url: std::env::var("NUTRITIONIX_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_NUTRITIONIX_URL.into()),
            }),
            _ => None,
        };

        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let utc_offset_minutes = std::env::var("APP_UTC_OFFSET_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(0);

        Ok(Self {
            database_url,
            jwt,
            nutritionix,
            production,
            utc_offset_minutes,
        })
    }

    /// Offset that decides which calendar day is "today". Out-of-range values fall back to UTC.
    pub fn utc_offset(&self) -> UtcOffset {
        UtcOffset::from_whole_seconds(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or(UtcOffset::UTC)
    }
}
