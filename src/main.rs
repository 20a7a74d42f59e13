mod analytics;
mod app;
mod auth;
mod config;
mod dates;
mod entries;
mod nutrition;
mod profiles;
mod scans;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "calorie_journal=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;
    tracing::info!(
        production = state.config.production,
        nutritionix = state.config.nutritionix.is_some(),
        utc_offset_minutes = state.config.utc_offset_minutes,
        "configuration loaded"
    );

    if let Err(e) = sqlx::migrate!("./migrations").run(&state.db).await {
        tracing::error!(error = %e, "database migration failed; continuing");
    }

    app::serve(app::build_app(state)).await
}
