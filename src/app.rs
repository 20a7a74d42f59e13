use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{analytics, auth, entries, nutrition, profiles, scans};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(entries::router())
                .merge(analytics::router())
                .merge(nutrition::router())
                .merge(scans::router())
                .merge(profiles::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!(%addr, "calorie journal listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::tokens::JwtKeys;

    fn bearer(state: &AppState, user_id: Uuid) -> String {
        let pair = JwtKeys::from_ref(state).issue_pair(user_id).unwrap();
        format!("Bearer {}", pair.access)
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            req = req.header(header::AUTHORIZATION, auth);
        }
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get_json(app: &Router, uri: &str, auth: &str) -> (StatusCode, Value) {
        call(app, Method::GET, uri, Some(auth), None).await
    }

    async fn post_json(app: &Router, uri: &str, auth: &str, body: Value) -> (StatusCode, Value) {
        call(app, Method::POST, uri, Some(auth), Some(body)).await
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn journal_routes_require_a_token() {
        let app = build_app(AppState::fake());
        for uri in ["/api/v1/entries", "/api/v1/dashboard", "/api/v1/scans/pending"] {
            let (status, _) = call(&app, Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        }
        let (status, _) = get_json(&app, "/api/v1/entries", "Bearer junk").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_token_is_not_a_bearer() {
        let state = AppState::fake();
        let refresh = JwtKeys::from_ref(&state)
            .issue_pair(Uuid::new_v4())
            .unwrap()
            .refresh;
        let app = build_app(state);
        let (status, _) = get_json(&app, "/api/v1/entries", &format!("Bearer {refresh}")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn add_list_and_delete_an_entry() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let app = build_app(state);

        let (status, created) = post_json(
            &app,
            "/api/v1/entries",
            &auth,
            json!({
                "food_name": "  Oatmeal ",
                "calories": "150kcal",
                "protein": "5.5",
                "carbs": 27,
                "fat": "",
                "meal_type": "breakfast",
                "date": "2024-01-10"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["food_name"], "Oatmeal");
        assert_eq!(created["calories"], 150);
        assert_eq!(created["fat"], 0.0);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, day) = get_json(&app, "/api/v1/entries?date=2024-01-10", &auth).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(day["totals"]["calories"], 150);
        assert_eq!(day["groups"][0]["meal_type"], "breakfast");

        let (status, other_day) = get_json(&app, "/api/v1/entries?date=2024-01-09", &auth).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(other_day["groups"].as_array().unwrap().len(), 0);

        let uri = format!("/api/v1/entries/{id}");
        let (status, _) = call(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::DELETE, &uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn entries_are_scoped_to_their_owner() {
        let state = AppState::fake();
        let owner = bearer(&state, Uuid::new_v4());
        let stranger = bearer(&state, Uuid::new_v4());
        let app = build_app(state);

        let (_, created) = post_json(
            &app,
            "/api/v1/entries",
            &owner,
            json!({"food_name": "Apple", "calories": 95, "date": "2024-01-10"}),
        )
        .await;
        let uri = format!("/api/v1/entries/{}", created["id"].as_str().unwrap());

        let (status, _) = call(&app, Method::DELETE, &uri, Some(&stranger), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, day) = get_json(&app, "/api/v1/entries?date=2024-01-10", &stranger).await;
        assert_eq!(day["totals"]["calories"], 0);
    }

    #[tokio::test]
    async fn blank_food_name_is_rejected() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let app = build_app(state);
        let body = json!({"food_name": "   ", "calories": 10});
        let (status, _) = post_json(&app, "/api/v1/entries", &auth, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn out_of_range_dates_are_client_errors() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let app = build_app(state);

        let (status, _) = get_json(&app, "/api/v1/dashboard?date=-9999-01-03", &auth).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json(&app, "/api/v1/entries?date=-9999-01-03", &auth).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = json!({"food_name": "Toast", "calories": 80, "date": "-9999-01-03"});
        let (status, _) = post_json(&app, "/api/v1/entries", &auth, body).await;
        assert!(status.is_client_error(), "{status}");
        let (_, day) = get_json(&app, "/api/v1/entries?date=2024-01-10", &auth).await;
        assert_eq!(day["totals"]["calories"], 0);

        let (status, dash) = get_json(&app, "/api/v1/dashboard?date=0001-01-01", &auth).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dash["streak"], 0);
        assert_eq!(dash["weekly_calories"]["values"], json!([0, 0, 0, 0, 0, 0, 0]));
    }

    #[tokio::test]
    async fn dashboard_reflects_logged_days() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let app = build_app(state);

        for (date, calories) in [("2024-01-09", 300), ("2024-01-10", 500), ("2024-01-10", 250)] {
            let body = json!({
                "food_name": "Meal",
                "calories": calories,
                "protein": 10,
                "date": date
            });
            let (status, _) = post_json(&app, "/api/v1/entries", &auth, body).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, dash) = get_json(&app, "/api/v1/dashboard?date=2024-01-10", &auth).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dash["date"], "2024-01-10");
        assert_eq!(dash["today_calories"], 750);
        assert_eq!(dash["total_entries"], 3);
        assert_eq!(dash["macros"]["protein"], 20.0);
        assert_eq!(dash["streak"], 2);
        let values = dash["weekly_calories"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 7);
        assert_eq!(values[5], 300);
        assert_eq!(values[6], 750);
        assert_eq!(dash["weekly_calories"]["labels"][6], "Wed");
    }

    #[tokio::test]
    async fn scan_handoff_is_taken_once() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let app = build_app(state);

        let (status, food) = get_json(&app, "/api/v1/foods/upc/021130126026", &auth).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(food["food_name"], "Cheerios, Original");

        let (status, _) = post_json(&app, "/api/v1/scans/pending", &auth, food).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, draft) = get_json(&app, "/api/v1/scans/pending", &auth).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(draft["food_name"], "Cheerios, Original");
        assert_eq!(draft["calories"], 100);
        assert_eq!(draft["serving_size"], "1 cup (28g)");

        let (status, _) = get_json(&app, "/api/v1/scans/pending", &auth).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn food_lookup_validates_input() {
        let state = AppState::fake();
        let auth = bearer(&state, Uuid::new_v4());
        let app = build_app(state);

        let (status, _) = get_json(&app, "/api/v1/foods/upc/12ab", &auth).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_json(&app, "/api/v1/foods/search?q=%20", &auth).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, hits) = get_json(&app, "/api/v1/foods/search?q=banana", &auth).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hits.as_array().unwrap().len(), 1);
    }
}
