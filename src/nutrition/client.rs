use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::dto::{FoodSearchHit, InstantResponse, ItemResponse, ScannedFood};
use super::mock::MockCatalog;
use crate::config::NutritionixConfig;

const SEARCH_LIMIT: usize = 15;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NutritionError {
    #[error("Food item not found with this barcode")]
    NotFound,
    /// 200 with an empty `foods` list; unlike a 404 this may fall back to the mock.
    #[error("No food found with this barcode")]
    NoMatch,
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("API error: {0}")]
    Api(StatusCode),
    #[error("Invalid response format from API")]
    InvalidResponse,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn lookup_upc(&self, upc: &str) -> Result<ScannedFood, NutritionError>;
    async fn search(&self, query: &str) -> Result<Vec<FoodSearchHit>, NutritionError>;
}

#[derive(Clone)]
pub struct NutritionixClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

impl NutritionixClient {
    pub fn new(cfg: &NutritionixConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            app_id: cfg.app_id.clone(),
            app_key: cfg.app_key.clone(),
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.app_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }
}

#[async_trait]
impl NutritionLookup for NutritionixClient {
    async fn lookup_upc(&self, upc: &str) -> Result<ScannedFood, NutritionError> {
        let res = self
            .get("/search/item")
            .query(&[("upc", upc)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(%status, %body, "nutritionix item lookup failed");
            return Err(match status {
                StatusCode::NOT_FOUND => NutritionError::NotFound,
                StatusCode::TOO_MANY_REQUESTS => NutritionError::RateLimited,
                other => NutritionError::Api(other),
            });
        }

        let data: ItemResponse = res.json().await?;
        let food = data
            .foods
            .into_iter()
            .next()
            .ok_or(NutritionError::NoMatch)?;
        debug!(%upc, food = %food.food_name, "nutritionix item found");
        Ok(food.into())
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodSearchHit>, NutritionError> {
        let res = self
            .get("/search/instant")
            .query(&[("query", query)])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(%status, %body, "nutritionix search failed");
            return Err(NutritionError::Api(status));
        }

        let data: InstantResponse = res.json().await?;
        let (Some(common), Some(branded)) = (data.common, data.branded) else {
            return Err(NutritionError::InvalidResponse);
        };
        Ok(branded
            .into_iter()
            .map(FoodSearchHit::from)
            .chain(common.into_iter().map(FoodSearchHit::from))
            .take(SEARCH_LIMIT)
            .collect())
    }
}

/// Nutritionix when configured, with the mock catalog as a stand-in.
///
/// Without credentials every call goes to the mock. With credentials, a
/// failed call falls back to the mock unless `strict` is set (production) or
/// the item simply does not exist.
pub struct FallbackLookup {
    primary: Option<Arc<dyn NutritionLookup>>,
    mock: MockCatalog,
    strict: bool,
}

impl FallbackLookup {
    pub fn new(primary: Option<Arc<dyn NutritionLookup>>, strict: bool) -> Self {
        Self {
            primary,
            mock: MockCatalog,
            strict,
        }
    }

    pub fn from_config(cfg: Option<&NutritionixConfig>, strict: bool) -> anyhow::Result<Self> {
        let primary = match cfg {
            Some(cfg) => Some(Arc::new(NutritionixClient::new(cfg)?) as Arc<dyn NutritionLookup>),
            None => {
                warn!("Nutritionix credentials are not set; using mock data");
                None
            }
        };
        Ok(Self::new(primary, strict))
    }

    fn falls_back(&self, err: &NutritionError) -> bool {
        !self.strict && !matches!(err, NutritionError::NotFound)
    }
}

#[async_trait]
impl NutritionLookup for FallbackLookup {
    async fn lookup_upc(&self, upc: &str) -> Result<ScannedFood, NutritionError> {
        let Some(primary) = &self.primary else {
            return self.mock.lookup_upc(upc).await;
        };
        match primary.lookup_upc(upc).await {
            Ok(food) => Ok(food),
            Err(e) if self.falls_back(&e) => {
                warn!(error = %e, %upc, "using mock data due to API error");
                self.mock.lookup_upc(upc).await
            }
            Err(e) => Err(e),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodSearchHit>, NutritionError> {
        let Some(primary) = &self.primary else {
            return self.mock.search(query).await;
        };
        match primary.search(query).await {
            Ok(hits) => Ok(hits),
            Err(e) if !self.strict => {
                warn!(error = %e, "using mock search results due to API error");
                self.mock.search(query).await
            }
            Err(e) => Err(e),
        }
    }
}
