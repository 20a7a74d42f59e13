use serde::{Deserialize, Serialize};

/// Nutrition facts of one scanned product, in the app's own field names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScannedFood {
    pub food_name: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub serving_qty: Option<f64>,
    #[serde(default)]
    pub serving_unit: Option<String>,
    #[serde(default)]
    pub serving_weight_grams: Option<f64>,
    #[serde(default)]
    pub calories: Option<i64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub total_fat: Option<f64>,
    #[serde(default)]
    pub total_carbohydrate: Option<f64>,
    #[serde(default)]
    pub sugars: Option<f64>,
    #[serde(default)]
    pub fiber: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodSearchHit {
    pub food_name: String,
    pub brand_name: String,
    pub image: Option<String>,
    pub serving_unit: String,
    pub calories: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

// ---- Nutritionix wire types ----

#[derive(Debug, Deserialize)]
pub(crate) struct ItemResponse {
    #[serde(default)]
    pub foods: Vec<NixFood>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NixFood {
    pub food_name: String,
    pub brand_name: Option<String>,
    pub serving_qty: Option<f64>,
    pub serving_unit: Option<String>,
    pub serving_weight_grams: Option<f64>,
    pub nf_calories: Option<f64>,
    pub nf_protein: Option<f64>,
    pub nf_total_fat: Option<f64>,
    pub nf_total_carbohydrate: Option<f64>,
    pub nf_sugars: Option<f64>,
    pub nf_dietary_fiber: Option<f64>,
}

impl From<NixFood> for ScannedFood {
    fn from(f: NixFood) -> Self {
        Self {
            food_name: f.food_name,
            brand_name: f.brand_name,
            serving_qty: f.serving_qty,
            serving_unit: f.serving_unit,
            serving_weight_grams: f.serving_weight_grams,
            calories: f.nf_calories.map(|c| c.round() as i64),
            protein: f.nf_protein,
            total_fat: f.nf_total_fat,
            total_carbohydrate: f.nf_total_carbohydrate,
            sugars: f.nf_sugars,
            fiber: f.nf_dietary_fiber,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstantResponse {
    pub common: Option<Vec<NixCommon>>,
    pub branded: Option<Vec<NixBranded>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NixPhoto {
    pub thumb: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NixCommon {
    pub food_name: String,
    pub photo: Option<NixPhoto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NixBranded {
    pub food_name: String,
    pub brand_name: Option<String>,
    pub photo: Option<NixPhoto>,
    pub serving_unit: Option<String>,
    pub nf_calories: Option<f64>,
}

impl From<NixBranded> for FoodSearchHit {
    fn from(b: NixBranded) -> Self {
        Self {
            food_name: b.food_name,
            brand_name: b.brand_name.unwrap_or_default(),
            image: b.photo.and_then(|p| p.thumb),
            serving_unit: b.serving_unit.unwrap_or_else(|| "serving".into()),
            calories: b.nf_calories,
        }
    }
}

impl From<NixCommon> for FoodSearchHit {
    fn from(c: NixCommon) -> Self {
        Self {
            food_name: c.food_name,
            brand_name: "Generic".into(),
            image: c.photo.and_then(|p| p.thumb),
            serving_unit: "serving".into(),
            calories: None,
        }
    }
}
