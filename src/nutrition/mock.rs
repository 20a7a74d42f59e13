use async_trait::async_trait;

use super::client::{NutritionError, NutritionLookup};
use super::dto::{FoodSearchHit, ScannedFood};

const MOCK_SEARCH_LIMIT: usize = 5;

/// Offline catalog used when the Nutritionix API is not configured or unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockCatalog;

#[allow(clippy::too_many_arguments)]
fn item(
    food_name: &str,
    brand_name: &str,
    serving_unit: &str,
    serving_weight_grams: f64,
    calories: i64,
    protein: f64,
    total_fat: f64,
    total_carbohydrate: f64,
    sugars: f64,
    fiber: f64,
) -> ScannedFood {
    ScannedFood {
        food_name: food_name.into(),
        brand_name: Some(brand_name.into()),
        serving_qty: Some(1.0),
        serving_unit: Some(serving_unit.into()),
        serving_weight_grams: Some(serving_weight_grams),
        calories: Some(calories),
        protein: Some(protein),
        total_fat: Some(total_fat),
        total_carbohydrate: Some(total_carbohydrate),
        sugars: Some(sugars),
        fiber: Some(fiber),
    }
}

impl MockCatalog {
    pub fn food_by_upc(&self, upc: &str) -> ScannedFood {
        match upc {
            "049000000443" => item(
                "Cola, Coca-Cola", "Coca-Cola", "can (12 fl oz)", 368.0, 140, 0.0, 0.0, 39.0,
                39.0, 0.0,
            ),
            "021130126026" => item(
                "Cheerios, Original", "General Mills", "cup (28g)", 28.0, 100, 3.0, 2.0, 20.0,
                1.0, 3.0,
            ),
            "884912129161" => item(
                "Nuts & Spices Bar, Dark Chocolate Nuts & Sea Salt", "KIND", "bar (40g)", 40.0,
                200, 6.0, 15.0, 16.0, 5.0, 7.0,
            ),
            other => item(
                &format!("Food Item (UPC: {other})"),
                "Generic Brand",
                "serving",
                100.0,
                250,
                5.0,
                10.0,
                30.0,
                15.0,
                2.0,
            ),
        }
    }

    pub fn search_foods(&self, query: &str) -> Vec<FoodSearchHit> {
        const FOODS: [(&str, &str, &str, f64); 8] = [
            ("Apple", "Generic", "medium (182g)", 95.0),
            ("Banana", "Generic", "medium (118g)", 105.0),
            ("Orange", "Generic", "medium (131g)", 62.0),
            ("Pizza, Pepperoni", "Domino's", "slice (107g)", 313.0),
            ("Chicken Breast", "Generic", "3 oz (85g)", 142.0),
            ("Salmon", "Generic", "3 oz (85g)", 175.0),
            ("Brown Rice", "Generic", "1 cup cooked (195g)", 216.0),
            ("Yogurt, Greek", "Chobani", "1 container (170g)", 100.0),
        ];
        let needle = query.to_lowercase();
        FOODS
            .iter()
            .filter(|(name, brand, _, _)| {
                name.to_lowercase().contains(&needle) || brand.to_lowercase().contains(&needle)
            })
            .take(MOCK_SEARCH_LIMIT)
            .map(|&(name, brand, unit, calories)| FoodSearchHit {
                food_name: name.into(),
                brand_name: brand.into(),
                image: None,
                serving_unit: unit.into(),
                calories: Some(calories),
            })
            .collect()
    }
}

#[async_trait]
impl NutritionLookup for MockCatalog {
    async fn lookup_upc(&self, upc: &str) -> Result<ScannedFood, NutritionError> {
        Ok(self.food_by_upc(upc))
    }

    async fn search(&self, query: &str) -> Result<Vec<FoodSearchHit>, NutritionError> {
        Ok(self.search_foods(query))
    }
}
