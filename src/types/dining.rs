use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{
    lenient::{self, unavailable},
    response::ResponseShape,
};

/// Trip-wide dining recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningSet {
    #[serde(
        default,
        alias = "dining_recommendations",
        deserialize_with = "lenient::list"
    )]
    pub restaurants: Vec<Restaurant>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub food_districts: Vec<String>,
    #[serde(
        default,
        alias = "local_food_tips",
        deserialize_with = "lenient::text_list"
    )]
    pub local_tips: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub must_try: Vec<String>,
}

impl ResponseShape for DiningSet {
    const NAME: &'static str = "dining recommendations";
}

impl DiningSet {
    pub fn restaurants_for(&self, meal_type: MealType) -> impl Iterator<Item = &Restaurant> {
        self.restaurants
            .iter()
            .filter(move |restaurant| restaurant.meal_type == meal_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub cuisine: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub price_range: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub location: String,
    #[serde(
        default = "unavailable",
        alias = "speciality",
        deserialize_with = "lenient::text"
    )]
    pub specialty: String,
    #[serde(default)]
    pub meal_type: MealType,
    #[serde(
        default = "unavailable",
        alias = "estimated_cost_per_person",
        deserialize_with = "lenient::text"
    )]
    pub cost_per_person: String,
}

/// Meal slot a restaurant is recommended for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Other(String),
}

impl MealType {
    pub const SLOTS: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "breakfast" | "brunch" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" | "supper" => MealType::Dinner,
            "snack" | "snacks" => MealType::Snack,
            _ => MealType::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Other(raw) => raw,
        }
    }
}

impl Default for MealType {
    fn default() -> Self {
        MealType::Other(unavailable())
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MealType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MealType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(lenient::value_to_text(&value)
            .map(|text| MealType::parse(&text))
            .unwrap_or_default())
    }
}
