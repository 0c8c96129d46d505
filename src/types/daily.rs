use serde::{Deserialize, Serialize};

use super::{
    lenient::{self, unavailable},
    response::ResponseShape,
};

/// Plan for a single day of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    /// 1-based day index; the pipeline pins this to the requested day
    #[serde(default, deserialize_with = "ordinal")]
    pub day: u32,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub theme: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub activities: Vec<Activity>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub meals: Vec<Meal>,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub transportation: String,
    #[serde(
        default = "unavailable",
        alias = "daily_budget_used",
        deserialize_with = "lenient::text"
    )]
    pub total_cost: String,
}

impl ResponseShape for DailyPlan {
    const NAME: &'static str = "daily plan";
}

impl DailyPlan {
    /// Locations of the day's activities, skipping ones the service left blank
    pub fn activity_locations(&self) -> impl Iterator<Item = &str> {
        self.activities
            .iter()
            .map(|activity| activity.location.as_str())
            .filter(|location| !lenient::is_unavailable(location))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Free-form start time such as "9:00 AM"; not guaranteed parseable
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub time: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub activity: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub location: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub duration: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub cost: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub time: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub restaurant: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub dish: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub cost: String,
}

fn ordinal<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient::count(deserializer)?.unwrap_or(0))
}
