use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    lenient::{self, unavailable},
    request::TripRequest,
    response::ResponseShape,
};

/// Trip overview returned by the summary stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub city: String,
    /// Total budget as echoed by the service; filled from the request when absent
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_budget: Option<f64>,
    /// Trip length in days; filled from the request when absent
    #[serde(default, deserialize_with = "lenient::count")]
    pub duration: Option<u32>,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub overview: String,
    /// Category (accommodation, food, activities, transport) to amount or share
    #[serde(default, deserialize_with = "lenient::text_map")]
    pub budget_breakdown: BTreeMap<String, String>,
    #[serde(
        default = "unavailable",
        alias = "best_time_to_visit",
        deserialize_with = "lenient::text"
    )]
    pub best_time: String,
    #[serde(default = "unavailable", deserialize_with = "lenient::text")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub highlights: Vec<String>,
}

impl ResponseShape for TripSummary {
    const NAME: &'static str = "trip summary";
}

impl TripSummary {
    /// Fill fields the service omitted with what the caller asked for.
    pub(crate) fn fill_from_request(&mut self, request: &TripRequest) {
        if lenient::is_unavailable(&self.city) {
            self.city = request.city().to_string();
        }
        self.total_budget.get_or_insert(request.total_budget());
        self.duration.get_or_insert(request.days());
    }
}
