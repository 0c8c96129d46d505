use serde::Serialize;

use crate::error::{ItineraryError, Result};

/// Longest trip the pipeline will plan.
pub const MAX_TRIP_DAYS: u32 = 14;

/// Validated input for one itinerary run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRequest {
    city: String,
    total_budget: f64,
    days: u32,
}

impl TripRequest {
    pub fn new(city: impl Into<String>, total_budget: f64, days: u32) -> Result<Self> {
        let city = city.into().trim().to_string();
        if city.is_empty() {
            return Err(ItineraryError::InvalidRequest(
                "city must not be empty".to_string(),
            ));
        }
        if !total_budget.is_finite() || total_budget <= 0.0 {
            return Err(ItineraryError::InvalidRequest(format!(
                "total budget must be a positive amount, got {}",
                total_budget
            )));
        }
        if days == 0 || days > MAX_TRIP_DAYS {
            return Err(ItineraryError::InvalidRequest(format!(
                "days must be between 1 and {}, got {}",
                MAX_TRIP_DAYS, days
            )));
        }

        Ok(Self {
            city,
            total_budget,
            days,
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn total_budget(&self) -> f64 {
        self.total_budget
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Even split of the total budget across the trip
    pub fn daily_budget(&self) -> f64 {
        self.total_budget / f64::from(self.days)
    }
}
