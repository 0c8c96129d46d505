//! itinerary-rs: multi-day travel itineraries generated by an LLM service
//!
//! A trip request (city, total budget, day count) runs through four
//! sequential stages: an overall summary, one plan per day, dining
//! recommendations and a map of the activity locations. Every response is
//! normalized into a JSON object before it is decoded, and a failing stage
//! after the summary is recorded in the result instead of ending the run.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use itinerary_rs::{GenerationConfig, ItineraryPipeline, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GenerationConfig::from_env()?;
//!     let pipeline = ItineraryPipeline::from_config(&config)?;
//!
//!     let request = TripRequest::new("Paris", 600.0, 3)?;
//!     let run = pipeline.generate(&request).await;
//!
//!     if let Some(result) = run.result() {
//!         println!("{}", result.replay());
//!         if let Some(map) = result.map.ready() {
//!             std::fs::write("itinerary_map.html", map.html())?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod map;
pub mod services;
pub mod types;

pub use config::{GenerationConfig, Provider};
pub use core::{BudgetBand, ItineraryPipeline, MinIntervalGovernor, RateGovernor, Unthrottled};
pub use error::{ItineraryError, NormalizationError, NormalizationErrorKind, Result, ServiceError};
pub use map::{ItineraryMap, MapArtifact, MapAssembler, MapSource, MarkerColor};
pub use services::{create_client, normalize, GeminiClient, GenerationClient, OpenAIClient};
pub use types::{
    Activity, DailyPlan, DiningSet, GeoPoint, ItineraryResult, ItineraryRun, Meal, MealType,
    Outcome, PointKind, Restaurant, Stage, StageFailure, StageReport, TripRequest, TripSummary,
};

#[cfg(feature = "cli")]
pub mod cli;
