pub mod budget;
pub mod governor;
pub mod pipeline;

pub use budget::BudgetBand;
pub use governor::{MinIntervalGovernor, RateGovernor, Unthrottled};
pub use pipeline::ItineraryPipeline;
