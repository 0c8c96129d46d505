pub mod daily;
pub mod dining;
pub mod lenient;
pub mod locations;
pub mod outcome;
pub mod request;
pub mod response;
pub mod result;
pub mod summary;

pub use daily::{Activity, DailyPlan, Meal};
pub use dining::{DiningSet, MealType, Restaurant};
pub use lenient::UNAVAILABLE;
pub use locations::{GeoPoint, LocationsPayload, PointKind};
pub use outcome::{Outcome, Stage, StageFailure};
pub use request::{TripRequest, MAX_TRIP_DAYS};
pub use response::{decode_shape, ResponseShape};
pub use result::{AbortedRun, ItineraryResult, ItineraryRun, StageReport};
pub use summary::TripSummary;
