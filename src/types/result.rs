use serde::Serialize;
use std::time::Duration;

use super::{
    daily::{Activity, DailyPlan},
    dining::DiningSet,
    locations::GeoPoint,
    outcome::{Outcome, Stage, StageFailure},
    request::TripRequest,
    summary::TripSummary,
};
use crate::map::{ItineraryMap, MapSource};

/// Timing record for one executed stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub succeeded: bool,
    pub elapsed: Duration,
}

impl StageReport {
    pub fn describe(&self) -> String {
        let marker = if self.succeeded { "✅" } else { "❌" };
        format!(
            "{} {} ({:.2}s)",
            marker,
            self.stage,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Everything one completed itinerary run produced
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryResult {
    pub request: TripRequest,
    pub summary: TripSummary,
    /// One entry per requested day, in day order
    pub daily: Vec<Outcome<DailyPlan>>,
    pub dining: Outcome<DiningSet>,
    /// Points placed on the map (empty when the map section failed)
    pub locations: Vec<GeoPoint>,
    pub map: Outcome<ItineraryMap>,
    pub stages: Vec<StageReport>,
    pub duration: Duration,
}

impl ItineraryResult {
    pub fn ready_days(&self) -> impl Iterator<Item = &DailyPlan> {
        self.daily.iter().filter_map(Outcome::ready)
    }

    pub fn failed_days(&self) -> impl Iterator<Item = &StageFailure> {
        self.daily.iter().filter_map(Outcome::failure)
    }

    pub fn all_activities(&self) -> impl Iterator<Item = &Activity> {
        self.ready_days().flat_map(|plan| plan.activities.iter())
    }

    /// True when no section had to be degraded
    pub fn is_complete(&self) -> bool {
        self.daily.iter().all(Outcome::is_ready)
            && self.dining.is_ready()
            && matches!(
                self.map.ready().map(|map| &map.source),
                Some(MapSource::Generated)
            )
    }

    /// Every failure recorded during the run, in stage order
    pub fn failures(&self) -> Vec<&StageFailure> {
        self.failed_days()
            .chain(self.dining.failure())
            .chain(self.map.failure())
            .collect()
    }

    /// Generate a human-readable trace of the run
    pub fn replay(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Itinerary Run Trace ===".to_string());
        lines.push(format!(
            "Request: {} / ${:.0} / {} days",
            self.request.city(),
            self.request.total_budget(),
            self.request.days()
        ));
        lines.push(format!("Duration: {:.2}s", self.duration.as_secs_f64()));
        lines.push(String::new());
        lines.push("--- Stages ---".to_string());

        for (idx, report) in self.stages.iter().enumerate() {
            lines.push(format!("{}. {}", idx + 1, report.describe()));
        }

        let failures = self.failures();
        if !failures.is_empty() {
            lines.push(String::new());
            lines.push("--- Failures ---".to_string());
            for failure in failures {
                lines.push(failure.to_string());
            }
        }

        lines.join("\n")
    }
}

/// Terminal state of an itinerary run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItineraryRun {
    Completed(Box<ItineraryResult>),
    /// The summary stage failed and nothing else was attempted
    Aborted(AbortedRun),
}

#[derive(Debug, Clone, Serialize)]
pub struct AbortedRun {
    pub request: TripRequest,
    pub failure: StageFailure,
    pub duration: Duration,
}

impl ItineraryRun {
    pub fn is_aborted(&self) -> bool {
        matches!(self, ItineraryRun::Aborted(_))
    }

    pub fn result(&self) -> Option<&ItineraryResult> {
        match self {
            ItineraryRun::Completed(result) => Some(result),
            ItineraryRun::Aborted(_) => None,
        }
    }

    pub fn into_result(self) -> Option<ItineraryResult> {
        match self {
            ItineraryRun::Completed(result) => Some(*result),
            ItineraryRun::Aborted(_) => None,
        }
    }

    pub fn abort_failure(&self) -> Option<&StageFailure> {
        match self {
            ItineraryRun::Completed(_) => None,
            ItineraryRun::Aborted(aborted) => Some(&aborted.failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{MapAssembler, MapSource};
    use crate::types::PointKind;
    use serde_json::json;

    fn sample_result() -> ItineraryResult {
        let request = TripRequest::new("Paris", 600.0, 2).unwrap();
        let summary: TripSummary =
            serde_json::from_value(json!({"overview": "Museums"})).unwrap();
        let day_one: DailyPlan = serde_json::from_value(json!({
            "day": 1,
            "activities": [{"activity": "Louvre", "location": "Rue de Rivoli"}]
        }))
        .unwrap();
        let center = GeoPoint::new("Paris", 48.8566, 2.3522, PointKind::Attraction);
        let artifact = MapAssembler::new().build_map(&center, &[]);

        ItineraryResult {
            request,
            summary,
            daily: vec![
                Outcome::Ready(day_one),
                Outcome::Failed(StageFailure::new(Stage::Daily(2), "INVALID_JSON", "bad")),
            ],
            dining: Outcome::Failed(StageFailure::new(Stage::Dining, "SERVICE_ERROR", "quota")),
            locations: vec![],
            map: Outcome::Ready(ItineraryMap {
                center,
                points: vec![],
                source: MapSource::Generated,
                artifact,
            }),
            stages: vec![StageReport {
                stage: Stage::Summary,
                succeeded: true,
                elapsed: Duration::from_millis(1200),
            }],
            duration: Duration::from_secs(3),
        }
    }

    #[test]
    fn test_day_accessors() {
        let result = sample_result();
        assert_eq!(result.ready_days().count(), 1);
        assert_eq!(result.failed_days().count(), 1);
        assert_eq!(result.all_activities().count(), 1);
        assert!(!result.is_complete());
        assert_eq!(result.failures().len(), 2);
    }

    #[test]
    fn test_replay_lists_stages_and_failures() {
        let replay = sample_result().replay();
        assert!(replay.contains("Itinerary Run Trace"));
        assert!(replay.contains("1. ✅ summary (1.20s)"));
        assert!(replay.contains("day 2 stage failed [INVALID_JSON]"));
        assert!(replay.contains("dining stage failed [SERVICE_ERROR]: quota"));
    }

    #[test]
    fn test_serialized_outcome_tags() {
        let value = serde_json::to_value(sample_result()).unwrap();
        assert_eq!(value["daily"][0]["status"], "ready");
        assert_eq!(value["daily"][1]["status"], "failed");
        assert_eq!(value["daily"][1]["data"]["stage"]["day"], 2);
        assert_eq!(value["map"]["data"]["source"]["kind"], "generated");
    }
}
