use std::collections::HashSet;
use std::time::Instant;

use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{normalizer::normalize, prompts};
use crate::{
    core::{budget::BudgetBand, pipeline::ItineraryPipeline},
    error::{Result, ServiceError},
    map::{fallback, ItineraryMap, MapSource},
    types::{
        decode_shape, AbortedRun, DailyPlan, DiningSet, GeoPoint, ItineraryResult, ItineraryRun,
        LocationsPayload, Outcome, PointKind, ResponseShape, Stage, StageFailure, StageReport,
        TripRequest, TripSummary,
    },
};

impl ItineraryPipeline {
    /// Run the summary, daily, dining and map stages in order.
    ///
    /// Only a summary failure aborts the run; later stages record their
    /// failures in the result and the run carries on.
    pub async fn generate(&self, request: &TripRequest) -> ItineraryRun {
        let run_start = Instant::now();
        let mut stages = Vec::new();
        let city = request.city();

        info!(
            target: "itinerary::pipeline",
            city,
            budget = request.total_budget(),
            days = request.days(),
            "starting itinerary run"
        );

        let started = Instant::now();
        let summary_prompt =
            prompts::summary_prompt(city, request.total_budget(), request.days());
        let summary = match self.request_shape::<TripSummary>(&summary_prompt).await {
            Ok(mut summary) => {
                summary.fill_from_request(request);
                stages.push(report(Stage::Summary, true, started));
                summary
            }
            Err(err) => {
                let failure = StageFailure::from_error(Stage::Summary, &err);
                warn!(target: "itinerary::pipeline", city, error = %err, "summary stage failed, aborting run");
                return ItineraryRun::Aborted(AbortedRun {
                    request: request.clone(),
                    failure,
                    duration: run_start.elapsed(),
                });
            }
        };

        let daily_budget = request.daily_budget();
        let mut daily = Vec::with_capacity(request.days() as usize);
        for day in 1..=request.days() {
            self.governor().acquire().await;
            let started = Instant::now();
            let prompt = prompts::daily_prompt(city, day, daily_budget);
            let response = self.request_shape::<DailyPlan>(&prompt).await;
            self.governor().complete().await;
            let outcome = match response {
                Ok(mut plan) => {
                    if plan.day != 0 && plan.day != day {
                        debug!(target: "itinerary::pipeline", day, reported = plan.day, "service mislabelled day");
                    }
                    plan.day = day;
                    Outcome::Ready(plan)
                }
                Err(err) => {
                    warn!(target: "itinerary::pipeline", city, day, error = %err, "daily stage failed");
                    Outcome::Failed(StageFailure::from_error(Stage::Daily(day), &err))
                }
            };
            stages.push(report(Stage::Daily(day), outcome.is_ready(), started));
            daily.push(outcome);
        }

        let started = Instant::now();
        let band = BudgetBand::from_daily_budget(daily_budget);
        debug!(target: "itinerary::pipeline", daily_budget, %band, "classified budget band");
        let dining = match self
            .request_shape::<DiningSet>(&prompts::dining_prompt(city, band))
            .await
        {
            Ok(dining) => Outcome::Ready(dining),
            Err(err) => {
                warn!(target: "itinerary::pipeline", city, error = %err, "dining stage failed");
                Outcome::Failed(StageFailure::from_error(Stage::Dining, &err))
            }
        };
        stages.push(report(Stage::Dining, dining.is_ready(), started));

        let started = Instant::now();
        let (map, generated) = self.map_stage(request, &daily).await;
        stages.push(report(Stage::Map, generated, started));
        let locations = map
            .ready()
            .map(|map| map.points.clone())
            .unwrap_or_default();

        let result = ItineraryResult {
            request: request.clone(),
            summary,
            daily,
            dining,
            locations,
            map,
            stages,
            duration: run_start.elapsed(),
        };

        info!(
            target: "itinerary::pipeline",
            city,
            ready_days = result.ready_days().count(),
            failed_days = result.failed_days().count(),
            dining = result.dining.is_ready(),
            map_points = result.locations.len(),
            elapsed_ms = result.duration.as_millis() as u64,
            "itinerary run completed"
        );

        ItineraryRun::Completed(Box::new(result))
    }

    /// Build the map section; the flag reports whether coordinates were generated.
    async fn map_stage(
        &self,
        request: &TripRequest,
        daily: &[Outcome<DailyPlan>],
    ) -> (Outcome<ItineraryMap>, bool) {
        let city = request.city();

        match self.generate_points(city, daily).await {
            Ok((center, points)) => {
                let artifact = self.map_assembler().build_map(&center, &points);
                let map = ItineraryMap {
                    center,
                    points,
                    source: MapSource::Generated,
                    artifact,
                };
                (Outcome::Ready(map), true)
            }
            Err(failure) if self.static_map_fallback() => {
                info!(target: "itinerary::map", city, reason = %failure.message, "using static city-centre map");
                let (latitude, longitude) = fallback::city_center_or_default(city);
                let center = GeoPoint::new(city, latitude, longitude, PointKind::Attraction);
                let points = vec![fallback::destination_marker(city)];
                let artifact = self.map_assembler().build_map(&center, &points);
                let map = ItineraryMap {
                    center,
                    points,
                    source: MapSource::StaticFallback {
                        reason: failure.message,
                    },
                    artifact,
                };
                (Outcome::Ready(map), false)
            }
            Err(failure) => {
                warn!(target: "itinerary::map", city, reason = %failure.message, "map stage failed");
                (Outcome::Failed(failure), false)
            }
        }
    }

    async fn generate_points(
        &self,
        city: &str,
        daily: &[Outcome<DailyPlan>],
    ) -> std::result::Result<(GeoPoint, Vec<GeoPoint>), StageFailure> {
        let names = distinct_locations(daily);
        if names.is_empty() {
            return Err(StageFailure::new(
                Stage::Map,
                "NO_LOCATIONS",
                "no activity locations to place on the map",
            ));
        }

        let payload = self
            .request_shape::<LocationsPayload>(&prompts::locations_prompt(city, &names))
            .await
            .map_err(|err| StageFailure::from_error(Stage::Map, &err))?;

        let points = payload.points();
        if points.is_empty() {
            return Err(StageFailure::new(
                Stage::Map,
                "NO_COORDINATES",
                "service returned no usable coordinates",
            ));
        }

        let (latitude, longitude) = payload
            .city_center()
            .or_else(|| fallback::lookup_city_center(city))
            .unwrap_or_else(|| centroid(&points));

        Ok((
            GeoPoint::new(city, latitude, longitude, PointKind::Attraction),
            points,
        ))
    }

    /// One bounded generation call, normalized and decoded into `T`.
    async fn request_shape<T>(&self, prompt: &str) -> Result<T>
    where
        T: ResponseShape,
    {
        let raw = match timeout(self.call_timeout(), self.client().generate(prompt)).await {
            Ok(result) => result?,
            Err(_) => return Err(ServiceError::timeout(self.call_timeout()).into()),
        };
        debug!(target: "itinerary::pipeline", shape = T::NAME, raw_len = raw.len(), "received response");

        let object = normalize(&raw)?;
        decode_shape::<T>(&Value::Object(object))
    }
}

fn report(stage: Stage, succeeded: bool, started: Instant) -> StageReport {
    StageReport {
        stage,
        succeeded,
        elapsed: started.elapsed(),
    }
}

/// Activity locations across ready days, first occurrence order.
fn distinct_locations(daily: &[Outcome<DailyPlan>]) -> Vec<&str> {
    let mut seen = HashSet::new();
    daily
        .iter()
        .filter_map(Outcome::ready)
        .flat_map(DailyPlan::activity_locations)
        .filter(|location| seen.insert(location.to_lowercase()))
        .collect()
}

fn centroid(points: &[GeoPoint]) -> (f64, f64) {
    let count = points.len() as f64;
    let (lat_sum, lon_sum) = points.iter().fold((0.0, 0.0), |(lat, lon), point| {
        (lat + point.latitude, lon + point.longitude)
    });
    (lat_sum / count, lon_sum / count)
}
