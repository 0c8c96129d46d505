use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use itinerary_rs::{
    GenerationClient, ItineraryPipeline, MapSource, MinIntervalGovernor, Outcome, PointKind,
    ServiceError, Stage, TripRequest, Unthrottled,
};

/// Replays canned responses in order and records every prompt it was sent.
#[derive(Debug, Default)]
struct ScriptedClient {
    responses: Mutex<VecDeque<Result<String, ServiceError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new<I>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Result<String, ServiceError>>,
    {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Default::default()
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn prompt(&self, idx: usize) -> String {
        self.prompts.lock().unwrap()[idx].clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::new("script exhausted")))
    }
}

#[derive(Debug)]
struct SlowClient;

#[async_trait]
impl GenerationClient for SlowClient {
    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("{}".to_string())
    }
}

/// Takes longer than the pacing interval and records when each call ran.
#[derive(Debug, Default)]
struct TimedClient {
    spans: Mutex<Vec<(Instant, Instant)>>,
}

#[async_trait]
impl GenerationClient for TimedClient {
    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(150)).await;
        self.spans.lock().unwrap().push((started, Instant::now()));
        Ok("{}".to_string())
    }
}

fn pipeline(client: Arc<ScriptedClient>) -> ItineraryPipeline {
    ItineraryPipeline::new(client).with_governor(Arc::new(Unthrottled))
}

fn ok(text: &str) -> Result<String, ServiceError> {
    Ok(text.to_string())
}

const SUMMARY: &str = r#"```json
{
  "city": "Paris",
  "total_budget": 600,
  "duration": 2,
  "overview": "Museums, cafes and river walks.",
  "budget_breakdown": {"accommodation": "$210", "food": "$180"},
  "best_time": "April to June",
  "currency": "EUR",
  "highlights": ["Louvre", "Eiffel Tower"]
}
```"#;

const DAY_ONE: &str = r#"Here is your plan:
{
  "day": 1,
  "theme": "Classic Paris",
  "activities": [
    {"time": "9:00 AM", "activity": "Louvre", "location": "Rue de Rivoli", "cost": "$20"},
    {"time": "2:00 PM", "activity": "Eiffel Tower", "location": "Champ de Mars", "cost": "$30"}
  ],
  "meals": [{"time": "1:00 PM", "restaurant": "Cafe", "dish": "Croque monsieur", "cost": "$15"}],
  "transportation": "Metro",
  "total_cost": "$120"
}"#;

const DINING: &str = r#"{
  "restaurants": [
    {"name": "Du Pain", "cuisine": "Bakery", "meal_type": "breakfast", "price_range": "$$"},
    {"name": "Le Bistro", "cuisine": "French", "meal_type": "dinner", "price_range": "$$$"}
  ],
  "food_districts": ["Le Marais"],
  "must_try": ["Croissant"]
}"#;

#[tokio::test]
async fn test_malformed_day_is_recorded_and_run_continues() {
    let client = ScriptedClient::new([
        ok(SUMMARY),
        ok(DAY_ONE),
        ok("Sorry, I cannot plan this day."),
        ok(DINING),
    ]);
    let request = TripRequest::new("Paris", 600.0, 2).unwrap();

    let run = pipeline(client.clone()).generate(&request).await;

    assert!(!run.is_aborted());
    let result = run.result().unwrap();
    assert_eq!(result.daily.len(), 2);
    assert_eq!(result.summary.best_time, "April to June");

    let day_one = result.daily[0].ready().unwrap();
    assert_eq!(day_one.day, 1);
    assert_eq!(day_one.activities.len(), 2);

    let day_two = result.daily[1].failure().unwrap();
    assert_eq!(day_two.stage, Stage::Daily(2));
    assert_eq!(day_two.code, "NO_JSON_FOUND");
    assert_eq!(
        day_two.raw_excerpt.as_deref(),
        Some("Sorry, I cannot plan this day.")
    );

    let dining = result.dining.ready().unwrap();
    assert_eq!(dining.restaurants.len(), 2);

    // locations call hit the end of the script and fell back to the city centre
    assert_eq!(client.call_count(), 5);
    let map = result.map.ready().unwrap();
    assert!(matches!(map.source, MapSource::StaticFallback { .. }));
    assert_eq!(map.points.len(), 1);
    assert_eq!(map.points[0].name, "Paris - Your Destination");
    assert_eq!(map.points[0].kind, PointKind::Destination);
    assert!(map.html().contains(r#""color":"red""#));
    assert!(map.html().contains("Welcome to Paris!"));
    assert_eq!(result.locations.len(), 1);
    assert!(!result.is_complete());
}

#[tokio::test]
async fn test_summary_failure_aborts_after_one_call() {
    let client = ScriptedClient::new([ok("no json here"), ok(DAY_ONE), ok(DINING)]);
    let request = TripRequest::new("Paris", 600.0, 3).unwrap();

    let run = pipeline(client.clone()).generate(&request).await;

    assert!(run.is_aborted());
    assert_eq!(client.call_count(), 1);
    let failure = run.abort_failure().unwrap();
    assert_eq!(failure.stage, Stage::Summary);
    assert_eq!(failure.code, "NO_JSON_FOUND");
    assert_eq!(failure.raw_excerpt.as_deref(), Some("no json here"));
}

#[tokio::test]
async fn test_service_error_in_summary_aborts() {
    let client = ScriptedClient::new([Err(
        ServiceError::new("rate limit or quota exceeded").with_status(429)
    )]);
    let request = TripRequest::new("Tokyo", 900.0, 3).unwrap();

    let run = pipeline(client.clone()).generate(&request).await;

    let failure = run.abort_failure().unwrap();
    assert_eq!(failure.code, "SERVICE_ERROR");
    assert!(failure.raw_excerpt.is_none());
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_generated_locations_build_the_map() {
    let locations = r#"{
      "locations": [
        {"name": "Louvre", "latitude": 48.8606, "longitude": 2.3376, "type": "attraction"},
        {"name": "Hotel Lutetia", "latitude": "48.8511", "longitude": "2.3270", "type": "hotel"},
        {"name": "Nowhere", "latitude": 123.0, "longitude": 2.0, "type": "attraction"}
      ],
      "city_center": {"latitude": 48.8566, "longitude": 2.3522}
    }"#;
    let client = ScriptedClient::new([ok(SUMMARY), ok(DAY_ONE), ok(DINING), ok(locations)]);
    let request = TripRequest::new("Paris", 300.0, 1).unwrap();

    let run = pipeline(client.clone()).generate(&request).await;
    let result = run.into_result().unwrap();

    assert!(result.is_complete());
    assert_eq!(client.call_count(), 4);
    let locations_prompt = client.prompt(3);
    assert!(locations_prompt.contains("Rue de Rivoli"));
    assert!(locations_prompt.contains("Champ de Mars"));

    let map = result.map.ready().unwrap();
    assert_eq!(map.source, MapSource::Generated);
    assert_eq!(map.points.len(), 2);
    assert_eq!(map.points[1].kind, PointKind::Hotel);
    assert_eq!((map.center.latitude, map.center.longitude), (48.8566, 2.3522));
    assert!(map.html().contains("leaflet"));
    assert!(map.html().contains("Hotel Lutetia"));
    assert_eq!(result.locations.len(), 2);
}

#[tokio::test]
async fn test_daily_prompts_follow_day_order() {
    let client = ScriptedClient::new([ok(SUMMARY), ok(DAY_ONE), ok(DAY_ONE), ok(DAY_ONE)]);
    let request = TripRequest::new("Paris", 600.0, 3).unwrap();

    let run = pipeline(client.clone()).generate(&request).await;
    let result = run.result().unwrap();

    for day in 1..=3u32 {
        assert!(client
            .prompt(day as usize)
            .contains(&format!("day {day} itinerary")));
        // the service labelled every plan "day 1"; the pipeline pins the real index
        assert_eq!(result.daily[day as usize - 1].ready().unwrap().day, day);
    }
    assert!(client.prompt(1).contains("$200"));
}

#[tokio::test]
async fn test_map_failure_without_fallback() {
    let empty_day = r#"{"day": 1, "theme": "Rest", "activities": []}"#;
    let client = ScriptedClient::new([ok(SUMMARY), ok(empty_day), ok(DINING)]);
    let request = TripRequest::new("Springfield", 100.0, 1).unwrap();

    let run = pipeline(client.clone())
        .with_static_map_fallback(false)
        .generate(&request)
        .await;
    let result = run.result().unwrap();

    // no locations means no coordinate call
    assert_eq!(client.call_count(), 3);
    let failure = result.map.failure().unwrap();
    assert_eq!(failure.stage, Stage::Map);
    assert_eq!(failure.code, "NO_LOCATIONS");
    assert!(result.locations.is_empty());
    assert!(result.dining.is_ready());
}

#[tokio::test]
async fn test_unknown_city_falls_back_to_default_center() {
    let client = ScriptedClient::new([ok(SUMMARY), ok(DAY_ONE), ok(DINING), ok("{}")]);
    let request = TripRequest::new("Atlantis", 600.0, 1).unwrap();

    let run = pipeline(client).generate(&request).await;
    let map = match &run.result().unwrap().map {
        Outcome::Ready(map) => map.clone(),
        Outcome::Failed(failure) => panic!("map failed: {failure}"),
    };

    assert_eq!(
        map.source,
        MapSource::StaticFallback {
            reason: "service returned no usable coordinates".to_string()
        }
    );
    assert_eq!((map.center.latitude, map.center.longitude), (28.6139, 77.2090));
}

#[tokio::test]
async fn test_slow_call_times_out() {
    let pipeline = ItineraryPipeline::new(Arc::new(SlowClient))
        .with_governor(Arc::new(Unthrottled))
        .with_call_timeout(Duration::from_millis(50));
    let request = TripRequest::new("Paris", 600.0, 1).unwrap();

    let run = pipeline.generate(&request).await;

    let failure = run.abort_failure().unwrap();
    assert_eq!(failure.code, "SERVICE_ERROR");
    assert!(failure.message.contains("timed out"));
}

#[tokio::test]
async fn test_run_serializes_with_status_tags() {
    let client = ScriptedClient::new([ok(SUMMARY), ok("{\"day\": 1,}"), ok(DINING)]);
    let request = TripRequest::new("Paris", 600.0, 1).unwrap();

    let run = pipeline(client).generate(&request).await;
    let value = serde_json::to_value(&run).unwrap();

    assert_eq!(value["status"], "completed");
    assert_eq!(value["daily"][0]["status"], "failed");
    assert_eq!(value["daily"][0]["data"]["code"], "INVALID_JSON");
    assert_eq!(value["dining"]["status"], "ready");
    assert_eq!(value["map"]["data"]["source"]["kind"], "static_fallback");
}

#[tokio::test]
async fn test_daily_calls_pause_after_slow_responses() {
    let client = Arc::new(TimedClient::default());
    let pause = Duration::from_millis(100);
    let pipeline = ItineraryPipeline::new(client.clone())
        .with_governor(Arc::new(MinIntervalGovernor::new(pause)));
    let request = TripRequest::new("Paris", 600.0, 3).unwrap();

    let run = pipeline.generate(&request).await;
    assert!(run.result().unwrap().daily.iter().all(Outcome::is_ready));

    // summary, three days, dining; no locations so no coordinate call
    let spans = client.spans.lock().unwrap().clone();
    assert_eq!(spans.len(), 5);
    for day in 1..3 {
        let finished = spans[day].1;
        let next_started = spans[day + 1].0;
        assert!(
            next_started.duration_since(finished) >= pause,
            "day {} followed its predecessor after {:?}",
            day + 1,
            next_started.duration_since(finished)
        );
    }
}
