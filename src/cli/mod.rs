use std::{env, path::PathBuf, time::Duration};

use anyhow::{anyhow, bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::{error, info};

use crate::{
    map::MapAssembler,
    types::{
        AbortedRun, ItineraryResult, ItineraryRun, MealType, Outcome, TripRequest, MAX_TRIP_DAYS,
    },
    GenerationConfig, ItineraryPipeline, Provider,
};

const MIN_BUDGET: f64 = 50.0;
const MAX_BUDGET: f64 = 10_000.0;
const RESTAURANTS_PER_SLOT: usize = 3;

/// CLI entry point for the itinerary generator
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();

    let city = matches
        .get_one::<String>("city")
        .ok_or_else(|| anyhow!("a destination city is required"))?;
    let budget = *matches
        .get_one::<f64>("budget")
        .ok_or_else(|| anyhow!("--budget is required"))?;
    let days = *matches
        .get_one::<u32>("days")
        .ok_or_else(|| anyhow!("--days is required"))?;
    let request = TripRequest::new(city.as_str(), budget, days)?;

    let config = match resolve_config(&matches) {
        Ok(config) => config,
        Err(err) => {
            error!("configuration error: {}", err);
            if matches.get_flag("json") {
                println!("{}", err.to_error_payload());
            }
            bail!("{err}");
        }
    };

    info!("Planning {} days in {} with ${:.0}", days, request.city(), budget);
    info!("Using provider: {} ({})", config.provider, config.model);

    let pipeline = ItineraryPipeline::from_config(&config)?
        .with_map_assembler(MapAssembler::new().with_clustering(matches.get_flag("cluster")))
        .with_static_map_fallback(!matches.get_flag("no-map-fallback"));

    let run = pipeline.generate(&request).await;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&run)?);
    }

    match run {
        ItineraryRun::Aborted(aborted) => {
            report_abort(&aborted);
            Err(anyhow!("{}", aborted.failure))
        }
        ItineraryRun::Completed(result) => {
            if !matches.get_flag("json") {
                println!("{}", render_report(&result));
            }
            if matches.get_flag("trace") {
                eprintln!("\n{}", result.replay());
            }

            if let (Some(map), Some(path)) =
                (result.map.ready(), matches.get_one::<PathBuf>("map-out"))
            {
                std::fs::write(path, map.html())
                    .with_context(|| format!("failed to write map to {}", path.display()))?;
                info!("Map written to {}", path.display());
            }

            Ok(())
        }
    }
}

fn command() -> Command {
    Command::new("itinerary")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate a multi-day travel itinerary with an LLM service")
        .arg(
            Arg::new("city")
                .help("Destination city")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("USD")
                .help("Total trip budget in USD (50-10000)")
                .required(true)
                .value_parser(parse_budget),
        )
        .arg(
            Arg::new("days")
                .short('d')
                .long("days")
                .value_name("N")
                .help("Trip length in days (1-14)")
                .required(true)
                .value_parser(value_parser!(u32).range(1..=i64::from(MAX_TRIP_DAYS))),
        )
        .arg(
            Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("PROVIDER")
                .help("Generation backend: gemini or openai (or set ITINERARY_PROVIDER)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Model name (or set ITINERARY_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key (or set GEMINI_API_KEY / OPENAI_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Service base URL (or set ITINERARY_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-call timeout in seconds")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("pause-ms")
                .long("pause-ms")
                .value_name("MILLIS")
                .help("Minimum pause between daily-plan calls")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("map-out")
                .short('o')
                .long("map-out")
                .value_name("PATH")
                .help("Where to write the map HTML")
                .default_value("itinerary_map.html")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the whole run as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .help("Print per-stage timings to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cluster")
                .long("cluster")
                .help("Cluster nearby map markers")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-map-fallback")
                .long("no-map-fallback")
                .help("Report the map as failed instead of showing the city centre")
                .action(ArgAction::SetTrue),
        )
}

fn parse_budget(raw: &str) -> Result<f64, String> {
    let budget: f64 = raw
        .trim()
        .trim_start_matches('$')
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if (MIN_BUDGET..=MAX_BUDGET).contains(&budget) {
        Ok(budget)
    } else {
        Err(format!(
            "budget must be between {MIN_BUDGET} and {MAX_BUDGET}, got {budget}"
        ))
    }
}

/// Environment first, then command-line overrides.
fn resolve_config(matches: &ArgMatches) -> crate::Result<GenerationConfig> {
    let provider = match matches.get_one::<String>("provider") {
        Some(raw) => raw.parse()?,
        None => match env::var("ITINERARY_PROVIDER") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => Provider::default(),
        },
    };

    let mut config = GenerationConfig::from_env_with_key(
        provider,
        matches.get_one::<String>("api-key").cloned(),
    )?;

    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.as_str());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(secs) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*secs));
    }
    if let Some(ms) = matches.get_one::<u64>("pause-ms") {
        config = config.with_daily_pause(Duration::from_millis(*ms));
    }

    Ok(config)
}

fn report_abort(aborted: &AbortedRun) {
    eprintln!("Itinerary generation failed at the {} stage", aborted.failure.stage);
    eprintln!("  [{}] {}", aborted.failure.code, aborted.failure.message);
    if let Some(raw) = &aborted.failure.raw_excerpt {
        eprintln!("  Raw response: {}", raw);
    }
}

fn render_report(result: &ItineraryResult) -> String {
    let mut lines = Vec::new();
    let summary = &result.summary;

    lines.push(format!("=== {} ===", summary.city));
    lines.push(summary.overview.clone());
    lines.push(format!("Best time to visit: {}", summary.best_time));
    lines.push(format!("Currency: {}", summary.currency));
    if !summary.budget_breakdown.is_empty() {
        lines.push("Budget breakdown:".to_string());
        for (category, amount) in &summary.budget_breakdown {
            lines.push(format!("  {}: {}", category, amount));
        }
    }
    if !summary.highlights.is_empty() {
        lines.push(format!("Highlights: {}", summary.highlights.join(", ")));
    }

    for (idx, outcome) in result.daily.iter().enumerate() {
        lines.push(String::new());
        match outcome {
            Outcome::Ready(plan) => {
                lines.push(format!("--- Day {}: {} ---", plan.day, plan.theme));
                for activity in &plan.activities {
                    lines.push(format!(
                        "  {} {} @ {} ({}, {})",
                        activity.time,
                        activity.activity,
                        activity.location,
                        activity.duration,
                        activity.cost
                    ));
                    lines.push(format!("      {}", activity.description));
                }
                for meal in &plan.meals {
                    lines.push(format!(
                        "  {} {}: {} ({})",
                        meal.time, meal.restaurant, meal.dish, meal.cost
                    ));
                }
                lines.push(format!("  Transport: {}", plan.transportation));
                lines.push(format!("  Day total: {}", plan.total_cost));
            }
            Outcome::Failed(failure) => {
                lines.push(format!("--- Day {}: unavailable ---", idx + 1));
                lines.push(format!("  {}", failure));
            }
        }
    }

    lines.push(String::new());
    lines.push("--- Dining ---".to_string());
    match &result.dining {
        Outcome::Ready(dining) => {
            for slot in MealType::SLOTS {
                let picks: Vec<_> = dining
                    .restaurants_for(slot.clone())
                    .take(RESTAURANTS_PER_SLOT)
                    .collect();
                if picks.is_empty() {
                    continue;
                }
                lines.push(format!("{}:", slot.as_str()));
                for restaurant in picks {
                    lines.push(format!(
                        "  {} ({}, {}) - {}",
                        restaurant.name,
                        restaurant.cuisine,
                        restaurant.price_range,
                        restaurant.specialty
                    ));
                }
            }
            if !dining.food_districts.is_empty() {
                lines.push(format!("Food districts: {}", dining.food_districts.join(", ")));
            }
            if !dining.local_tips.is_empty() {
                lines.push("Local tips:".to_string());
                for tip in &dining.local_tips {
                    lines.push(format!("  - {}", tip));
                }
            }
            if !dining.must_try.is_empty() {
                lines.push(format!("Must try: {}", dining.must_try.join(", ")));
            }
        }
        Outcome::Failed(failure) => lines.push(format!("  {}", failure)),
    }

    lines.push(String::new());
    match &result.map {
        Outcome::Ready(map) => lines.push(format!("Map: {} points", map.points.len())),
        Outcome::Failed(failure) => lines.push(format!("Map: {}", failure)),
    }

    lines.join("\n")
}
