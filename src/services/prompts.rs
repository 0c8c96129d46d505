use crate::core::budget::{share, BudgetBand};

const JSON_ONLY: &str =
    "IMPORTANT: Respond with ONLY a valid JSON object. No markdown, no explanation, no text before or after the JSON.";

/// Prompt for the trip overview and budget breakdown
pub fn summary_prompt(city: &str, total_budget: f64, days: u32) -> String {
    let budget = total_budget.trunc() as i64;
    format!(
        r#"You are a travel expert. Create a comprehensive travel summary for {city} with a budget of ${budget} USD for {days} days.

{JSON_ONLY}

{{
    "city": "{city}",
    "total_budget": {budget},
    "duration": {days},
    "overview": "2-3 sentence overview of what makes {city} special and what travelers can expect during a {days}-day visit",
    "budget_breakdown": {{
        "accommodation": "${accommodation}",
        "food": "${food}",
        "activities": "${activities}",
        "transport": "${transport}"
    }},
    "best_time": "Best months to visit with weather details",
    "currency": "Local currency name and symbol",
    "highlights": ["Must-see attraction with a brief detail", "Cultural experience with context", "Local specialty or unique feature"]
}}"#,
        accommodation = share(total_budget, 0.35),
        food = share(total_budget, 0.30),
        activities = share(total_budget, 0.25),
        transport = share(total_budget, 0.10),
    )
}

/// Prompt for one day of the itinerary
pub fn daily_prompt(city: &str, day: u32, daily_budget: f64) -> String {
    let range = |low: f64, high: f64| {
        format!(
            "${}-{}",
            share(daily_budget, low),
            share(daily_budget, high)
        )
    };

    format!(
        r#"You are a local travel guide for {city}. Create a detailed day {day} itinerary with a daily budget of ${budget:.0} USD.

Consider local culture, opening hours, travel times between places, and realistic scheduling. Include 4-6 activities covering morning, afternoon, and evening, plus breakfast, lunch, and dinner.

{JSON_ONLY}

{{
    "day": {day},
    "theme": "Specific theme such as 'Ancient Temples & Spiritual Sites' or 'Street Food & Local Markets'",
    "activities": [
        {{
            "time": "8:00 AM",
            "activity": "Specific activity name",
            "location": "Exact location name, address or landmark",
            "duration": "2 hours",
            "cost": "{morning}",
            "description": "What to expect, what to see, cultural significance"
        }},
        {{
            "time": "2:00 PM",
            "activity": "Afternoon activity",
            "location": "Exact location name",
            "duration": "2 hours",
            "cost": "{afternoon}",
            "description": "Why this is worth visiting, tips for visitors"
        }},
        {{
            "time": "5:00 PM",
            "activity": "Evening activity or experience",
            "location": "Exact location name",
            "duration": "1.5 hours",
            "cost": "{evening}",
            "description": "Evening experience details"
        }}
    ],
    "meals": [
        {{
            "time": "Breakfast (7:30 AM)",
            "restaurant": "Specific restaurant with a local reputation",
            "dish": "Traditional local breakfast dish",
            "cost": "{breakfast}"
        }},
        {{
            "time": "Lunch (12:30 PM)",
            "restaurant": "Popular local restaurant",
            "dish": "Regional specialty dish",
            "cost": "{lunch}"
        }},
        {{
            "time": "Dinner (7:00 PM)",
            "restaurant": "Recommended dinner spot",
            "dish": "Evening specialty or local favorite",
            "cost": "{dinner}"
        }}
    ],
    "transportation": "How to get around today: options, costs, local tips",
    "total_cost": "{total}"
}}"#,
        budget = daily_budget,
        morning = range(0.15, 0.25),
        afternoon = range(0.15, 0.30),
        evening = range(0.10, 0.25),
        breakfast = range(0.08, 0.12),
        lunch = range(0.15, 0.25),
        dinner = range(0.20, 0.35),
        total = range(0.85, 1.0),
    )
}

/// Prompt for trip-wide dining recommendations within a budget band
pub fn dining_prompt(city: &str, band: BudgetBand) -> String {
    let price = match band {
        BudgetBand::BudgetFriendly => "$",
        BudgetBand::MidRange => "$$",
        BudgetBand::Luxury => "$$$",
    };

    format!(
        r#"You are a food expert familiar with {city}. Generate dining recommendations within the {band} budget range.

Focus on authentic local cuisine, popular spots, and hidden gems. Include 8-10 restaurants covering breakfast, lunch, dinner, and snacks, and vegetarian options where relevant to the local culture.

{JSON_ONLY}

{{
    "restaurants": [
        {{
            "name": "Actual restaurant name",
            "cuisine": "Specific cuisine type",
            "price_range": "{price}",
            "location": "Area, district, or neighborhood",
            "specialty": "Signature dish",
            "meal_type": "breakfast",
            "cost_per_person": "Realistic price range per person"
        }},
        {{
            "name": "Lunch restaurant",
            "cuisine": "Cuisine type",
            "price_range": "{price}",
            "location": "Area",
            "specialty": "Must-try dish",
            "meal_type": "lunch",
            "cost_per_person": "Price range"
        }},
        {{
            "name": "Dinner restaurant",
            "cuisine": "Regional cuisine",
            "price_range": "{price}",
            "location": "Popular dining district",
            "specialty": "Evening specialty",
            "meal_type": "dinner",
            "cost_per_person": "Price range"
        }},
        {{
            "name": "Street food, cafe or sweet shop",
            "cuisine": "Street food or snacks",
            "price_range": "$",
            "location": "Market or street food area",
            "specialty": "Popular snack, dessert or drink",
            "meal_type": "snack",
            "cost_per_person": "Price range"
        }}
    ],
    "food_districts": ["Main food street or district", "Another popular eating area", "Local market or food hub"],
    "local_tips": ["Dining etiquette tip for {city}", "Local meal timing or customs", "Payment or ordering advice for visitors"],
    "must_try": ["Iconic dish unique to {city}", "Regional specialty", "Favorite street food", "Traditional dessert or drink"]
}}"#
    )
}

/// Prompt asking for approximate coordinates of itinerary locations
pub fn locations_prompt(city: &str, locations: &[&str]) -> String {
    let listed = locations.join("; ");

    format!(
        r#"For the city {city}, provide coordinates for these locations: {listed}

Provide approximate coordinates if exact ones are not known. Use one of these types for each location: restaurant, attraction, hotel, shopping, transport.

{JSON_ONLY}

{{
    "locations": [
        {{
            "name": "location name",
            "latitude": 0.0,
            "longitude": 0.0,
            "type": "attraction"
        }}
    ],
    "city_center": {{
        "latitude": 0.0,
        "longitude": 0.0
    }}
}}"#
    )
}
