use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ItineraryDay, Recommendations, TravelTip, Trip};

// Wire types for the Gemini generateContent endpoint

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Client for the Gemini text-generation API.
///
/// Every generation method builds a prompt from the trip, requests raw text,
/// strips the fenced code block Gemini wraps JSON in, and parses the result
/// into the typed structure before anything is persisted.
#[derive(Clone)]
pub struct GeminiService {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiService {
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        }
    }

    /// Generate a day-by-day itinerary for a trip
    pub async fn generate_itinerary(&self, trip: &Trip) -> AppResult<Vec<ItineraryDay>> {
        let response_schema = r#"
  [{
    "day": <number, required>,
    "date": <string, required>,
    "items": [{
      "time": <string, required>,
      "title": <string, required>,
      "type": <string, required>,
      "description": <string>,
      "location": <string>,
      "duration": <number, minutes>,
      "cost": <number>,
      "booking_required": <boolean>,
      "booking_info": { "website": <string>, "phone": <string>, "notes": <string> }
    }]
  }]
  "#;

        let prompt = format!(
            r#"Generate a concise day-by-day itinerary for the following trip details:
{context}
    - Generated travel tips: {tips}
    - Generated recommendations: {recs}

    Your response must be completely in JSON and adhere to the following schema:
    {schema}

    Generate an entry for each day in the trip, consider both arrival time and departure time.

    Important: Include nothing in the output except valid JSON, ensure it STRICTLY adheres to the given schema."#,
            context = trip_context(trip),
            tips = trip
                .travel_tips
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "none".to_string()),
            recs = trip
                .recommendations
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "none".to_string()),
            schema = response_schema,
        );

        let raw = self.generate(&prompt).await?;
        clean_and_parse(&raw)
    }

    /// Generate attraction/restaurant/experience recommendations for a trip
    pub async fn generate_recommendations(&self, trip: &Trip) -> AppResult<Recommendations> {
        let response_schema = r#"
  {
    "attractions": [{ "name": <string>, "description": <string>, "location": <string>, "rating": <number>, "cost": <number>, "category": <string> }],
    "restaurants": [{ "name": <string>, "cuisine": <string>, "description": <string>, "location": <string>, "rating": <number>, "price_range": <string>, "dietary_options": [<string>] }],
    "experiences": [{ "name": <string>, "description": <string>, "category": <string>, "duration": <number, minutes>, "cost": <number>, "location": <string> }]
  }
  "#;

        let prompt = format!(
            r#"Generate a personalized list of attraction, restaurant, and experience recommendations for the following trip details:
{context}

    Your response must be completely in JSON and adhere to the following schema:
    {schema}

    Generate 3-5 items for each recommendation category.

    Important: Include nothing in the output except valid JSON, ensure it STRICTLY adheres to the given schema."#,
            context = trip_context(trip),
            schema = response_schema,
        );

        let raw = self.generate(&prompt).await?;
        clean_and_parse(&raw)
    }

    /// Generate travel tips for a trip
    pub async fn generate_travel_tips(&self, trip: &Trip) -> AppResult<Vec<TravelTip>> {
        let response_schema = r#"
  [{
    "category": <one of "cultural", "transportation", "safety", "language", "weather", "money", "food", "customs", required>,
    "title": <string>,
    "content": <string>,
    "importance": <one of "low", "medium", "high">
  }]
  "#;

        let prompt = format!(
            r#"Generate an informative list of travel tips for the following trip details:
{context}

    Your response must be completely in JSON and adhere to the following schema:
    {schema}

    Each tip must be assigned one of these categories, NO others are allowed:
    'cultural', 'transportation', 'safety', 'language', 'weather', 'money', 'food', 'customs'

    Generate 5-7 travel tips you think will be most useful.

    Important: Include nothing in the output except valid JSON, ensure it STRICTLY adheres to the given schema."#,
            context = trip_context(trip),
            schema = response_schema,
        );

        let raw = self.generate(&prompt).await?;
        clean_and_parse(&raw)
    }

    /// Single round-trip to the generateContent endpoint, returning raw text
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!(
                "Gemini API returned {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::Generation(
                "Empty response from Gemini API".to_string(),
            ));
        }

        Ok(text)
    }
}

/// Strip the ```json fences Gemini wraps output in, then parse
fn clean_and_parse<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    let cleaned = raw.replace("```json\n", "").replace("```", "");

    serde_json::from_str(cleaned.trim())
        .map_err(|e| AppError::Generation(format!("Invalid JSON from Gemini API: {}", e)))
}

fn trip_context(trip: &Trip) -> String {
    format!(
        r#"    - Destination: {destination}
    - Start: {start}
    - End: {end}
    - Days: {duration}
    - Budget: ${budget}

    The user has specified these preferences which you must take into account when planning:
    - Travel style: {style:?}
    - Interests: {interests}
    - Budget range: {range:?}
    - Preferred accommodation: {accommodation:?}"#,
        destination = trip.destination,
        start = trip.start_date,
        end = trip.end_date,
        duration = trip.duration,
        budget = trip.budget,
        style = trip.preferences.travel_style,
        interests = trip.preferences.interests.join(", "),
        range = trip.preferences.budget_range,
        accommodation = trip.preferences.accommodation_style,
    )
}
