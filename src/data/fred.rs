//! FRED API integration.
//!
//! The client is deliberately blocking and serial: FRED enforces a strict
//! requests-per-minute cap, so the client enforces a minimum delay between
//! calls instead of the synchronizer fanning out concurrently. The
//! rate-limiter state (last call time) lives on the client, constructed once
//! per process and passed by reference into the synchronizer.

use std::cell::Cell;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::Observation;
use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// FRED allows 120 requests per minute; 500ms between calls keeps us at
/// half that ceiling.
const RATE_LIMIT_DELAY: Duration = Duration::from_millis(500);

/// Anything the synchronizer can fetch observations from.
///
/// The production implementation is [`FredClient`]; tests substitute an
/// in-memory source.
pub trait ObservationSource {
    /// Fetch all observations for `source_id` in `[start, end]`, ascending.
    ///
    /// Implementations must filter out upstream "missing value" sentinels
    /// before returning.
    fn fetch_observations(
        &self,
        source_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, AppError>;
}

pub struct FredClient {
    client: Client,
    api_key: String,
    base_url: String,
    last_request: Cell<Option<Instant>>,
}

impl FredClient {
    /// Build a client from the environment (`.env` supported via dotenvy).
    ///
    /// A missing `FRED_API_KEY` is fatal at startup; `FRED_API_BASE_URL`
    /// optionally overrides the API host.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::config("Missing FRED_API_KEY in environment (.env)."))?;
        let base_url =
            std::env::var("FRED_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url,
            last_request: Cell::new(None),
        })
    }

    /// Sleep just long enough to keep at least `RATE_LIMIT_DELAY` between
    /// consecutive requests.
    fn rate_limit(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < RATE_LIMIT_DELAY {
                std::thread::sleep(RATE_LIMIT_DELAY - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

impl ObservationSource for FredClient {
    fn fetch_observations(
        &self,
        source_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>, AppError> {
        self.rate_limit();

        let url = format!("{}/series/observations", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("series_id", source_id),
                ("api_key", &self.api_key),
                ("file_type", "json"),
                ("observation_start", &start.to_string()),
                ("observation_end", &end.to_string()),
            ])
            .send()
            .map_err(|e| AppError::fetch(format!("FRED request for {source_id} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "FRED request for {source_id} failed with status {}.",
                resp.status()
            )));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::fetch(format!("Failed to parse FRED response: {e}")))?;

        let mut out = Vec::new();
        for obs in body.observations {
            let value = match parse_value(&obs.value) {
                Some(v) => v,
                None => continue,
            };
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
                .map_err(|e| AppError::fetch(format!("Invalid FRED date '{}': {e}", obs.date)))?;
            out.push(Observation::new(date, value));
        }

        out.sort_by_key(|p| p.date);
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

/// FRED marks missing values with "." in the payload; drop those along with
/// anything non-finite.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_values_are_filtered() {
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("  .  "), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("4.25"), Some(4.25));
        assert_eq!(parse_value(" 102.7 "), Some(102.7));
    }

    #[test]
    fn response_payload_deserializes() {
        let json = r#"{"observations":[
            {"realtime_start":"2024-03-15","date":"2024-03-14","value":"4.25"},
            {"realtime_start":"2024-03-15","date":"2024-03-15","value":"."}
        ]}"#;
        let body: ObservationsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.observations.len(), 2);
        assert_eq!(body.observations[0].date, "2024-03-14");
        assert_eq!(parse_value(&body.observations[1].value), None);
    }
}
