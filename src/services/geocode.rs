use crate::core::location::{Coordinates, Place, ReverseGeocoder};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reverse geocoding
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Map a full Brazilian state name to its two-letter abbreviation.
///
/// Closed lookup table; an unmapped name means the resolution attempt fails
/// rather than guessing.
pub fn state_abbreviation(state_name: &str) -> Option<&'static str> {
    const STATES: [(&str, &str); 27] = [
        ("acre", "AC"),
        ("alagoas", "AL"),
        ("amapá", "AP"),
        ("amazonas", "AM"),
        ("bahia", "BA"),
        ("ceará", "CE"),
        ("distrito federal", "DF"),
        ("espírito santo", "ES"),
        ("goiás", "GO"),
        ("maranhão", "MA"),
        ("mato grosso", "MT"),
        ("mato grosso do sul", "MS"),
        ("minas gerais", "MG"),
        ("pará", "PA"),
        ("paraíba", "PB"),
        ("paraná", "PR"),
        ("pernambuco", "PE"),
        ("piauí", "PI"),
        ("rio de janeiro", "RJ"),
        ("rio grande do norte", "RN"),
        ("rio grande do sul", "RS"),
        ("rondônia", "RO"),
        ("roraima", "RR"),
        ("santa catarina", "SC"),
        ("são paulo", "SP"),
        ("sergipe", "SE"),
        ("tocantins", "TO"),
    ];

    let needle = state_name.trim().to_lowercase();
    STATES
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, abbrev)| *abbrev)
}

/// Reverse-geocoding HTTP client.
///
/// Talks to a Nominatim-compatible endpoint. The response body is treated as
/// untrusted: only the `{city, stateName}` shape is extracted, everything else
/// is ignored. Successful lookups are cached in-process keyed by coordinates
/// rounded to four decimal places.
pub struct ReverseGeocodeClient {
    base_url: String,
    user_agent: String,
    client: Client,
    cache: moka::future::Cache<String, Place>,
}

impl ReverseGeocodeClient {
    pub fn new(
        base_url: String,
        user_agent: String,
        timeout_secs: u64,
        cache_size: u64,
        cache_ttl_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let cache = moka::future::CacheBuilder::new(cache_size)
            .time_to_live(Duration::from_secs(cache_ttl_secs))
            .build();

        Self {
            base_url,
            user_agent,
            client,
            cache,
        }
    }

    /// Reverse-geocode coordinates into a `(city, state name)` pair
    pub async fn lookup(&self, coords: Coordinates) -> Result<Place, GeocodeError> {
        let key = cache_key(coords);
        if let Some(place) = self.cache.get(&key).await {
            tracing::trace!("Geocode cache hit: {}", key);
            return Ok(place);
        }

        let url = format!(
            "{}/reverse?format=jsonv2&lat={}&lon={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&coords.latitude.to_string()),
            urlencoding::encode(&coords.longitude.to_string()),
        );

        tracing::debug!("Reverse geocoding: {}", key);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::ApiError(format!(
                "Reverse geocode failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let place = extract_place(&json)?;

        self.cache.insert(key, place.clone()).await;
        Ok(place)
    }
}

#[async_trait]
impl ReverseGeocoder for ReverseGeocodeClient {
    async fn reverse(&self, coords: Coordinates) -> Result<Place, GeocodeError> {
        self.lookup(coords).await
    }
}

fn cache_key(coords: Coordinates) -> String {
    format!("{:.4},{:.4}", coords.latitude, coords.longitude)
}

/// Extract the `(city, state name)` pair from an untrusted response body.
///
/// Nominatim reports the locality under `address.city`, `address.town` or
/// `address.village` depending on place size.
fn extract_place(json: &Value) -> Result<Place, GeocodeError> {
    let address = json
        .get("address")
        .and_then(|a| a.as_object())
        .ok_or_else(|| GeocodeError::InvalidResponse("Missing address object".into()))?;

    let city = ["city", "town", "village"]
        .iter()
        .find_map(|field| address.get(*field).and_then(|v| v.as_str()))
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| GeocodeError::InvalidResponse("Missing city name".into()))?;

    let state_name = address
        .get("state")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| GeocodeError::InvalidResponse("Missing state name".into()))?;

    Ok(Place {
        city: city.trim().to_string(),
        state_name: state_name.trim().to_string(),
    })
}
