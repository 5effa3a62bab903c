//! BigDataCloud reverse-geocoding client

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flag::{flag_emoji, is_country_code};

pub const DEFAULT_GEOCODE_URL: &str = "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// What a map click resolves to
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Place {
    pub city_name: String,
    pub country: String,
    pub country_code: String,
}

impl Place {
    pub fn emoji(&self) -> String {
        flag_emoji(&self.country_code)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GeocodingError {
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("No country found for this location")]
    NoCountry,
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Place, GeocodingError>;
}

/// Reverse-geocode response; only the fields we read
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResponse {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Map a response to a place. A usable country code is required.
pub fn place_from_response(response: GeocodeResponse) -> Result<Place, GeocodingError> {
    let country_code = non_empty(response.country_code)
        .filter(|code| is_country_code(code))
        .ok_or(GeocodingError::NoCountry)?;

    Ok(Place {
        city_name: non_empty(response.city)
            .or_else(|| non_empty(response.locality))
            .unwrap_or_default(),
        country: response.country_name.unwrap_or_default(),
        country_code,
    })
}

pub struct BigDataCloud {
    client: reqwest::Client,
    base_url: String,
}

impl BigDataCloud {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for BigDataCloud {
    fn default() -> Self {
        Self::new(DEFAULT_GEOCODE_URL)
    }
}

#[async_trait]
impl ReverseGeocoder for BigDataCloud {
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Place, GeocodingError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("latitude", lat), ("longitude", lng)])
            .send()
            .await?;
        let data: GeocodeResponse = response.json().await?;
        place_from_response(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Place, GeocodingError> {
        place_from_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_city_and_country() {
        let place = parse(
            r#"{"city":"Lisbon","locality":"Santa Maria Maior","countryName":"Portugal","countryCode":"PT"}"#,
        )
        .unwrap();

        assert_eq!(place.city_name, "Lisbon");
        assert_eq!(place.country, "Portugal");
        assert_eq!(place.emoji(), flag_emoji("PT"));
    }

    #[test]
    fn test_falls_back_to_locality() {
        let place =
            parse(r#"{"city":"","locality":"Ushuaia","countryName":"Argentina","countryCode":"AR"}"#)
                .unwrap();
        assert_eq!(place.city_name, "Ushuaia");
    }

    #[test]
    fn test_missing_names_are_empty() {
        let place = parse(r#"{"countryCode":"IS"}"#).unwrap();
        assert_eq!(place.city_name, "");
        assert_eq!(place.country, "");
    }

    #[test]
    fn test_no_country_code_is_domain_error() {
        let err = parse(r#"{"city":"","locality":"Atlantic Ocean","countryCode":""}"#).unwrap_err();
        assert!(matches!(err, GeocodingError::NoCountry));
        assert_eq!(err.to_string(), "No country found for this location");

        let err = parse(r#"{"locality":"somewhere"}"#).unwrap_err();
        assert!(matches!(err, GeocodingError::NoCountry));
    }
}
