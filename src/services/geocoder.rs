use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{Environment, GeocoderConfig};
use crate::database::models::Location;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("No geocoding result for: {0}")]
    NoResults(String),

    #[error("GEOCODER_API_KEY must be set in {0:?}")]
    MissingApiKey(Environment),
}

/// Address -> coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError>;
}

/// MapQuest-compatible geocoding REST client
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpGeocoder {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    locations: Vec<ProviderLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderLocation {
    lat_lng: LatLng,
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    admin_area5: Option<String>,
    #[serde(default)]
    admin_area3: Option<String>,
    #[serde(default)]
    admin_area1: Option<String>,
    #[serde(default)]
    postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl ProviderLocation {
    fn into_location(self) -> Location {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let street = non_empty(self.street);
        let city = non_empty(self.admin_area5);
        let state = non_empty(self.admin_area3);
        let zipcode = non_empty(self.postal_code);
        let country = non_empty(self.admin_area1);

        let state_zip = [state.as_deref(), zipcode.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let formatted = [street.as_deref(), city.as_deref(), Some(state_zip.as_str()), country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        Location {
            formatted_address: Some(formatted).filter(|s| !s.is_empty()),
            street,
            city,
            state,
            zipcode,
            country,
            ..Location::point(self.lat_lng.lng, self.lat_lng.lat)
        }
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError> {
        let response: GeocodeResponse = self
            .client
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str()), ("location", address)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .results
            .into_iter()
            .flat_map(|r| r.locations)
            .next()
            .map(ProviderLocation::into_location)
            .ok_or_else(|| GeocodeError::NoResults(address.to_string()))
    }
}

/// Resolves every address to one configured point. Used when no provider key
/// is configured.
pub struct FixedGeocoder {
    location: Location,
}

impl FixedGeocoder {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

impl Default for FixedGeocoder {
    fn default() -> Self {
        Self::new(Location::point(-71.104028, 42.350846))
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError> {
        Ok(Location {
            formatted_address: Some(address.to_string()),
            ..self.location.clone()
        })
    }
}

/// The fixed fallback is only for development and staging. Production needs
/// a real provider or radius search returns nonsense.
pub fn from_config(
    config: &GeocoderConfig,
    environment: Environment,
) -> Result<Arc<dyn Geocoder>, GeocodeError> {
    match &config.api_key {
        Some(key) => Ok(Arc::new(HttpGeocoder::new(config.base_url.clone(), key.clone()))),
        None if environment == Environment::Production => Err(GeocodeError::MissingApiKey(environment)),
        None => {
            tracing::warn!("GEOCODER_API_KEY not set, addresses resolve to a fixed point");
            Ok(Arc::new(FixedGeocoder::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_payload_maps_to_location() {
        let payload = serde_json::json!({
            "results": [{
                "locations": [{
                    "latLng": { "lat": 42.350846, "lng": -71.104028 },
                    "street": "233 Bay State Rd",
                    "adminArea5": "Boston",
                    "adminArea3": "MA",
                    "adminArea1": "US",
                    "postalCode": "02215"
                }]
            }]
        });

        let response: GeocodeResponse = serde_json::from_value(payload).unwrap();
        let location = response
            .results
            .into_iter()
            .flat_map(|r| r.locations)
            .next()
            .unwrap()
            .into_location();

        assert_eq!(location.coordinates, [-71.104028, 42.350846]);
        assert_eq!(location.city.as_deref(), Some("Boston"));
        assert_eq!(
            location.formatted_address.as_deref(),
            Some("233 Bay State Rd, Boston, MA 02215, US")
        );
    }

    #[test]
    fn production_requires_api_key() {
        let config = GeocoderConfig::default();
        assert!(matches!(
            from_config(&config, Environment::Production),
            Err(GeocodeError::MissingApiKey(Environment::Production))
        ));
        assert!(from_config(&config, Environment::Development).is_ok());
        assert!(from_config(&config, Environment::Staging).is_ok());

        let keyed = GeocoderConfig { api_key: Some("key".to_string()), ..GeocoderConfig::default() };
        assert!(from_config(&keyed, Environment::Production).is_ok());
    }

    #[tokio::test]
    async fn fixed_geocoder_echoes_address() {
        let geocoder = FixedGeocoder::default();
        let location = geocoder.geocode("1 Main St").await.unwrap();
        assert_eq!(location.kind, "Point");
        assert_eq!(location.formatted_address.as_deref(), Some("1 Main St"));
    }
}
