use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

pub const CAREERS: [&str; 6] = [
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

/// Geocoded address in GeoJSON point form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

impl Location {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
            formatted_address: None,
            street: None,
            city: None,
            state: None,
            zipcode: None,
            country: None,
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Flat storage columns behind `Location`
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct GeoColumns {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

impl GeoColumns {
    pub fn to_location(&self) -> Option<Location> {
        let (longitude, latitude) = (self.longitude?, self.latitude?);
        Some(Location {
            formatted_address: self.formatted_address.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zipcode: self.zipcode.clone(),
            country: self.country.clone(),
            ..Location::point(longitude, latitude)
        })
    }
}

impl From<Location> for GeoColumns {
    fn from(location: Location) -> Self {
        Self {
            longitude: Some(location.longitude()),
            latitude: Some(location.latitude()),
            formatted_address: location.formatted_address,
            street: location.street,
            city: location.city,
            state: location.state,
            zipcode: location.zipcode,
            country: location.country,
        }
    }
}

fn serialize_location<S: Serializer>(geo: &GeoColumns, serializer: S) -> Result<S::Ok, S::Error> {
    geo.to_location().serialize(serializer)
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[sqlx(flatten)]
    #[serde(rename = "location", serialize_with = "serialize_location")]
    pub geo: GeoColumns,
    pub careers: Vec<String>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<i64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// URL-friendly form of a listing name: lowercase ASCII words joined by `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_joins() {
        assert_eq!(slugify("Devworks Bootcamp"), "devworks-bootcamp");
        assert_eq!(slugify("  ModernTech   Bootcamp! "), "moderntech-bootcamp");
        assert_eq!(slugify("Codemasters (UI/UX)"), "codemasters-uiux");
        assert_eq!(slugify("dev--camp"), "dev-camp");
    }

    #[test]
    fn location_serializes_as_geojson_point() {
        let geo = GeoColumns {
            longitude: Some(-71.104028),
            latitude: Some(42.350846),
            city: Some("Boston".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(geo.to_location()).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"], serde_json::json!([-71.104028, 42.350846]));
        assert_eq!(json["city"], "Boston");
    }

    #[test]
    fn missing_coordinates_mean_no_location() {
        assert!(GeoColumns::default().to_location().is_none());
    }
}
