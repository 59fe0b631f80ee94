use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use uuid::Uuid;

use crate::features::catalog::schemas::CatalogOut;
use crate::features::properties::models::PropertyStatus;
use crate::features::properties::schemas::LocationOut;
use crate::features::users::schemas::PublicUserOut;
use crate::utilities::errors::AppError;

pub const DEFAULT_RADIUS_METERS: f64 = 5000.0;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Accepts `?amenities=uuid1,uuid2`; empty segments are dropped, malformed
/// UUIDs reject the whole query.
fn deserialize_uuid_list<'de, D>(deserializer: D) -> Result<Option<Vec<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| Uuid::parse_str(part).map_err(serde::de::Error::custom))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(if ids.is_empty() { None } else { Some(ids) })
}

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SearchQuery {
    pub q: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    pub price_min: Option<f64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub price_max: Option<f64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    pub lat: Option<f64>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub lng: Option<f64>,
    #[serde_as(as = "DisplayFromStr")]
    pub radius_meters: f64,

    #[serde(deserialize_with = "deserialize_uuid_list")]
    pub amenities: Option<Vec<Uuid>>,
    #[serde(deserialize_with = "deserialize_uuid_list")]
    pub rules: Option<Vec<Uuid>>,

    #[serde_as(as = "DisplayFromStr")]
    pub limit: i64,
    #[serde_as(as = "DisplayFromStr")]
    pub offset: i64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            q: None,
            price_min: None,
            price_max: None,
            lat: None,
            lng: None,
            radius_meters: DEFAULT_RADIUS_METERS,
            amenities: None,
            rules: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl SearchQuery {
    /// Cross-field checks that must reject the request before any query
    /// runs. Limit and offset are deliberately not part of this: they
    /// clamp instead of erroring.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(price_min) = self.price_min {
            if price_min < 0.0 {
                return Err(AppError::ValidationError(
                    "price_min cannot be negative".to_string(),
                ));
            }
        }
        if let Some(price_max) = self.price_max {
            if price_max < 0.0 {
                return Err(AppError::ValidationError(
                    "price_max cannot be negative".to_string(),
                ));
            }
        }
        if let (Some(price_min), Some(price_max)) = (self.price_min, self.price_max) {
            if price_max < price_min {
                return Err(AppError::ValidationError(
                    "price_max cannot be lower than price_min".to_string(),
                ));
            }
        }

        match (self.lat, self.lng) {
            (Some(_), None) => {
                return Err(AppError::ValidationError(
                    "lng is required when lat is provided".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(AppError::ValidationError(
                    "lat is required when lng is provided".to_string(),
                ));
            }
            _ => {}
        }

        if let Some(lat) = self.lat {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(AppError::ValidationError("lat is out of range".to_string()));
            }
        }
        if let Some(lng) = self.lng {
            if !(-180.0..=180.0).contains(&lng) {
                return Err(AppError::ValidationError("lng is out of range".to_string()));
            }
        }
        if self.radius_meters <= 0.0 {
            return Err(AppError::ValidationError(
                "radius_meters must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// (lng, lat) when the caller asked for a geographic search.
    pub fn geo_point(&self) -> Option<(f64, f64)> {
        match (self.lng, self.lat) {
            (Some(lng), Some(lat)) => Some((lng, lat)),
            _ => None,
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }
}

/// A published property as returned by the public search, with its linked
/// catalog entries and, for geographic searches, the distance from the
/// requested point.
#[derive(Serialize, Debug)]
pub struct SearchResultOut {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub address_text: Option<String>,
    pub location: Option<LocationOut>,
    pub price_per_month: BigDecimal,
    pub deposit_amount: BigDecimal,
    pub cover_image_url: Option<String>,
    pub status: PropertyStatus,
    pub is_property_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: PublicUserOut,
    pub amenities: Vec<CatalogOut>,
    pub rules: Vec<CatalogOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}
