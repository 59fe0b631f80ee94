use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::catalog::schemas::CatalogOut;
use crate::features::properties::models::{MediaItem, PropertyStatus};
use crate::features::users::schemas::PublicUserOut;
use crate::utilities::pagination::RawPagination;

fn validate_non_negative(amount: &BigDecimal) -> Result<(), ValidationError> {
    if amount < &BigDecimal::from(0) {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

#[derive(Deserialize, Serialize, Validate, Clone, Copy, Debug)]
pub struct LocationIn {
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
}

#[derive(Serialize, Debug)]
pub struct LocationOut {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Deserialize, Validate, Debug)]
pub struct PropertyIn {
    #[validate(length(min = 5, max = 255))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 10))]
    pub address_text: Option<String>,
    #[validate(nested)]
    pub location: Option<LocationIn>,
    #[validate(custom(function = validate_non_negative))]
    pub price_per_month: BigDecimal,
    #[serde(default)]
    #[validate(custom(function = validate_non_negative))]
    pub deposit_amount: BigDecimal,
    #[validate(url)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub media_gallery: Vec<MediaItem>,
}

#[derive(Deserialize, Validate, Default, Debug)]
pub struct PropertyUpdate {
    #[validate(length(min = 5, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 10))]
    pub address_text: Option<String>,
    #[validate(nested)]
    pub location: Option<LocationIn>,
    #[validate(custom(function = validate_non_negative))]
    pub price_per_month: Option<BigDecimal>,
    #[validate(custom(function = validate_non_negative))]
    pub deposit_amount: Option<BigDecimal>,
    #[validate(url)]
    pub cover_image_url: Option<String>,
    pub media_gallery: Option<Vec<MediaItem>>,
    pub status: Option<PropertyStatus>,
}

impl PropertyUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.address_text.is_none()
            && self.location.is_none()
            && self.price_per_month.is_none()
            && self.deposit_amount.is_none()
            && self.cover_image_url.is_none()
            && self.media_gallery.is_none()
            && self.status.is_none()
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct MyPropertiesQuery {
    #[serde(flatten)]
    pub pagination: RawPagination,
    pub status: Option<PropertyStatus>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct PublicPropertiesQuery {
    #[serde(flatten)]
    pub pagination: RawPagination,
}

#[derive(Deserialize, Debug)]
pub struct LinkAmenityIn {
    pub amenity_id: Uuid,
}

#[derive(Deserialize, Debug)]
pub struct LinkRuleIn {
    pub rule_id: Uuid,
}

#[derive(Serialize, Debug)]
pub struct PropertyOut {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub address_text: Option<String>,
    pub location: Option<LocationOut>,
    pub price_per_month: BigDecimal,
    pub deposit_amount: BigDecimal,
    pub cover_image_url: Option<String>,
    pub media_gallery: Vec<MediaItem>,
    pub status: PropertyStatus,
    pub is_property_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: PublicUserOut,
    pub amenities: Vec<CatalogOut>,
    pub rules: Vec<CatalogOut>,
}

/// Compact form for list endpoints; catalog links are only loaded on the
/// detail view.
#[derive(Serialize, Debug)]
pub struct PropertySummaryOut {
    pub id: Uuid,
    pub title: String,
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
}
