use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type, types::Json};
use uuid::Uuid;

#[derive(Type, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "property_status", rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Draft,
    Published,
    Rented,
}

impl PropertyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Draft => "draft",
            PropertyStatus::Published => "published",
            PropertyStatus::Rented => "rented",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
}

/// A property row joined with its owner's public fields. The stored
/// geography point is decoded as a longitude/latitude pair.
#[derive(FromRow, Debug)]
pub struct PropertyRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub address_text: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub price_per_month: BigDecimal,
    pub deposit_amount: BigDecimal,
    pub cover_image_url: Option<String>,
    pub media_gallery: Json<Vec<MediaItem>>,
    pub status: PropertyStatus,
    pub is_property_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub owner_name: String,
    pub owner_is_identity_verified: bool,
}
