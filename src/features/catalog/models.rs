use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Amenities and rules are structurally identical reference catalogs; the
/// kind picks the backing tables.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CatalogKind {
    Amenity,
    Rule,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Amenity => "amenities",
            CatalogKind::Rule => "rules",
        }
    }

    pub fn link_table(self) -> &'static str {
        match self {
            CatalogKind::Amenity => "property_amenities",
            CatalogKind::Rule => "property_rules",
        }
    }

    pub fn link_column(self) -> &'static str {
        match self {
            CatalogKind::Amenity => "amenity_id",
            CatalogKind::Rule => "rule_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Amenity => "Amenity",
            CatalogKind::Rule => "Rule",
        }
    }
}

#[derive(FromRow, Deserialize, Serialize, PartialEq, Debug)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub icon_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
