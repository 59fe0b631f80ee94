use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate, Debug)]
pub struct CatalogEntryIn {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub icon_key: Option<String>,
}

#[derive(Deserialize, Validate, Debug)]
pub struct CatalogEntryUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub icon_key: Option<String>,
}

/// Compact catalog row embedded in property and search responses.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CatalogOut {
    pub id: Uuid,
    pub name: String,
    pub icon_key: Option<String>,
}
