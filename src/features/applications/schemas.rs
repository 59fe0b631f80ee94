use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::applications::models::{Application, ApplicationStatus};
use crate::features::users::schemas::PublicUserOut;
use crate::utilities::pagination::RawPagination;

#[derive(Deserialize, Debug)]
pub struct ApplicationIn {
    pub property_id: Uuid,
}

/// Status write requested by the property owner (or recorded on behalf of
/// the contract/payment collaborators). `pending` is never assignable;
/// the transition table rejects it.
#[derive(Deserialize, Debug)]
pub struct ApplicationStatusIn {
    pub status: ApplicationStatus,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct ApplicationsQuery {
    #[serde(flatten)]
    pub pagination: RawPagination,
    pub status: Option<ApplicationStatus>,
}

/// Card with the property fields an applicant sees in their list.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct PropertyCardOut {
    pub id: Uuid,
    pub title: String,
    pub cover_image_url: Option<String>,
    pub address_text: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ApplicationOut {
    pub id: Uuid,
    pub property_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub rent_amount_at_application: BigDecimal,
    pub deposit_amount_at_application: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Application> for ApplicationOut {
    fn from(application: Application) -> Self {
        Self {
            id: application.id,
            property_id: application.property_id,
            applicant_id: application.applicant_id,
            status: application.status,
            rent_amount_at_application: application.rent_amount_at_application,
            deposit_amount_at_application: application.deposit_amount_at_application,
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

/// An applicant's own application joined with its property card.
#[derive(Serialize, Debug)]
pub struct MyApplicationOut {
    #[serde(flatten)]
    pub application: ApplicationOut,
    pub property: PropertyCardOut,
}

/// An incoming application as the property owner sees it.
#[derive(Serialize, Debug)]
pub struct ReceivedApplicationOut {
    #[serde(flatten)]
    pub application: ApplicationOut,
    pub property: PropertyCardOut,
    pub applicant: PublicUserOut,
}
