use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

#[derive(Type, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, Debug)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    InAgreement,
    Completed,
    Rejected,
    Cancelled,
}

impl ApplicationStatus {
    /// Active applications block a second one from the same applicant on
    /// the same property.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Pending
                | ApplicationStatus::Approved
                | ApplicationStatus::InAgreement
        )
    }

    /// An agreement in progress; at most one per property.
    pub fn is_agreement(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::InAgreement
        )
    }
}

#[derive(FromRow, Deserialize, Serialize, PartialEq, Debug)]
pub struct Application {
    pub id: Uuid,
    pub property_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub rent_amount_at_application: BigDecimal,
    pub deposit_amount_at_application: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
