use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::users::models::{User, UserRole};

/// The authenticated actor's own record.
#[derive(Serialize, Debug)]
pub struct UserOut {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_identity_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_identity_verified: user.is_identity_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Public slice of a user exposed on listings and applications.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct PublicUserOut {
    pub id: Uuid,
    pub name: String,
    pub is_identity_verified: bool,
}
