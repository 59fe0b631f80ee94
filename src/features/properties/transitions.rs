//! Transition rules for `PropertyStatus`, kept as pure functions so the
//! guard table is testable without a database. The repository runs these
//! inside the update transaction.

use crate::features::properties::models::PropertyStatus;
use crate::utilities::errors::AppError;

/// Validates a status change requested through the generic update endpoint.
///
/// Allowed: draft -> published (owner identity must be verified),
/// published -> draft (unpublish). A property never enters or leaves
/// `rented` here; only the agreement completion/cancellation path in the
/// applications module moves a rented property.
pub fn validate_status_change(
    current: PropertyStatus,
    requested: PropertyStatus,
    owner_identity_verified: bool,
) -> Result<(), AppError> {
    if current == requested {
        return Ok(());
    }

    match (current, requested) {
        (PropertyStatus::Draft, PropertyStatus::Published) => {
            if owner_identity_verified {
                Ok(())
            } else {
                Err(AppError::Forbidden(
                    "Identity must be verified before publishing a property".to_string(),
                ))
            }
        }
        (PropertyStatus::Published, PropertyStatus::Draft) => Ok(()),
        (PropertyStatus::Rented, _) => Err(AppError::Conflict(
            "Cannot change the status of a property with an active rental".to_string(),
        )),
        (_, PropertyStatus::Rented) => Err(AppError::Conflict(
            "A property becomes rented only through an accepted application".to_string(),
        )),
        // Equal pairs already returned above.
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_requires_verified_identity() {
        assert!(
            validate_status_change(PropertyStatus::Draft, PropertyStatus::Published, true).is_ok()
        );
        match validate_status_change(PropertyStatus::Draft, PropertyStatus::Published, false) {
            Err(AppError::Forbidden(_)) => {}
            other => panic!("expected forbidden, got {other:?}"),
        }
    }

    #[test]
    fn unpublish_is_always_allowed() {
        assert!(
            validate_status_change(PropertyStatus::Published, PropertyStatus::Draft, false).is_ok()
        );
    }

    #[test]
    fn rented_is_locked_against_manual_changes() {
        for requested in [PropertyStatus::Draft, PropertyStatus::Published] {
            match validate_status_change(PropertyStatus::Rented, requested, true) {
                Err(AppError::Conflict(_)) => {}
                other => panic!("expected conflict, got {other:?}"),
            }
        }
    }

    #[test]
    fn rented_cannot_be_entered_manually() {
        for current in [PropertyStatus::Draft, PropertyStatus::Published] {
            match validate_status_change(current, PropertyStatus::Rented, true) {
                Err(AppError::Conflict(_)) => {}
                other => panic!("expected conflict, got {other:?}"),
            }
        }
    }

    #[test]
    fn same_status_is_a_no_op() {
        for status in [
            PropertyStatus::Draft,
            PropertyStatus::Published,
            PropertyStatus::Rented,
        ] {
            assert!(validate_status_change(status, status, false).is_ok());
        }
    }
}
