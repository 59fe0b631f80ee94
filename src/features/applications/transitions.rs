//! Transition table for `ApplicationStatus`. Pure so the whole lifecycle is
//! testable without a database; the repository applies the returned effect
//! inside the same transaction that rewrites the application row.

use crate::features::applications::models::ApplicationStatus;
use crate::utilities::errors::AppError;

/// What a transition does to the parent property. `in_agreement` is the
/// trigger that marks the property rented; leaving an agreement by
/// completion or cancellation returns it to the marketplace.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PropertyEffect {
    None,
    MarkRented,
    MarkPublished,
}

/// Outcome of validating a requested status write.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Transition {
    /// Same status re-submitted: succeed without touching anything.
    NoOp,
    /// Valid move; `requires_sole_agreement` asks the repository to check
    /// that no competing application on the property is already approved
    /// or in agreement.
    Apply {
        effect: PropertyEffect,
        requires_sole_agreement: bool,
    },
}

pub fn validate_transition(
    current: ApplicationStatus,
    requested: ApplicationStatus,
) -> Result<Transition, AppError> {
    use ApplicationStatus::*;

    if current == requested {
        return Ok(Transition::NoOp);
    }

    let transition = match (current, requested) {
        (Pending, Approved) => Transition::Apply {
            effect: PropertyEffect::None,
            requires_sole_agreement: true,
        },
        (Pending, Rejected) | (Pending, Cancelled) => Transition::Apply {
            effect: PropertyEffect::None,
            requires_sole_agreement: false,
        },
        (Approved, Cancelled) => Transition::Apply {
            effect: PropertyEffect::None,
            requires_sole_agreement: false,
        },
        (Approved, InAgreement) => Transition::Apply {
            effect: PropertyEffect::MarkRented,
            requires_sole_agreement: false,
        },
        (InAgreement, Completed) | (InAgreement, Cancelled) => Transition::Apply {
            effect: PropertyEffect::MarkPublished,
            requires_sole_agreement: false,
        },
        (current, requested) => {
            return Err(AppError::Conflict(format!(
                "Cannot move an application from {current:?} to {requested:?}"
            )));
        }
    };

    Ok(transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn approval_requires_sole_agreement_check() {
        match validate_transition(Pending, Approved) {
            Ok(Transition::Apply {
                requires_sole_agreement: true,
                effect: PropertyEffect::None,
            }) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn entering_agreement_marks_property_rented() {
        match validate_transition(Approved, InAgreement) {
            Ok(Transition::Apply {
                effect: PropertyEffect::MarkRented,
                ..
            }) => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn leaving_agreement_returns_property_to_marketplace() {
        for requested in [Completed, Cancelled] {
            match validate_transition(InAgreement, requested) {
                Ok(Transition::Apply {
                    effect: PropertyEffect::MarkPublished,
                    ..
                }) => {}
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn resubmitting_current_status_is_a_no_op() {
        for status in [Pending, Approved, InAgreement, Completed, Rejected, Cancelled] {
            assert!(matches!(
                validate_transition(status, status),
                Ok(Transition::NoOp)
            ));
        }
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for current in [Completed, Rejected, Cancelled] {
            for requested in [Pending, Approved, InAgreement] {
                match validate_transition(current, requested) {
                    Err(AppError::Conflict(_)) => {}
                    other => panic!("expected conflict for {current:?} -> {requested:?}, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn nothing_returns_to_pending() {
        for current in [Approved, InAgreement] {
            match validate_transition(current, Pending) {
                Err(AppError::Conflict(_)) => {}
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn agreement_cannot_be_skipped() {
        match validate_transition(Pending, InAgreement) {
            Err(AppError::Conflict(_)) => {}
            other => panic!("unexpected {other:?}"),
        }
        match validate_transition(Pending, Completed) {
            Err(AppError::Conflict(_)) => {}
            other => panic!("unexpected {other:?}"),
        }
    }
}
