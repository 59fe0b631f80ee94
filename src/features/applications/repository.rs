use sqlx::{FromRow, PgPool, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::features::applications::models::{Application, ApplicationStatus};
use crate::features::applications::schemas::{
    ApplicationOut, MyApplicationOut, PropertyCardOut, ReceivedApplicationOut,
};
use crate::features::applications::transitions::{
    PropertyEffect, Transition, validate_transition,
};
use crate::features::properties::models::PropertyStatus;
use crate::features::users::schemas::PublicUserOut;
use crate::utilities::access::owner_or_admin;
use crate::utilities::errors::AppError;
use crate::utilities::jwt::Claims;
use crate::utilities::pagination::Pagination;

const APPLICATION_COLUMNS: &str = "id, property_id, applicant_id, status, \
     rent_amount_at_application, deposit_amount_at_application, created_at, updated_at";

/// Creates a pending application with the property's current rent and
/// deposit frozen in. The property row is locked for the duration of the
/// guard checks so a concurrent unpublish or competing application cannot
/// invalidate them mid-flight.
pub async fn create_application(
    pool: &PgPool,
    applicant_id: Uuid,
    property_id: Uuid,
) -> Result<ApplicationOut, AppError> {
    let mut tx = pool.begin().await?;

    let property = sqlx::query_as::<_, PropertyApplicationGuard>(
        r#"
        SELECT id, owner_id, status, price_per_month, deposit_amount
        FROM properties
        WHERE id = $1 AND deleted_at IS NULL
        FOR UPDATE
        "#,
    )
    .bind(property_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    if property.status != PropertyStatus::Published {
        return Err(AppError::Conflict(
            "This property is not accepting applications".to_string(),
        ));
    }

    if property.owner_id == applicant_id {
        return Err(AppError::Forbidden(
            "You cannot apply to your own property".to_string(),
        ));
    }

    let already_active = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM applications
            WHERE property_id = $1
              AND applicant_id = $2
              AND status IN ('pending', 'approved', 'in_agreement')
              AND deleted_at IS NULL
        )
        "#,
    )
    .bind(property_id)
    .bind(applicant_id)
    .fetch_one(&mut *tx)
    .await?;

    if already_active {
        return Err(AppError::Conflict(
            "You already have an active application for this property".to_string(),
        ));
    }

    let application = sqlx::query_as::<_, Application>(&format!(
        r#"
        INSERT INTO applications (
            id, property_id, applicant_id, status,
            rent_amount_at_application, deposit_amount_at_application
        )
        VALUES ($1, $2, $3, 'pending', $4, $5)
        RETURNING {APPLICATION_COLUMNS}
        "#,
    ))
    .bind(Uuid::new_v4())
    .bind(property_id)
    .bind(applicant_id)
    .bind(&property.price_per_month)
    .bind(&property.deposit_amount)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    debug!(application_id = %application.id, %property_id, "application created");

    Ok(ApplicationOut::from(application))
}

/// Status write by the property owner (or an admin). The application and
/// its property are locked together, so two concurrent approvals on
/// sibling applications serialize: the second one sees the winner's
/// agreement and fails with Conflict. An application whose property has
/// been soft-deleted answers NotFound; nothing may move a deleted
/// property.
pub async fn update_application_status(
    pool: &PgPool,
    application_id: Uuid,
    claims: &Claims,
    requested: ApplicationStatus,
) -> Result<ApplicationOut, AppError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, ApplicationGuardRow>(
        r#"
        SELECT a.id, a.property_id, a.applicant_id, a.status, p.owner_id
        FROM applications a
        JOIN properties p ON p.id = a.property_id
        WHERE a.id = $1 AND a.deleted_at IS NULL AND p.deleted_at IS NULL
        FOR UPDATE OF a, p
        "#,
    )
    .bind(application_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    owner_or_admin(current.owner_id, claims)?;

    let transition = validate_transition(current.status, requested)?;

    let (effect, requires_sole_agreement) = match transition {
        Transition::NoOp => {
            // Same status re-submitted; nothing to write.
            let application = fetch_application(&mut tx, application_id).await?;
            tx.commit().await?;
            return Ok(ApplicationOut::from(application));
        }
        Transition::Apply {
            effect,
            requires_sole_agreement,
        } => (effect, requires_sole_agreement),
    };

    if requires_sole_agreement {
        let competing = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM applications
                WHERE property_id = $1
                  AND id <> $2
                  AND status IN ('approved', 'in_agreement')
                  AND deleted_at IS NULL
            )
            "#,
        )
        .bind(current.property_id)
        .bind(application_id)
        .fetch_one(&mut *tx)
        .await?;

        if competing {
            return Err(AppError::Conflict(
                "Another application for this property already has an agreement in progress"
                    .to_string(),
            ));
        }
    }

    sqlx::query("UPDATE applications SET status = $1, updated_at = NOW() WHERE id = $2")
        .bind(requested)
        .bind(application_id)
        .execute(&mut *tx)
        .await?;

    match effect {
        PropertyEffect::None => {}
        PropertyEffect::MarkRented => {
            sqlx::query(
                "UPDATE properties SET status = 'rented', updated_at = NOW() WHERE id = $1",
            )
            .bind(current.property_id)
            .execute(&mut *tx)
            .await?;
        }
        PropertyEffect::MarkPublished => {
            sqlx::query(
                "UPDATE properties SET status = 'published', updated_at = NOW() WHERE id = $1",
            )
            .bind(current.property_id)
            .execute(&mut *tx)
            .await?;
        }
    }

    let application = fetch_application(&mut tx, application_id).await?;
    tx.commit().await?;

    debug!(
        %application_id,
        from = ?current.status,
        to = ?requested,
        "application status updated"
    );

    Ok(ApplicationOut::from(application))
}

pub async fn list_my_applications(
    pool: &PgPool,
    applicant_id: Uuid,
    status: Option<ApplicationStatus>,
    pagination: &Pagination,
) -> Result<(Vec<MyApplicationOut>, i64), AppError> {
    let mut list_qb = QueryBuilder::new(
        r#"
        SELECT
            a.id, a.property_id, a.applicant_id, a.status,
            a.rent_amount_at_application, a.deposit_amount_at_application,
            a.created_at, a.updated_at,
            p.title AS property_title,
            p.cover_image_url AS property_cover_image_url,
            p.address_text AS property_address_text
        FROM applications a
        JOIN properties p ON p.id = a.property_id
        WHERE a.applicant_id =
        "#,
    );
    list_qb.push_bind(applicant_id);
    list_qb.push(" AND a.deleted_at IS NULL AND p.deleted_at IS NULL");

    // Applications on soft-deleted properties are hidden from both lists.
    let mut count_qb = QueryBuilder::new(
        "SELECT COUNT(*) FROM applications a \
         JOIN properties p ON p.id = a.property_id WHERE a.applicant_id = ",
    );
    count_qb.push_bind(applicant_id);
    count_qb.push(" AND a.deleted_at IS NULL AND p.deleted_at IS NULL");

    if let Some(status) = status {
        list_qb.push(" AND a.status = ").push_bind(status);
        count_qb.push(" AND a.status = ").push_bind(status);
    }

    list_qb.push(" ORDER BY a.updated_at DESC");
    list_qb.push(" OFFSET ").push_bind(pagination.offset);
    list_qb.push(" LIMIT ").push_bind(pagination.limit);

    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;
    let rows = list_qb
        .build_query_as::<MyApplicationRow>()
        .fetch_all(pool)
        .await?;

    let items = rows
        .into_iter()
        .map(|row| MyApplicationOut {
            property: PropertyCardOut {
                id: row.application.property_id,
                title: row.property_title,
                cover_image_url: row.property_cover_image_url,
                address_text: row.property_address_text,
            },
            application: ApplicationOut::from(row.application),
        })
        .collect();

    Ok((items, total))
}

pub async fn list_received_applications(
    pool: &PgPool,
    owner_id: Uuid,
    status: Option<ApplicationStatus>,
    pagination: &Pagination,
) -> Result<(Vec<ReceivedApplicationOut>, i64), AppError> {
    let mut list_qb = QueryBuilder::new(
        r#"
        SELECT
            a.id, a.property_id, a.applicant_id, a.status,
            a.rent_amount_at_application, a.deposit_amount_at_application,
            a.created_at, a.updated_at,
            p.title AS property_title,
            p.cover_image_url AS property_cover_image_url,
            p.address_text AS property_address_text,
            u.name AS applicant_name,
            u.is_identity_verified AS applicant_is_identity_verified
        FROM applications a
        JOIN properties p ON p.id = a.property_id
        JOIN users u ON u.id = a.applicant_id
        WHERE p.owner_id =
        "#,
    );
    list_qb.push_bind(owner_id);
    list_qb.push(" AND a.deleted_at IS NULL AND p.deleted_at IS NULL");

    let mut count_qb = QueryBuilder::new(
        "SELECT COUNT(*) FROM applications a \
         JOIN properties p ON p.id = a.property_id WHERE p.owner_id = ",
    );
    count_qb.push_bind(owner_id);
    count_qb.push(" AND a.deleted_at IS NULL AND p.deleted_at IS NULL");

    if let Some(status) = status {
        list_qb.push(" AND a.status = ").push_bind(status);
        count_qb.push(" AND a.status = ").push_bind(status);
    }

    list_qb.push(" ORDER BY a.created_at DESC");
    list_qb.push(" OFFSET ").push_bind(pagination.offset);
    list_qb.push(" LIMIT ").push_bind(pagination.limit);

    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;
    let rows = list_qb
        .build_query_as::<ReceivedApplicationRow>()
        .fetch_all(pool)
        .await?;

    let items = rows
        .into_iter()
        .map(|row| ReceivedApplicationOut {
            property: PropertyCardOut {
                id: row.application.property_id,
                title: row.property_title,
                cover_image_url: row.property_cover_image_url,
                address_text: row.property_address_text,
            },
            applicant: PublicUserOut {
                id: row.application.applicant_id,
                name: row.applicant_name,
                is_identity_verified: row.applicant_is_identity_verified,
            },
            application: ApplicationOut::from(row.application),
        })
        .collect();

    Ok((items, total))
}

async fn fetch_application(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    application_id: Uuid,
) -> Result<Application, AppError> {
    let application = sqlx::query_as::<_, Application>(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1",
    ))
    .bind(application_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(application)
}

#[derive(FromRow)]
struct PropertyApplicationGuard {
    #[allow(dead_code)]
    id: Uuid,
    owner_id: Uuid,
    status: PropertyStatus,
    price_per_month: bigdecimal::BigDecimal,
    deposit_amount: bigdecimal::BigDecimal,
}

#[derive(FromRow)]
struct ApplicationGuardRow {
    #[allow(dead_code)]
    id: Uuid,
    property_id: Uuid,
    #[allow(dead_code)]
    applicant_id: Uuid,
    status: ApplicationStatus,
    owner_id: Uuid,
}

#[derive(FromRow)]
struct MyApplicationRow {
    #[sqlx(flatten)]
    application: Application,
    property_title: String,
    property_cover_image_url: Option<String>,
    property_address_text: Option<String>,
}

#[derive(FromRow)]
struct ReceivedApplicationRow {
    #[sqlx(flatten)]
    application: Application,
    property_title: String,
    property_cover_image_url: Option<String>,
    property_address_text: Option<String>,
    applicant_name: String,
    applicant_is_identity_verified: bool,
}
