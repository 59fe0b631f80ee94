use bigdecimal::BigDecimal;
use sqlx::{FromRow, PgPool, QueryBuilder, types::Json};
use tracing::debug;
use uuid::Uuid;

use crate::features::catalog::models::CatalogKind;
use crate::features::catalog::schemas::CatalogOut;
use crate::features::properties::models::{PropertyRow, PropertyStatus};
use crate::features::properties::schemas::{
    LocationOut, PropertyIn, PropertyOut, PropertySummaryOut, PropertyUpdate,
};
use crate::features::properties::transitions::validate_status_change;
use crate::features::users::schemas::PublicUserOut;
use crate::utilities::access::{can_view_unpublished, owner_or_admin};
use crate::utilities::errors::AppError;
use crate::utilities::jwt::Claims;
use crate::utilities::pagination::Pagination;

const SUMMARY_SELECT: &str = r#"
    SELECT
        p.id,
        p.owner_id,
        p.title,
        p.description,
        p.address_text,
        ST_X(p.location::geometry) AS longitude,
        ST_Y(p.location::geometry) AS latitude,
        p.price_per_month,
        p.deposit_amount,
        p.cover_image_url,
        p.media_gallery,
        p.status,
        p.is_property_verified,
        p.created_at,
        p.updated_at,
        u.name AS owner_name,
        u.is_identity_verified AS owner_is_identity_verified
    FROM properties p
    JOIN users u ON u.id = p.owner_id
"#;

#[derive(FromRow)]
struct PropertyDetailRow {
    #[sqlx(flatten)]
    property: PropertyRow,
    amenities: Json<Vec<CatalogOut>>,
    rules: Json<Vec<CatalogOut>>,
}

/// Small row locked (`FOR UPDATE`) at the start of every mutating sequence.
#[derive(FromRow)]
pub struct PropertyGuardRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub status: PropertyStatus,
    pub price_per_month: BigDecimal,
    pub deposit_amount: BigDecimal,
    pub owner_identity_verified: bool,
}

fn location_of(row: &PropertyRow) -> Option<LocationOut> {
    match (row.longitude, row.latitude) {
        (Some(longitude), Some(latitude)) => Some(LocationOut {
            longitude,
            latitude,
        }),
        _ => None,
    }
}

fn to_summary(row: PropertyRow) -> PropertySummaryOut {
    let location = location_of(&row);
    PropertySummaryOut {
        id: row.id,
        title: row.title,
        address_text: row.address_text,
        location,
        price_per_month: row.price_per_month,
        deposit_amount: row.deposit_amount,
        cover_image_url: row.cover_image_url,
        status: row.status,
        is_property_verified: row.is_property_verified,
        created_at: row.created_at,
        updated_at: row.updated_at,
        owner: PublicUserOut {
            id: row.owner_id,
            name: row.owner_name,
            is_identity_verified: row.owner_is_identity_verified,
        },
    }
}

fn to_detail(row: PropertyDetailRow) -> PropertyOut {
    let PropertyDetailRow {
        property: row,
        amenities,
        rules,
    } = row;
    let location = location_of(&row);
    PropertyOut {
        id: row.id,
        title: row.title,
        description: row.description,
        address_text: row.address_text,
        location,
        price_per_month: row.price_per_month,
        deposit_amount: row.deposit_amount,
        cover_image_url: row.cover_image_url,
        media_gallery: row.media_gallery.0,
        status: row.status,
        is_property_verified: row.is_property_verified,
        created_at: row.created_at,
        updated_at: row.updated_at,
        owner: PublicUserOut {
            id: row.owner_id,
            name: row.owner_name,
            is_identity_verified: row.owner_is_identity_verified,
        },
        amenities: amenities.0,
        rules: rules.0,
    }
}

async fn fetch_detail(pool: &PgPool, property_id: Uuid) -> Result<Option<PropertyOut>, AppError> {
    let row = sqlx::query_as::<_, PropertyDetailRow>(
        r#"
        SELECT
            p.id,
            p.owner_id,
            p.title,
            p.description,
            p.address_text,
            ST_X(p.location::geometry) AS longitude,
            ST_Y(p.location::geometry) AS latitude,
            p.price_per_month,
            p.deposit_amount,
            p.cover_image_url,
            p.media_gallery,
            p.status,
            p.is_property_verified,
            p.created_at,
            p.updated_at,
            u.name AS owner_name,
            u.is_identity_verified AS owner_is_identity_verified,
            COALESCE(
                (SELECT jsonb_agg(
                    jsonb_build_object('id', a.id, 'name', a.name, 'icon_key', a.icon_key)
                    ORDER BY a.name
                )
                FROM property_amenities pa
                JOIN amenities a ON a.id = pa.amenity_id
                WHERE pa.property_id = p.id),
                '[]'::jsonb
            ) AS amenities,
            COALESCE(
                (SELECT jsonb_agg(
                    jsonb_build_object('id', r.id, 'name', r.name, 'icon_key', r.icon_key)
                    ORDER BY r.name
                )
                FROM property_rules pr
                JOIN rules r ON r.id = pr.rule_id
                WHERE pr.property_id = p.id),
                '[]'::jsonb
            ) AS rules
        FROM properties p
        JOIN users u ON u.id = p.owner_id
        WHERE p.id = $1 AND p.deleted_at IS NULL
        "#,
    )
    .bind(property_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(to_detail))
}

/// Detail view with the visibility rule: non-published properties surface
/// as NotFound to everyone but the owner or an admin, so their existence
/// is not leaked.
pub async fn get_property(
    pool: &PgPool,
    property_id: Uuid,
    claims: Option<&Claims>,
) -> Result<PropertyOut, AppError> {
    let property = fetch_detail(pool, property_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    if property.status == PropertyStatus::Published
        || can_view_unpublished(property.owner.id, claims)
    {
        return Ok(property);
    }

    Err(AppError::NotFound("Property not found".to_string()))
}

pub async fn list_public(
    pool: &PgPool,
    pagination: &Pagination,
) -> Result<(Vec<PropertySummaryOut>, i64), AppError> {
    // Only whitelisted columns are ever interpolated into ORDER BY.
    let order = match pagination.sort_by.as_deref() {
        Some("price_per_month") => format!("p.price_per_month {}", pagination.sort_dir.as_sql()),
        Some("created_at") => format!("p.created_at {}", pagination.sort_dir.as_sql()),
        _ => "p.created_at DESC".to_string(),
    };

    let rows = sqlx::query_as::<_, PropertyRow>(&format!(
        "{SUMMARY_SELECT} WHERE p.status = 'published' AND p.deleted_at IS NULL \
         ORDER BY {order} OFFSET $1 LIMIT $2",
    ))
    .bind(pagination.offset)
    .bind(pagination.limit)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM properties WHERE status = 'published' AND deleted_at IS NULL",
    )
    .fetch_one(pool)
    .await?;

    Ok((rows.into_iter().map(to_summary).collect(), total))
}

pub async fn list_by_owner(
    pool: &PgPool,
    owner_id: Uuid,
    status: Option<PropertyStatus>,
    pagination: &Pagination,
) -> Result<(Vec<PropertySummaryOut>, i64), AppError> {
    let mut list_qb = QueryBuilder::new(SUMMARY_SELECT);
    list_qb.push(" WHERE p.owner_id = ").push_bind(owner_id);
    list_qb.push(" AND p.deleted_at IS NULL");

    let mut count_qb = QueryBuilder::new(
        "SELECT COUNT(*) FROM properties p WHERE p.owner_id = ",
    );
    count_qb.push_bind(owner_id);
    count_qb.push(" AND p.deleted_at IS NULL");

    if let Some(status) = status {
        list_qb.push(" AND p.status = ").push_bind(status);
        count_qb.push(" AND p.status = ").push_bind(status);
    }

    list_qb.push(" ORDER BY p.updated_at DESC");
    list_qb.push(" OFFSET ").push_bind(pagination.offset);
    list_qb.push(" LIMIT ").push_bind(pagination.limit);

    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;
    let rows = list_qb
        .build_query_as::<PropertyRow>()
        .fetch_all(pool)
        .await?;

    Ok((rows.into_iter().map(to_summary).collect(), total))
}

/// Creates a new property as a draft. Only landlords whose identity has
/// been verified may create listings.
pub async fn create_property(
    pool: &PgPool,
    owner_id: Uuid,
    property_in: &PropertyIn,
) -> Result<PropertyOut, AppError> {
    let verified = sqlx::query_scalar::<_, bool>(
        "SELECT is_identity_verified FROM users WHERE id = $1",
    )
    .bind(owner_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !verified {
        return Err(AppError::Forbidden(
            "Identity must be verified before creating properties".to_string(),
        ));
    }

    let property_id = Uuid::new_v4();
    let (longitude, latitude) = match &property_in.location {
        Some(location) => (Some(location.longitude), Some(location.latitude)),
        None => (None, None),
    };

    sqlx::query(
        r#"
        INSERT INTO properties (
            id, owner_id, title, description, address_text, location,
            price_per_month, deposit_amount, cover_image_url, media_gallery
        )
        VALUES (
            $1, $2, $3, $4, $5,
            CASE
                WHEN $6::float8 IS NULL OR $7::float8 IS NULL THEN NULL
                ELSE ST_SetSRID(ST_MakePoint($6::float8, $7::float8), 4326)::geography
            END,
            $8, $9, $10, $11
        )
        "#,
    )
    .bind(property_id)
    .bind(owner_id)
    .bind(&property_in.title)
    .bind(&property_in.description)
    .bind(&property_in.address_text)
    .bind(longitude)
    .bind(latitude)
    .bind(&property_in.price_per_month)
    .bind(&property_in.deposit_amount)
    .bind(&property_in.cover_image_url)
    .bind(Json(property_in.media_gallery.clone()))
    .execute(pool)
    .await?;

    debug!(%property_id, "property created as draft");

    fetch_detail(pool, property_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))
}

/// Partial update. Status changes run through the transition table; the
/// guard row is locked so a concurrent agreement flip cannot slip between
/// the check and the write.
pub async fn update_property(
    pool: &PgPool,
    property_id: Uuid,
    claims: &Claims,
    update: &PropertyUpdate,
) -> Result<PropertyOut, AppError> {
    let mut tx = pool.begin().await?;

    let guard = sqlx::query_as::<_, PropertyGuardRow>(
        r#"
        SELECT p.id, p.owner_id, p.status, p.price_per_month, p.deposit_amount,
               u.is_identity_verified AS owner_identity_verified
        FROM properties p
        JOIN users u ON u.id = p.owner_id
        WHERE p.id = $1 AND p.deleted_at IS NULL
        FOR UPDATE OF p
        "#,
    )
    .bind(property_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    owner_or_admin(guard.owner_id, claims)?;

    if let Some(requested) = update.status {
        validate_status_change(guard.status, requested, guard.owner_identity_verified)?;
    }

    if !update.is_empty() {
        let mut update_qb = QueryBuilder::new("UPDATE properties SET ");
        let mut fields = update_qb.separated(", ");
        if let Some(title) = &update.title {
            fields.push("title = ").push_bind_unseparated(title.clone());
        }
        if let Some(description) = &update.description {
            fields
                .push("description = ")
                .push_bind_unseparated(description.clone());
        }
        if let Some(address_text) = &update.address_text {
            fields
                .push("address_text = ")
                .push_bind_unseparated(address_text.clone());
        }
        if let Some(location) = &update.location {
            fields
                .push("location = ST_SetSRID(ST_MakePoint(")
                .push_bind_unseparated(location.longitude)
                .push_unseparated(", ")
                .push_bind_unseparated(location.latitude)
                .push_unseparated("), 4326)::geography");
        }
        if let Some(price_per_month) = &update.price_per_month {
            fields
                .push("price_per_month = ")
                .push_bind_unseparated(price_per_month.clone());
        }
        if let Some(deposit_amount) = &update.deposit_amount {
            fields
                .push("deposit_amount = ")
                .push_bind_unseparated(deposit_amount.clone());
        }
        if let Some(cover_image_url) = &update.cover_image_url {
            fields
                .push("cover_image_url = ")
                .push_bind_unseparated(cover_image_url.clone());
        }
        if let Some(media_gallery) = &update.media_gallery {
            fields
                .push("media_gallery = ")
                .push_bind_unseparated(Json(media_gallery.clone()));
        }
        if let Some(status) = update.status {
            fields.push("status = ").push_bind_unseparated(status);
        }
        fields.push("updated_at = NOW()");
        update_qb.push(" WHERE id = ").push_bind(property_id);

        update_qb.build().execute(&mut *tx).await?;
    }

    tx.commit().await?;

    fetch_detail(pool, property_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Property not found".to_string()))
}

/// Soft delete. A property with an active rental must close its agreement
/// first.
pub async fn delete_property(
    pool: &PgPool,
    property_id: Uuid,
    claims: &Claims,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let guard = sqlx::query_as::<_, PropertyGuardRow>(
        r#"
        SELECT p.id, p.owner_id, p.status, p.price_per_month, p.deposit_amount,
               u.is_identity_verified AS owner_identity_verified
        FROM properties p
        JOIN users u ON u.id = p.owner_id
        WHERE p.id = $1 AND p.deleted_at IS NULL
        FOR UPDATE OF p
        "#,
    )
    .bind(property_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    owner_or_admin(guard.owner_id, claims)?;

    if guard.status == PropertyStatus::Rented {
        return Err(AppError::Forbidden(
            "Cannot delete a property with an active rental".to_string(),
        ));
    }

    sqlx::query("UPDATE properties SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
        .bind(property_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Links a catalog entry (amenity or rule) to a property. Linking twice is
/// a no-op.
pub async fn link_catalog_entry(
    pool: &PgPool,
    property_id: Uuid,
    kind: CatalogKind,
    entry_id: Uuid,
    claims: &Claims,
) -> Result<(), AppError> {
    let owner_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT owner_id FROM properties WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(property_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    owner_or_admin(owner_id, claims)?;

    let exists = sqlx::query_scalar::<_, bool>(&format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
        kind.table()
    ))
    .bind(entry_id)
    .fetch_one(pool)
    .await?;

    if !exists {
        return Err(AppError::NotFound(format!("{} not found", kind.label())));
    }

    sqlx::query(&format!(
        "INSERT INTO {} (property_id, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        kind.link_table(),
        kind.link_column()
    ))
    .bind(property_id)
    .bind(entry_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Unlinks a catalog entry. Removing an absent link is a no-op as well.
pub async fn unlink_catalog_entry(
    pool: &PgPool,
    property_id: Uuid,
    kind: CatalogKind,
    entry_id: Uuid,
    claims: &Claims,
) -> Result<(), AppError> {
    let owner_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT owner_id FROM properties WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(property_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

    owner_or_admin(owner_id, claims)?;

    sqlx::query(&format!(
        "DELETE FROM {} WHERE property_id = $1 AND {} = $2",
        kind.link_table(),
        kind.link_column()
    ))
    .bind(property_id)
    .bind(entry_id)
    .execute(pool)
    .await?;

    Ok(())
}
