use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::features::catalog::models::{CatalogEntry, CatalogKind};
use crate::features::catalog::schemas::{CatalogEntryIn, CatalogEntryUpdate};
use crate::utilities::errors::AppError;

pub async fn list_entries(pool: &PgPool, kind: CatalogKind) -> Result<Vec<CatalogEntry>, AppError> {
    let entries = sqlx::query_as::<_, CatalogEntry>(&format!(
        "SELECT id, name, icon_key, created_at, updated_at FROM {} ORDER BY name ASC",
        kind.table()
    ))
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

pub async fn create_entry(
    pool: &PgPool,
    kind: CatalogKind,
    entry_in: &CatalogEntryIn,
) -> Result<CatalogEntry, AppError> {
    let entry = sqlx::query_as::<_, CatalogEntry>(&format!(
        r#"
        INSERT INTO {} (id, name, icon_key)
        VALUES ($1, $2, $3)
        RETURNING id, name, icon_key, created_at, updated_at
        "#,
        kind.table()
    ))
    .bind(Uuid::new_v4())
    .bind(&entry_in.name)
    .bind(&entry_in.icon_key)
    .fetch_one(pool)
    .await
    .map_err(|err| {
        AppError::map_unique_violation(err, &format!("{} name or icon_key already in use", kind.label()))
    })?;

    Ok(entry)
}

pub async fn update_entry(
    pool: &PgPool,
    kind: CatalogKind,
    entry_id: Uuid,
    update: &CatalogEntryUpdate,
) -> Result<CatalogEntry, AppError> {
    if update.name.is_none() && update.icon_key.is_none() {
        return sqlx::query_as::<_, CatalogEntry>(&format!(
            "SELECT id, name, icon_key, created_at, updated_at FROM {} WHERE id = $1",
            kind.table()
        ))
        .bind(entry_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.label())));
    }

    let mut update_qb = QueryBuilder::new(format!("UPDATE {} SET ", kind.table()));
    let mut fields = update_qb.separated(", ");
    if let Some(name) = &update.name {
        fields.push("name = ").push_bind_unseparated(name.clone());
    }
    if let Some(icon_key) = &update.icon_key {
        fields
            .push("icon_key = ")
            .push_bind_unseparated(icon_key.clone());
    }
    fields.push("updated_at = NOW()");
    update_qb.push(" WHERE id = ").push_bind(entry_id);
    update_qb.push(" RETURNING id, name, icon_key, created_at, updated_at");

    let entry = update_qb
        .build_query_as::<CatalogEntry>()
        .fetch_optional(pool)
        .await
        .map_err(|err| {
            AppError::map_unique_violation(
                err,
                &format!("{} name or icon_key already in use", kind.label()),
            )
        })?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.label())))?;

    Ok(entry)
}

pub async fn delete_entry(pool: &PgPool, kind: CatalogKind, entry_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
        .bind(entry_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("{} not found", kind.label())));
    }

    Ok(())
}
