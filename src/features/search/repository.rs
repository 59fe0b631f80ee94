use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, types::Json};
use tracing::debug;
use uuid::Uuid;

use crate::features::catalog::schemas::CatalogOut;
use crate::features::properties::models::PropertyRow;
use crate::features::properties::schemas::LocationOut;
use crate::features::search::schemas::{SearchQuery, SearchResultOut};
use crate::features::users::schemas::PublicUserOut;
use crate::utilities::errors::AppError;

#[derive(FromRow)]
struct SearchRow {
    #[sqlx(flatten)]
    property: PropertyRow,
    amenities: Json<Vec<CatalogOut>>,
    rules: Json<Vec<CatalogOut>>,
    distance_meters: Option<f64>,
}

/// Runs the public search. Every filter narrows the same base set of
/// published, non-deleted properties; the count query composes the
/// identical predicates without the joins, so a property with several
/// matching amenities is still counted once.
pub async fn perform_search(
    pool: &PgPool,
    query: &SearchQuery,
) -> Result<(Vec<SearchResultOut>, i64), AppError> {
    query.validate()?;

    let total = build_count_query(query)
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let rows = build_list_query(query)
        .build_query_as::<SearchRow>()
        .fetch_all(pool)
        .await?;

    debug!(total, returned = rows.len(), "search executed");

    Ok((rows.into_iter().map(to_result).collect(), total))
}

fn to_result(row: SearchRow) -> SearchResultOut {
    let SearchRow {
        property: row,
        amenities,
        rules,
        distance_meters,
    } = row;

    let location = match (row.longitude, row.latitude) {
        (Some(longitude), Some(latitude)) => Some(LocationOut {
            longitude,
            latitude,
        }),
        _ => None,
    };

    SearchResultOut {
        id: row.id,
        title: row.title,
        description: row.description,
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
        amenities: amenities.0,
        rules: rules.0,
        distance_meters,
    }
}

fn build_list_query(query: &SearchQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
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
        "#,
    );

    if let Some((lng, lat)) = query.geo_point() {
        qb.push(", ST_Distance(p.location, ST_SetSRID(ST_MakePoint(");
        qb.push_bind(lng);
        qb.push(", ");
        qb.push_bind(lat);
        qb.push("), 4326)::geography) AS distance_meters");
    } else {
        qb.push(", NULL::float8 AS distance_meters");
    }

    qb.push(
        " FROM properties p JOIN users u ON u.id = p.owner_id \
         WHERE p.status = 'published' AND p.deleted_at IS NULL",
    );

    push_filters(&mut qb, query);

    if query.geo_point().is_some() {
        qb.push(" ORDER BY distance_meters ASC");
    } else {
        qb.push(" ORDER BY p.updated_at DESC");
    }

    qb.push(" OFFSET ").push_bind(query.offset());
    qb.push(" LIMIT ").push_bind(query.limit());

    qb
}

fn build_count_query(query: &SearchQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT COUNT(*) FROM properties p \
         WHERE p.status = 'published' AND p.deleted_at IS NULL",
    );
    push_filters(&mut qb, query);
    qb
}

fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, query: &SearchQuery) {
    if let Some(price_min) = query.price_min {
        qb.push(" AND p.price_per_month >= ");
        qb.push_bind(price_min);
        qb.push("::numeric");
    }
    if let Some(price_max) = query.price_max {
        qb.push(" AND p.price_per_month <= ");
        qb.push_bind(price_max);
        qb.push("::numeric");
    }

    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        qb.push(
            " AND to_tsvector('spanish', p.title || ' ' || \
             COALESCE(p.description, '') || ' ' || COALESCE(p.address_text, '')) \
             @@ plainto_tsquery('spanish', ",
        );
        qb.push_bind(q.to_string());
        qb.push(")");
    }

    if let Some((lng, lat)) = query.geo_point() {
        qb.push(" AND ST_DWithin(p.location, ST_SetSRID(ST_MakePoint(");
        qb.push_bind(lng);
        qb.push(", ");
        qb.push_bind(lat);
        qb.push("), 4326)::geography, ");
        qb.push_bind(query.radius_meters);
        qb.push(")");
    }

    if let Some(amenity_ids) = &query.amenities {
        push_all_of_filter(qb, "property_amenities", "amenity_id", amenity_ids.clone());
    }
    if let Some(rule_ids) = &query.rules {
        push_all_of_filter(qb, "property_rules", "rule_id", rule_ids.clone());
    }
}

/// ALL-of semantics over a join table: a property qualifies only when it
/// carries every requested id. Duplicate links cannot inflate the count
/// because it is taken over DISTINCT ids.
fn push_all_of_filter(
    qb: &mut QueryBuilder<'static, Postgres>,
    link_table: &str,
    link_column: &str,
    ids: Vec<Uuid>,
) {
    let expected = ids.len() as i64;

    qb.push(" AND p.id IN (SELECT property_id FROM ");
    qb.push(link_table);
    qb.push(" WHERE ");
    qb.push(link_column);
    qb.push(" = ANY(");
    qb.push_bind(ids);
    qb.push(") GROUP BY property_id HAVING COUNT(DISTINCT ");
    qb.push(link_column);
    qb.push(") = ");
    qb.push_bind(expected);
    qb.push(")");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::search::schemas::SearchQuery;

    fn list_sql(query: &SearchQuery) -> String {
        build_list_query(query).into_sql()
    }

    fn count_sql(query: &SearchQuery) -> String {
        build_count_query(query).into_sql()
    }

    #[test]
    fn base_query_only_sees_published_listings() {
        let sql = list_sql(&SearchQuery::default());
        assert!(sql.contains("p.status = 'published'"));
        assert!(sql.contains("p.deleted_at IS NULL"));
        assert!(sql.contains("ORDER BY p.updated_at DESC"));
        assert!(sql.contains("NULL::float8 AS distance_meters"));
    }

    #[test]
    fn geo_search_filters_and_orders_by_distance() {
        let query = SearchQuery {
            lat: Some(20.67),
            lng: Some(-103.35),
            ..Default::default()
        };
        let sql = list_sql(&query);
        assert!(sql.contains("ST_DWithin(p.location"));
        assert!(sql.contains("ORDER BY distance_meters ASC"));
        assert!(sql.contains("ST_Distance(p.location"));
    }

    #[test]
    fn text_search_uses_spanish_configuration() {
        let query = SearchQuery {
            q: Some("departamento centro".to_string()),
            ..Default::default()
        };
        let sql = list_sql(&query);
        assert!(sql.contains("plainto_tsquery('spanish'"));
        assert!(sql.contains("to_tsvector('spanish'"));
    }

    #[test]
    fn blank_text_filter_is_ignored() {
        let query = SearchQuery {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!list_sql(&query).contains("plainto_tsquery"));
    }

    #[test]
    fn amenity_filter_requires_every_requested_id() {
        let query = SearchQuery {
            amenities: Some(vec![Uuid::new_v4(), Uuid::new_v4()]),
            ..Default::default()
        };
        let sql = list_sql(&query);
        assert!(sql.contains("FROM property_amenities"));
        assert!(sql.contains("HAVING COUNT(DISTINCT amenity_id)"));
    }

    #[test]
    fn count_query_carries_the_same_predicates_without_joins() {
        let query = SearchQuery {
            price_min: Some(1000.0),
            price_max: Some(5000.0),
            rules: Some(vec![Uuid::new_v4()]),
            ..Default::default()
        };
        let sql = count_sql(&query);
        assert!(sql.starts_with("SELECT COUNT(*) FROM properties p"));
        assert!(sql.contains("p.price_per_month >="));
        assert!(sql.contains("p.price_per_month <="));
        assert!(sql.contains("HAVING COUNT(DISTINCT rule_id)"));
        assert!(!sql.contains("JOIN"));
        assert!(!sql.contains("LIMIT"));
    }
}
