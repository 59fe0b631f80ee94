//! End-to-end repository tests against a real Postgres with PostGIS.
//!
//! Run with a database available:
//!   DATABASE_URL=postgres://... cargo test -- --ignored

use bigdecimal::BigDecimal;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use rental_service::features::applications::models::ApplicationStatus;
use rental_service::features::applications::repository::{
    create_application, list_my_applications, update_application_status,
};
use rental_service::features::properties::models::PropertyStatus;
use rental_service::features::properties::repository::{
    create_property, delete_property, get_property, link_catalog_entry, update_property,
};
use rental_service::features::catalog::models::CatalogKind;
use rental_service::features::properties::schemas::{LocationIn, PropertyIn, PropertyUpdate};
use rental_service::features::search::repository::perform_search;
use rental_service::features::search::schemas::SearchQuery;
use rental_service::features::users::models::UserRole;
use rental_service::utilities::errors::AppError;
use rental_service::utilities::jwt::{Claims, TokenType};
use rental_service::utilities::pagination::{Pagination, RawPagination};

async fn connect() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for this test");
    let pool = PgPool::connect(&url).await.expect("database reachable");
    sqlx::migrate!().run(&pool).await.expect("migrations apply");
    pool
}

fn claims(user_id: Uuid, role: UserRole) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: user_id,
        role,
        typ: TokenType::Access,
        iat: now,
        exp: now + 3600,
    }
}

async fn seed_user(pool: &PgPool, role: UserRole, verified: bool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO users (id, name, email, role, is_identity_verified) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind("Test User")
    .bind(format!("{id}@example.com"))
    .bind(role)
    .bind(verified)
    .execute(pool)
    .await
    .expect("user inserted");
    id
}

fn property_in(title: &str, price: i32) -> PropertyIn {
    PropertyIn {
        title: title.to_string(),
        description: Some("Departamento amplio cerca del centro".to_string()),
        address_text: Some("Av. Juarez 123, Guadalajara".to_string()),
        location: Some(LocationIn {
            longitude: -103.35,
            latitude: 20.67,
        }),
        price_per_month: BigDecimal::from(price),
        deposit_amount: BigDecimal::from(price),
        cover_image_url: None,
        media_gallery: Vec::new(),
    }
}

async fn seed_published_property(pool: &PgPool, owner_id: Uuid, title: &str, price: i32) -> Uuid {
    let owner = claims(owner_id, UserRole::Landlord);
    let property = create_property(pool, owner_id, &property_in(title, price))
        .await
        .expect("property created");

    let update = PropertyUpdate {
        status: Some(PropertyStatus::Published),
        ..Default::default()
    };
    update_property(pool, property.id, &owner, &update)
        .await
        .expect("property published");

    property.id
}

#[tokio::test]
#[ignore = "requires a postgres database"]
async fn drafts_are_invisible_to_strangers() {
    let pool = connect().await;
    let owner_id = seed_user(&pool, UserRole::Landlord, true).await;
    let stranger_id = seed_user(&pool, UserRole::Tenant, false).await;

    let property = create_property(&pool, owner_id, &property_in("Casa en borrador", 8000))
        .await
        .expect("property created");
    assert_eq!(property.status, PropertyStatus::Draft);

    match get_property(&pool, property.id, None).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("anonymous caller should get NotFound, got {other:?}"),
    }

    let stranger = claims(stranger_id, UserRole::Tenant);
    match get_property(&pool, property.id, Some(&stranger)).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("stranger should get NotFound, got {other:?}"),
    }

    let owner = claims(owner_id, UserRole::Landlord);
    let visible = get_property(&pool, property.id, Some(&owner))
        .await
        .expect("owner sees own draft");
    assert_eq!(visible.id, property.id);
}

#[tokio::test]
#[ignore = "requires a postgres database"]
async fn full_rental_flow_freezes_price_and_flips_property_status() {
    let pool = connect().await;
    let owner_id = seed_user(&pool, UserRole::Landlord, true).await;
    let tenant_id = seed_user(&pool, UserRole::Tenant, false).await;
    let property_id = seed_published_property(&pool, owner_id, "Loft centro historico", 12000).await;

    let application = create_application(&pool, tenant_id, property_id)
        .await
        .expect("application created");
    assert_eq!(application.status, ApplicationStatus::Pending);
    assert_eq!(application.rent_amount_at_application, BigDecimal::from(12000));

    // A later price change must not touch the frozen amounts.
    let owner = claims(owner_id, UserRole::Landlord);
    let reprice = PropertyUpdate {
        price_per_month: Some(BigDecimal::from(15000)),
        ..Default::default()
    };
    update_property(&pool, property_id, &owner, &reprice)
        .await
        .expect("price updated");

    let approved =
        update_application_status(&pool, application.id, &owner, ApplicationStatus::Approved)
            .await
            .expect("application approved");
    assert_eq!(approved.status, ApplicationStatus::Approved);
    assert_eq!(approved.rent_amount_at_application, BigDecimal::from(12000));

    let in_agreement = update_application_status(
        &pool,
        application.id,
        &owner,
        ApplicationStatus::InAgreement,
    )
    .await
    .expect("agreement started");
    assert_eq!(in_agreement.status, ApplicationStatus::InAgreement);

    let rented = get_property(&pool, property_id, Some(&owner))
        .await
        .expect("property still visible to owner");
    assert_eq!(rented.status, PropertyStatus::Rented);

    // A rented property no longer accepts applications.
    let late_tenant_id = seed_user(&pool, UserRole::Tenant, false).await;
    match create_application(&pool, late_tenant_id, property_id).await {
        Err(AppError::Conflict(_)) => {}
        other => panic!("rented property should reject applications, got {other:?}"),
    }

    let completed = update_application_status(
        &pool,
        application.id,
        &owner,
        ApplicationStatus::Completed,
    )
    .await
    .expect("agreement completed");
    assert_eq!(completed.status, ApplicationStatus::Completed);

    let relisted = get_property(&pool, property_id, Some(&owner))
        .await
        .expect("property visible");
    assert_eq!(relisted.status, PropertyStatus::Published);
}

#[tokio::test]
#[ignore = "requires a postgres database"]
async fn resubmitting_the_current_status_is_a_no_op() {
    let pool = connect().await;
    let owner_id = seed_user(&pool, UserRole::Landlord, true).await;
    let tenant_id = seed_user(&pool, UserRole::Tenant, false).await;
    let property_id = seed_published_property(&pool, owner_id, "Estudio con terraza", 7000).await;

    let application = create_application(&pool, tenant_id, property_id)
        .await
        .expect("application created");

    let owner = claims(owner_id, UserRole::Landlord);
    update_application_status(&pool, application.id, &owner, ApplicationStatus::Approved)
        .await
        .expect("first approval");
    let again =
        update_application_status(&pool, application.id, &owner, ApplicationStatus::Approved)
            .await
            .expect("repeated approval is accepted");
    assert_eq!(again.status, ApplicationStatus::Approved);
}

#[tokio::test]
#[ignore = "requires a postgres database"]
async fn deleting_a_property_freezes_its_applications() {
    let pool = connect().await;
    let owner_id = seed_user(&pool, UserRole::Landlord, true).await;
    let tenant_id = seed_user(&pool, UserRole::Tenant, false).await;
    let property_id = seed_published_property(&pool, owner_id, "Casa pronto retirada", 6000).await;

    let application = create_application(&pool, tenant_id, property_id)
        .await
        .expect("application created");

    let owner = claims(owner_id, UserRole::Landlord);
    delete_property(&pool, property_id, &owner)
        .await
        .expect("property soft deleted");

    // The lifecycle must not move applications on a deleted property, and
    // certainly must not flip the property back to a live status.
    match update_application_status(&pool, application.id, &owner, ApplicationStatus::Approved)
        .await
    {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound for a deleted property, got {other:?}"),
    }

    let pagination = Pagination::parse(&RawPagination::default());
    let (items, total) = list_my_applications(&pool, tenant_id, None, &pagination)
        .await
        .expect("list runs");
    assert_eq!(total, 0);
    assert!(items.is_empty());
}

#[tokio::test]
#[ignore = "requires a postgres database"]
async fn concurrent_approvals_admit_exactly_one_winner() {
    let pool = connect().await;
    let owner_id = seed_user(&pool, UserRole::Landlord, true).await;
    let first_tenant = seed_user(&pool, UserRole::Tenant, false).await;
    let second_tenant = seed_user(&pool, UserRole::Tenant, false).await;
    let property_id = seed_published_property(&pool, owner_id, "Casa con dos aspirantes", 9000).await;

    let first = create_application(&pool, first_tenant, property_id)
        .await
        .expect("first application");
    let second = create_application(&pool, second_tenant, property_id)
        .await
        .expect("second application");

    let owner = claims(owner_id, UserRole::Landlord);
    let owner_again = claims(owner_id, UserRole::Landlord);

    let (left, right) = tokio::join!(
        update_application_status(&pool, first.id, &owner, ApplicationStatus::Approved),
        update_application_status(&pool, second.id, &owner_again, ApplicationStatus::Approved),
    );

    let successes = [&left, &right].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one approval must win");

    let loser = if left.is_ok() { right } else { left };
    match loser {
        Err(AppError::Conflict(_)) => {}
        other => panic!("losing approval should be Conflict, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires a postgres database"]
async fn search_composes_price_text_geo_and_amenity_filters() {
    let pool = connect().await;
    let owner_id = seed_user(&pool, UserRole::Landlord, true).await;
    let owner = claims(owner_id, UserRole::Landlord);

    let marker = Uuid::new_v4().simple().to_string();
    let near_id = seed_published_property(
        &pool,
        owner_id,
        &format!("Departamento soleado {marker}"),
        10000,
    )
    .await;
    let expensive_id = seed_published_property(
        &pool,
        owner_id,
        &format!("Penthouse soleado {marker}"),
        50000,
    )
    .await;

    let both_id = seed_published_property(
        &pool,
        owner_id,
        &format!("Casa equipada soleado {marker}"),
        11000,
    )
    .await;

    let wifi_id = Uuid::new_v4();
    let parking_id = Uuid::new_v4();
    for (id, name) in [(wifi_id, "wifi"), (parking_id, "parking")] {
        sqlx::query("INSERT INTO amenities (id, name) VALUES ($1, $2)")
            .bind(id)
            .bind(format!("{name}-{marker}"))
            .execute(&pool)
            .await
            .expect("amenity inserted");
    }
    // near has wifi only, expensive has parking only, both has both.
    link_catalog_entry(&pool, near_id, CatalogKind::Amenity, wifi_id, &owner)
        .await
        .expect("amenity linked");
    link_catalog_entry(&pool, expensive_id, CatalogKind::Amenity, parking_id, &owner)
        .await
        .expect("amenity linked");
    link_catalog_entry(&pool, both_id, CatalogKind::Amenity, wifi_id, &owner)
        .await
        .expect("amenity linked");
    link_catalog_entry(&pool, both_id, CatalogKind::Amenity, parking_id, &owner)
        .await
        .expect("amenity linked");

    // Text narrows to the seeded rows, price drops the penthouse.
    let query = SearchQuery {
        q: Some(format!("soleado {marker}")),
        price_max: Some(20000.0),
        ..Default::default()
    };
    let (items, total) = perform_search(&pool, &query).await.expect("search runs");
    assert_eq!(total, 2);
    assert!(items.iter().all(|item| item.id != expensive_id));
    assert!(items.iter().all(|item| item.distance_meters.is_none()));

    // ALL-of: asking for both amenities keeps only the fully linked
    // property, never the partial matches.
    let query = SearchQuery {
        q: Some(marker.clone()),
        amenities: Some(vec![wifi_id, parking_id]),
        ..Default::default()
    };
    let (items, total) = perform_search(&pool, &query).await.expect("search runs");
    assert_eq!(total, 1);
    assert_eq!(items[0].id, both_id);
    assert_eq!(items[0].amenities.len(), 2);

    // A geo search around the seeded point returns all three with
    // distances populated.
    let query = SearchQuery {
        q: Some(marker.clone()),
        lat: Some(20.67),
        lng: Some(-103.35),
        radius_meters: 10000.0,
        ..Default::default()
    };
    let (items, total) = perform_search(&pool, &query).await.expect("search runs");
    assert_eq!(total, 3);
    assert!(items.iter().all(|item| item.distance_meters.is_some()));
    assert!(items.iter().any(|item| item.id == expensive_id));
}
