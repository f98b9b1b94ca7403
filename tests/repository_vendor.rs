use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use store_locator::domain::repositories::VendorRepository;
use store_locator::infrastructure::persistence::PgVendorRepository;

async fn insert_vendor(
    pool: &PgPool,
    name: &str,
    location: Option<(f64, f64)>,
    service_areas: Option<serde_json::Value>,
    approved: bool,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO vendors (name, latitude, longitude, service_areas, fulfillment_modes, approved)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(location.map(|(lat, _)| lat))
    .bind(location.map(|(_, lng)| lng))
    .bind(service_areas)
    .bind(json!({"delivery": true, "pickup": true}))
    .bind(approved)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_fetch_approved_skips_unapproved(pool: PgPool) {
    let repo = PgVendorRepository::new(Arc::new(pool.clone()));

    insert_vendor(&pool, "Approved", Some((19.43, -99.13)), None, true).await;
    insert_vendor(&pool, "Pending", Some((19.43, -99.13)), None, false).await;

    let vendors = repo.fetch_approved(false).await.unwrap();

    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0].name, "Approved");
    assert_eq!(vendors[0].fulfillment.delivery, Some(true));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_fetch_approved_with_required_coordinates(pool: PgPool) {
    let repo = PgVendorRepository::new(Arc::new(pool.clone()));

    insert_vendor(&pool, "Located", Some((19.43, -99.13)), None, true).await;
    insert_vendor(&pool, "Area only", None, Some(json!(["03310"])), true).await;

    let located = repo.fetch_approved(true).await.unwrap();
    assert_eq!(located.len(), 1);
    assert_eq!(located[0].name, "Located");

    let all = repo.fetch_approved(false).await.unwrap();
    assert_eq!(all.len(), 2);
    let area_vendor = all.iter().find(|v| v.name == "Area only").unwrap();
    assert!(area_vendor.coordinate.is_none());
    assert_eq!(
        area_vendor.service_area.as_ref().unwrap().codes()[0].as_str(),
        "03310"
    );
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_json_encoded_service_area_string(pool: PgPool) {
    let repo = PgVendorRepository::new(Arc::new(pool.clone()));

    let id = insert_vendor(
        &pool,
        "Legacy",
        None,
        Some(json!("[\"3310\", {\"postal_code\": \"06700\"}]")),
        true,
    )
    .await;

    let vendor = repo.find_approved(id).await.unwrap().unwrap();
    let codes: Vec<&str> = vendor
        .service_area
        .as_ref()
        .unwrap()
        .codes()
        .iter()
        .map(|c| c.as_str())
        .collect();

    assert_eq!(codes, vec!["03310", "06700"]);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_approved(pool: PgPool) {
    let repo = PgVendorRepository::new(Arc::new(pool.clone()));

    let approved = insert_vendor(&pool, "Approved", Some((19.43, -99.13)), None, true).await;
    let pending = insert_vendor(&pool, "Pending", Some((19.43, -99.13)), None, false).await;

    assert!(repo.find_approved(approved).await.unwrap().is_some());
    assert!(repo.find_approved(pending).await.unwrap().is_none());
    assert!(repo.find_approved(999_999).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_count_approved(pool: PgPool) {
    let repo = PgVendorRepository::new(Arc::new(pool.clone()));

    assert_eq!(repo.count_approved().await.unwrap(), 0);

    insert_vendor(&pool, "One", None, None, true).await;
    insert_vendor(&pool, "Two", None, None, true).await;
    insert_vendor(&pool, "Hidden", None, None, false).await;

    assert_eq!(repo.count_approved().await.unwrap(), 2);
}
