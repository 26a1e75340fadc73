//! Receiver and claim integration tests

use chrono::NaiveDate;
use food_rescue::app::{
    claim_create, claim_delete, claim_list, listing_create, provider_create, receiver_create,
    receiver_delete, receiver_get, receiver_list, ClaimCreateReq, FoodListingCreateReq,
    ProviderCreateReq, ReceiverCreateReq,
};
use food_rescue::domain::{ClaimStatus, FoodType, MealType, ProviderType};
use food_rescue::infra::db::init_test_db;
use food_rescue::infra::DbPool;

// ──────────────────────── Helper ────────────────────────

fn make_receiver_req(name: &str) -> ReceiverCreateReq {
    ReceiverCreateReq {
        name: name.to_string(),
        receiver_type: "NGO".to_string(),
        city: "Springfield".to_string(),
        contact: "555-0199".to_string(),
    }
}

/// One provider with one listing; returns the listing id.
fn seed_listing(pool: &DbPool) -> i64 {
    let provider = provider_create(
        pool,
        ProviderCreateReq {
            name: "Joe's Deli".to_string(),
            provider_type: ProviderType::Restaurant,
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            contact: "555-0100".to_string(),
        },
    )
    .unwrap();
    listing_create(
        pool,
        FoodListingCreateReq {
            food_name: "Sandwiches".to_string(),
            quantity: 20,
            expiry_date: "2024-01-10".to_string(),
            provider_id: provider.id,
            provider_type: None,
            location: None,
            food_type: FoodType::Vegetarian,
            meal_type: MealType::Lunch,
        },
    )
    .unwrap()
    .id
}

// ══════════════════════════════════════════════════════════
//  receivers
// ══════════════════════════════════════════════════════════

#[test]
fn create_and_get_receiver() {
    let pool = init_test_db();
    let created = receiver_create(&pool, make_receiver_req("Food Bank")).unwrap();
    assert_eq!(created.receiver_type, "NGO");
    assert_eq!(receiver_get(&pool, created.id).unwrap(), Some(created));
}

#[test]
fn create_receiver_requires_name_and_type() {
    let pool = init_test_db();
    let err = receiver_create(&pool, make_receiver_req(" ")).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    let mut req = make_receiver_req("Food Bank");
    req.receiver_type = String::new();
    let err = receiver_create(&pool, req).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[test]
fn list_receivers_in_id_order() {
    let pool = init_test_db();
    receiver_create(&pool, make_receiver_req("Zeta")).unwrap();
    receiver_create(&pool, make_receiver_req("Alpha")).unwrap();
    let names: Vec<String> = receiver_list(&pool)
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Zeta", "Alpha"]);
}

#[test]
fn delete_receiver_cascades_to_claims() {
    let pool = init_test_db();
    let food_id = seed_listing(&pool);
    let receiver = receiver_create(&pool, make_receiver_req("Food Bank")).unwrap();
    claim_create(
        &pool,
        ClaimCreateReq {
            food_id,
            receiver_id: receiver.id,
            status: Some(ClaimStatus::Completed),
            timestamp: None,
        },
    )
    .unwrap();

    assert!(receiver_delete(&pool, receiver.id).unwrap());
    assert!(claim_list(&pool).unwrap().is_empty());
    assert!(!receiver_delete(&pool, receiver.id).unwrap());
}

// ══════════════════════════════════════════════════════════
//  claims
// ══════════════════════════════════════════════════════════

#[test]
fn create_claim_defaults_to_pending_now() {
    let pool = init_test_db();
    let food_id = seed_listing(&pool);
    let receiver = receiver_create(&pool, make_receiver_req("Food Bank")).unwrap();
    let claim = claim_create(
        &pool,
        ClaimCreateReq {
            food_id,
            receiver_id: receiver.id,
            status: None,
            timestamp: None,
        },
    )
    .unwrap();
    assert_eq!(claim.status, ClaimStatus::Pending);

    let stored = claim_list(&pool).unwrap();
    assert_eq!(stored, vec![claim]);
}

#[test]
fn create_claim_with_explicit_status_and_timestamp() {
    let pool = init_test_db();
    let food_id = seed_listing(&pool);
    let receiver = receiver_create(&pool, make_receiver_req("Food Bank")).unwrap();
    let claim = claim_create(
        &pool,
        ClaimCreateReq {
            food_id,
            receiver_id: receiver.id,
            status: Some(ClaimStatus::Cancelled),
            timestamp: Some("2025-03-05 05:43:00".to_string()),
        },
    )
    .unwrap();
    let expected = NaiveDate::from_ymd_opt(2025, 3, 5)
        .unwrap()
        .and_hms_opt(5, 43, 0)
        .unwrap();
    assert_eq!(claim.timestamp, expected);
    assert_eq!(claim_list(&pool).unwrap()[0].timestamp, expected);
    assert_eq!(claim_list(&pool).unwrap()[0].status, ClaimStatus::Cancelled);
}

#[test]
fn create_claim_bad_timestamp_is_validation_error() {
    let pool = init_test_db();
    let food_id = seed_listing(&pool);
    let receiver = receiver_create(&pool, make_receiver_req("Food Bank")).unwrap();
    let err = claim_create(
        &pool,
        ClaimCreateReq {
            food_id,
            receiver_id: receiver.id,
            status: None,
            timestamp: Some("yesterday".to_string()),
        },
    )
    .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[test]
fn create_claim_on_missing_listing_or_receiver_is_referential_error() {
    let pool = init_test_db();
    let food_id = seed_listing(&pool);
    let receiver = receiver_create(&pool, make_receiver_req("Food Bank")).unwrap();

    let err = claim_create(
        &pool,
        ClaimCreateReq {
            food_id: 999,
            receiver_id: receiver.id,
            status: None,
            timestamp: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.code(), "REFERENTIAL_ERROR");

    let err = claim_create(
        &pool,
        ClaimCreateReq {
            food_id,
            receiver_id: 999,
            status: None,
            timestamp: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.code(), "REFERENTIAL_ERROR");
    assert!(claim_list(&pool).unwrap().is_empty());
}

#[test]
fn delete_claim_by_id() {
    let pool = init_test_db();
    let food_id = seed_listing(&pool);
    let receiver = receiver_create(&pool, make_receiver_req("Food Bank")).unwrap();
    let claim = claim_create(
        &pool,
        ClaimCreateReq {
            food_id,
            receiver_id: receiver.id,
            status: None,
            timestamp: None,
        },
    )
    .unwrap();
    assert!(claim_delete(&pool, claim.id).unwrap());
    assert!(!claim_delete(&pool, claim.id).unwrap());
}
