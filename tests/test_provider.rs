//! Provider CRUD integration tests

use food_rescue::app::{
    claim_create, claim_list, listing_create, listing_list, provider_cities, provider_create,
    provider_delete, provider_get, provider_list, receiver_create, ClaimCreateReq,
    FoodListingCreateReq, ProviderCreateReq, ReceiverCreateReq,
};
use food_rescue::domain::{FoodType, MealType, ProviderType};
use food_rescue::infra::db::init_test_db;

// ──────────────────────── Helper ────────────────────────

fn make_create_req(name: &str, city: &str) -> ProviderCreateReq {
    ProviderCreateReq {
        name: name.to_string(),
        provider_type: ProviderType::Restaurant,
        address: "1 Main St".to_string(),
        city: city.to_string(),
        contact: "555-0100".to_string(),
    }
}

fn make_listing_req(provider_id: i64, food: &str, expiry: &str) -> FoodListingCreateReq {
    FoodListingCreateReq {
        food_name: food.to_string(),
        quantity: 20,
        expiry_date: expiry.to_string(),
        provider_id,
        provider_type: None,
        location: None,
        food_type: FoodType::Vegetarian,
        meal_type: MealType::Lunch,
    }
}

// ══════════════════════════════════════════════════════════
//  provider_create
// ══════════════════════════════════════════════════════════

#[test]
fn create_provider_assigns_first_id() {
    let pool = init_test_db();
    let dto = provider_create(&pool, make_create_req("Joe's Deli", "Springfield")).unwrap();
    assert_eq!(dto.id, 1);
    assert_eq!(dto.name, "Joe's Deli");
    assert_eq!(dto.provider_type, ProviderType::Restaurant);
    assert_eq!(dto.city, "Springfield");
}

#[test]
fn create_provider_allows_duplicate_names() {
    let pool = init_test_db();
    let a = provider_create(&pool, make_create_req("Same", "Springfield")).unwrap();
    let b = provider_create(&pool, make_create_req("Same", "Springfield")).unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(provider_list(&pool).unwrap().len(), 2);
}

#[test]
fn create_provider_trims_fields() {
    let pool = init_test_db();
    let dto = provider_create(&pool, make_create_req("  Trimmed  ", " Shelbyville ")).unwrap();
    assert_eq!(dto.name, "Trimmed");
    assert_eq!(dto.city, "Shelbyville");
}

#[test]
fn create_provider_empty_name_fails() {
    let pool = init_test_db();
    let err = provider_create(&pool, make_create_req("   ", "Springfield"));
    assert!(err.is_err());
    assert_eq!(err.unwrap_err().code(), "VALIDATION_ERROR");
    assert!(provider_list(&pool).unwrap().is_empty());
}

// ══════════════════════════════════════════════════════════
//  provider_get / provider_list / provider_cities
// ══════════════════════════════════════════════════════════

#[test]
fn get_provider_by_id() {
    let pool = init_test_db();
    let created = provider_create(&pool, make_create_req("GetTest", "Springfield")).unwrap();
    let fetched = provider_get(&pool, created.id).unwrap();
    assert_eq!(fetched, Some(created));
}

#[test]
fn get_provider_missing_is_none() {
    let pool = init_test_db();
    assert_eq!(provider_get(&pool, 42).unwrap(), None);
}

#[test]
fn list_providers_in_id_order() {
    let pool = init_test_db();
    provider_create(&pool, make_create_req("Charlie", "A")).unwrap();
    provider_create(&pool, make_create_req("Alpha", "B")).unwrap();
    let names: Vec<String> = provider_list(&pool)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Charlie", "Alpha"]);
}

#[test]
fn provider_cities_distinct_and_sorted() {
    let pool = init_test_db();
    provider_create(&pool, make_create_req("A", "Springfield")).unwrap();
    provider_create(&pool, make_create_req("B", "Capital City")).unwrap();
    provider_create(&pool, make_create_req("C", "Springfield")).unwrap();
    assert_eq!(
        provider_cities(&pool).unwrap(),
        vec!["Capital City".to_string(), "Springfield".to_string()]
    );
}

// ══════════════════════════════════════════════════════════
//  provider_delete
// ══════════════════════════════════════════════════════════

#[test]
fn delete_provider_cascades_to_listings() {
    let pool = init_test_db();
    let p = provider_create(&pool, make_create_req("Joe's Deli", "Springfield")).unwrap();
    listing_create(&pool, make_listing_req(p.id, "Sandwiches", "2024-01-10")).unwrap();
    assert_eq!(listing_list(&pool, None).unwrap().len(), 1);

    assert!(provider_delete(&pool, p.id).unwrap());
    assert!(listing_list(&pool, None).unwrap().is_empty());
    assert_eq!(provider_get(&pool, p.id).unwrap(), None);
}

#[test]
fn delete_provider_cascades_through_listings_to_claims() {
    let pool = init_test_db();
    let doomed = provider_create(&pool, make_create_req("Doomed", "Springfield")).unwrap();
    let kept = provider_create(&pool, make_create_req("Kept", "Springfield")).unwrap();
    let receiver = receiver_create(
        &pool,
        ReceiverCreateReq {
            name: "Food Bank".to_string(),
            receiver_type: "NGO".to_string(),
            city: "Springfield".to_string(),
            contact: "555-0199".to_string(),
        },
    )
    .unwrap();

    let gone = listing_create(&pool, make_listing_req(doomed.id, "Soup", "2024-02-01")).unwrap();
    let stays = listing_create(&pool, make_listing_req(kept.id, "Bread", "2024-02-02")).unwrap();
    for food_id in [gone.id, gone.id, stays.id] {
        claim_create(
            &pool,
            ClaimCreateReq {
                food_id,
                receiver_id: receiver.id,
                status: None,
                timestamp: None,
            },
        )
        .unwrap();
    }

    provider_delete(&pool, doomed.id).unwrap();

    let listings = listing_list(&pool, None).unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, stays.id);
    let claims = claim_list(&pool).unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].food_id, stays.id);
}

#[test]
fn delete_missing_provider_is_noop() {
    let pool = init_test_db();
    provider_create(&pool, make_create_req("Survivor", "Springfield")).unwrap();
    assert!(!provider_delete(&pool, 999).unwrap());
    assert_eq!(provider_list(&pool).unwrap().len(), 1);
}
