//! JSON command boundary integration tests

use food_rescue::commands::{dispatch, COMMANDS};
use food_rescue::infra::db::init_test_db;
use serde_json::{json, Value};

// ──────────────────────── Helper ────────────────────────

fn seed(pool: &food_rescue::DbPool) {
    dispatch(
        pool,
        "provider.create",
        json!({
            "name": "Joe's Deli",
            "providerType": "Restaurant",
            "address": "1 Main St",
            "city": "Springfield",
            "contact": "555-0100"
        }),
    )
    .unwrap();
    dispatch(
        pool,
        "listing.create",
        json!({
            "foodName": "Sandwiches",
            "quantity": 20,
            "expiryDate": "2024-01-10",
            "providerId": 1,
            "providerType": "Restaurant",
            "location": "Springfield",
            "foodType": "Vegetarian",
            "mealType": "Lunch"
        }),
    )
    .unwrap();
}

// ══════════════════════════════════════════════════════════
//  repository commands
// ══════════════════════════════════════════════════════════

#[test]
fn provider_create_returns_serialized_dto() {
    let pool = init_test_db();
    let out = dispatch(
        &pool,
        "provider.create",
        json!({
            "name": "Big Mart",
            "providerType": "Grocery Store",
            "address": "9 Elm",
            "city": "Shelbyville",
            "contact": "mart@example.com"
        }),
    )
    .unwrap();
    assert_eq!(out["id"], 1);
    assert_eq!(out["provider_type"], "Grocery Store");
}

#[test]
fn listing_list_serializes_dates() {
    let pool = init_test_db();
    seed(&pool);
    let out = dispatch(&pool, "listing.list", Value::Null).unwrap();
    let rows = out.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["expiry_date"], "2024-01-10");
    assert_eq!(rows[0]["food_type"], "Vegetarian");
}

#[test]
fn listing_create_unknown_provider_maps_to_referential_code() {
    let pool = init_test_db();
    let err = dispatch(
        &pool,
        "listing.create",
        json!({
            "foodName": "Ghost",
            "quantity": 1,
            "expiryDate": "2024-01-10",
            "providerId": 999,
            "providerType": "Restaurant",
            "location": "Nowhere",
            "foodType": "Vegan",
            "mealType": "Dinner"
        }),
    )
    .unwrap_err();
    assert_eq!(err.code(), "REFERENTIAL_ERROR");
    let dto = serde_json::to_value(&err).unwrap();
    assert_eq!(dto["code"], "REFERENTIAL_ERROR");
}

#[test]
fn delete_reports_whether_row_existed() {
    let pool = init_test_db();
    seed(&pool);
    let out = dispatch(&pool, "provider.delete", json!({ "id": 1 })).unwrap();
    assert_eq!(out, json!({ "deleted": true }));
    let out = dispatch(&pool, "provider.delete", json!({ "id": 1 })).unwrap();
    assert_eq!(out, json!({ "deleted": false }));
    let out = dispatch(&pool, "listing.list", json!({})).unwrap();
    assert_eq!(out, json!([]));
}

#[test]
fn get_missing_returns_null() {
    let pool = init_test_db();
    let out = dispatch(&pool, "provider.get", json!({ "id": 5 })).unwrap();
    assert!(out.is_null());
}

// ══════════════════════════════════════════════════════════
//  report commands
// ══════════════════════════════════════════════════════════

#[test]
fn report_commands_on_seeded_store() {
    let pool = init_test_db();
    seed(&pool);
    let total = dispatch(&pool, "report.totalQuantityAvailable", Value::Null).unwrap();
    assert_eq!(total, json!(20));
    let contacts = dispatch(
        &pool,
        "report.providerContactsByCity",
        json!({ "city": "Springfield" }),
    )
    .unwrap();
    assert_eq!(contacts[0]["name"], "Joe's Deli");
    let meals = dispatch(&pool, "report.mealTypeClaims", json!({ "completedOnly": true })).unwrap();
    assert_eq!(meals, json!([]));
}

#[test]
fn every_listed_command_except_creates_runs_on_empty_store() {
    let pool = init_test_db();
    for command in COMMANDS {
        let payload = match *command {
            c if c.ends_with(".create") => continue,
            c if c.ends_with(".get") || c.ends_with(".delete") => json!({ "id": 1 }),
            "report.providerContactsByCity" => json!({ "city": "Springfield" }),
            _ => Value::Null,
        };
        dispatch(&pool, command, payload)
            .unwrap_or_else(|e| panic!("{} failed: {}", command, e));
    }
}

// ══════════════════════════════════════════════════════════
//  malformed requests
// ══════════════════════════════════════════════════════════

#[test]
fn unknown_command_is_validation_error() {
    let pool = init_test_db();
    let err = dispatch(&pool, "provider.update", json!({})).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}

#[test]
fn bad_payload_is_validation_error() {
    let pool = init_test_db();
    let err = dispatch(&pool, "provider.create", json!({ "name": "x" })).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    let err = dispatch(
        &pool,
        "provider.create",
        json!({
            "name": "x",
            "providerType": "Catering",
            "address": "a",
            "city": "b",
            "contact": "c"
        }),
    )
    .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
}
