//! JSON request/response boundary: one named command per operation or report.
//!
//! Payloads are camelCase JSON objects; results are the serialized DTOs.

use crate::app;
use crate::error::AppError;
use crate::infra::DbPool;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdReq {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingListReq {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityReq {
    pub city: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTypeReq {
    #[serde(default)]
    pub completed_only: bool,
}

/// Result of a delete command; `deleted` is false when the id did not exist.
#[derive(Debug, Serialize)]
pub struct DeleteResp {
    pub deleted: bool,
}

pub const COMMANDS: &[&str] = &[
    "provider.create",
    "provider.list",
    "provider.get",
    "provider.delete",
    "provider.cities",
    "receiver.create",
    "receiver.list",
    "receiver.get",
    "receiver.delete",
    "listing.create",
    "listing.list",
    "listing.get",
    "listing.delete",
    "claim.create",
    "claim.list",
    "claim.delete",
    "report.cityCounts",
    "report.topProviderTypeByQuantity",
    "report.providerContactsByCity",
    "report.totalQuantityAvailable",
    "report.topListingLocation",
    "report.listingsByFoodType",
    "report.topClaimedFoods",
    "report.claimStatusDistribution",
    "report.topProvidersByCompletedClaims",
    "report.mealTypeClaims",
    "report.topProvidersByQuantity",
    "report.listingsByProviderType",
    "report.overview",
];

fn parse<T: DeserializeOwned>(payload: Value) -> Result<T, AppError> {
    serde_json::from_value(payload).map_err(|e| AppError::Validation(format!("bad payload: {}", e)))
}

/// Like `parse`, but a missing payload means "all defaults".
fn parse_or_default<T: DeserializeOwned + Default>(payload: Value) -> Result<T, AppError> {
    if payload.is_null() {
        Ok(T::default())
    } else {
        parse(payload)
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Db(format!("JSON serialization failed: {}", e)))
}

pub fn dispatch(pool: &DbPool, command: &str, payload: Value) -> Result<Value, AppError> {
    log::debug!("dispatch {}", command);
    match command {
        "provider.create" => to_json(app::provider_create(pool, parse(payload)?)?),
        "provider.list" => to_json(app::provider_list(pool)?),
        "provider.get" => to_json(app::provider_get(pool, parse::<IdReq>(payload)?.id)?),
        "provider.delete" => to_json(DeleteResp {
            deleted: app::provider_delete(pool, parse::<IdReq>(payload)?.id)?,
        }),
        "provider.cities" => to_json(app::provider_cities(pool)?),

        "receiver.create" => to_json(app::receiver_create(pool, parse(payload)?)?),
        "receiver.list" => to_json(app::receiver_list(pool)?),
        "receiver.get" => to_json(app::receiver_get(pool, parse::<IdReq>(payload)?.id)?),
        "receiver.delete" => to_json(DeleteResp {
            deleted: app::receiver_delete(pool, parse::<IdReq>(payload)?.id)?,
        }),

        "listing.create" => to_json(app::listing_create(pool, parse(payload)?)?),
        "listing.list" => {
            let req: ListingListReq = parse_or_default(payload)?;
            to_json(app::listing_list(pool, req.limit)?)
        }
        "listing.get" => to_json(app::listing_get(pool, parse::<IdReq>(payload)?.id)?),
        "listing.delete" => to_json(DeleteResp {
            deleted: app::listing_delete(pool, parse::<IdReq>(payload)?.id)?,
        }),

        "claim.create" => to_json(app::claim_create(pool, parse(payload)?)?),
        "claim.list" => to_json(app::claim_list(pool)?),
        "claim.delete" => to_json(DeleteResp {
            deleted: app::claim_delete(pool, parse::<IdReq>(payload)?.id)?,
        }),

        "report.cityCounts" => to_json(app::city_counts(pool)?),
        "report.topProviderTypeByQuantity" => to_json(app::top_provider_type_by_quantity(pool)?),
        "report.providerContactsByCity" => {
            let req: CityReq = parse(payload)?;
            to_json(app::provider_contacts_by_city(pool, &req.city)?)
        }
        "report.totalQuantityAvailable" => to_json(app::total_quantity_available(pool)?),
        "report.topListingLocation" => to_json(app::top_listing_location(pool)?),
        "report.listingsByFoodType" => to_json(app::listings_by_food_type(pool)?),
        "report.topClaimedFoods" => to_json(app::top_claimed_foods(pool)?),
        "report.claimStatusDistribution" => to_json(app::claim_status_distribution(pool)?),
        "report.topProvidersByCompletedClaims" => {
            to_json(app::top_providers_by_completed_claims(pool)?)
        }
        "report.mealTypeClaims" => {
            let req: MealTypeReq = parse_or_default(payload)?;
            to_json(app::meal_type_claims(pool, req.completed_only)?)
        }
        "report.topProvidersByQuantity" => to_json(app::top_providers_by_quantity(pool)?),
        "report.listingsByProviderType" => to_json(app::listings_by_provider_type(pool)?),
        "report.overview" => to_json(app::report_overview(pool)?),

        other => Err(AppError::Validation(format!("unknown command: {}", other))),
    }
}
