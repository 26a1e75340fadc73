//! Food listing use cases.
//!
//! `provider_type` and `location` are a snapshot of the owning provider taken
//! when the listing is created. They are never refreshed, so they can drift
//! from the provider row and must not be joined on as if they were live.

use crate::domain::{is_valid_quantity, parse_date, FoodType, MealType, ProviderType, MAX_QUANTITY};
use crate::error::{is_foreign_key_violation, AppError};
use crate::infra::get_connection;
use crate::infra::DbPool;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodListingCreateReq {
    pub food_name: String,
    pub quantity: i64,
    pub expiry_date: String,
    pub provider_id: i64,
    /// Snapshot override; copied from the provider when absent.
    pub provider_type: Option<ProviderType>,
    /// Snapshot override; copied from the provider's city when absent.
    pub location: Option<String>,
    pub food_type: FoodType,
    pub meal_type: MealType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodListingDto {
    pub id: i64,
    pub food_name: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
    pub provider_id: i64,
    pub provider_type: ProviderType,
    pub location: String,
    pub food_type: FoodType,
    pub meal_type: MealType,
}

const LISTING_COLUMNS: &str = "Food_ID, Food_Name, Quantity, Expiry_Date, Provider_ID, Provider_Type, Location, Food_Type, Meal_Type";

fn map_listing(row: &Row<'_>) -> rusqlite::Result<FoodListingDto> {
    Ok(FoodListingDto {
        id: row.get(0)?,
        food_name: row.get(1)?,
        quantity: row.get(2)?,
        expiry_date: row.get(3)?,
        provider_id: row.get(4)?,
        provider_type: row.get(5)?,
        location: row.get(6)?,
        food_type: row.get(7)?,
        meal_type: row.get(8)?,
    })
}

/// Create a listing for an existing provider.
///
/// Rejects a quantity outside `1..=MAX_QUANTITY`, a blank name or an unparseable expiry
/// before touching storage; a missing provider is a referential error and
/// nothing is written.
pub fn listing_create(pool: &DbPool, req: FoodListingCreateReq) -> Result<FoodListingDto, AppError> {
    let food_name = req.food_name.trim();
    if food_name.is_empty() {
        return Err(AppError::Validation("food_name is required".into()));
    }
    if !is_valid_quantity(req.quantity) {
        return Err(AppError::Validation(format!(
            "quantity must be between 1 and {}, got {}",
            MAX_QUANTITY, req.quantity
        )));
    }
    let expiry_date = parse_date(&req.expiry_date).ok_or_else(|| {
        AppError::Validation(format!("expiry_date is not a date: {:?}", req.expiry_date))
    })?;
    let location = match req.location.as_deref().map(str::trim) {
        Some("") => return Err(AppError::Validation("location must not be blank".into())),
        other => other.map(str::to_string),
    };

    let conn = get_connection(pool);

    let (provider_type, location) = match (req.provider_type, location) {
        (Some(t), Some(l)) => (t, l),
        (t, l) => {
            let (current_type, current_city): (ProviderType, String) = conn
                .query_row(
                    "SELECT Type, City FROM Providers WHERE Provider_ID = ?1",
                    [req.provider_id],
                    |r| Ok((r.get(0)?, r.get(1)?)),
                )
                .optional()?
                .ok_or_else(|| AppError::Referential(format!("provider {}", req.provider_id)))?;
            (t.unwrap_or(current_type), l.unwrap_or(current_city))
        }
    };

    conn.execute(
        "INSERT INTO Food_Listings (Food_Name, Quantity, Expiry_Date, Provider_ID, Provider_Type, Location, Food_Type, Meal_Type) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            food_name,
            req.quantity,
            expiry_date,
            req.provider_id,
            provider_type,
            &location,
            req.food_type,
            req.meal_type
        ],
    )
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::Referential(format!("provider {}", req.provider_id))
        } else {
            AppError::from(e)
        }
    })?;

    Ok(FoodListingDto {
        id: conn.last_insert_rowid(),
        food_name: food_name.to_string(),
        quantity: req.quantity,
        expiry_date,
        provider_id: req.provider_id,
        provider_type,
        location,
        food_type: req.food_type,
        meal_type: req.meal_type,
    })
}

/// All listings, nearest expiry first; equal dates keep insertion order.
pub fn listing_list(pool: &DbPool, limit: Option<u32>) -> Result<Vec<FoodListingDto>, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM Food_Listings ORDER BY Expiry_Date ASC, Food_ID ASC LIMIT ?1",
        LISTING_COLUMNS
    ))?;
    // SQLite treats a negative limit as unbounded
    let limit = limit.map(i64::from).unwrap_or(-1);
    let rows = stmt.query_map([limit], map_listing)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn listing_get(pool: &DbPool, id: i64) -> Result<Option<FoodListingDto>, AppError> {
    let conn = get_connection(pool);
    let dto = conn
        .query_row(
            &format!("SELECT {} FROM Food_Listings WHERE Food_ID = ?1", LISTING_COLUMNS),
            [id],
            map_listing,
        )
        .optional()?;
    Ok(dto)
}

/// Delete a listing and its claims. Unknown ids are a no-op.
pub fn listing_delete(pool: &DbPool, id: i64) -> Result<bool, AppError> {
    let conn = get_connection(pool);
    let removed = conn.execute("DELETE FROM Food_Listings WHERE Food_ID = ?1", [id])?;
    if removed > 0 {
        log::info!("listing {} deleted", id);
    }
    Ok(removed > 0)
}
