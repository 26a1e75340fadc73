//! Read-only aggregate reports over providers, receivers, listings and claims.
//!
//! Every report is a single query run under the pool's report timeout.
//! Ranked reports order by the aggregate descending; ties go to the group
//! whose earliest contributing row (lowest id) was inserted first, so results
//! do not depend on SQLite's scan order.

use crate::domain::{ClaimStatus, FoodType, MealType, ProviderType};
use crate::error::AppError;
use crate::infra::{get_connection, run_bounded, DbPool};
use rusqlite::{Params, Row};
use serde::Serialize;

pub const TOP_CLAIMED_FOODS_LIMIT: u32 = 10;
pub const TOP_PROVIDERS_BY_CLAIMS_LIMIT: u32 = 5;
pub const TOP_PROVIDERS_BY_QUANTITY_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCountRow {
    pub city: String,
    pub providers: i64,
    pub receivers: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderTypeQuantityRow {
    pub provider_type: ProviderType,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderContactRow {
    pub name: String,
    pub contact: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCountRow {
    pub location: String,
    pub listings: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodTypeCountRow {
    pub food_type: FoodType,
    pub listings: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodClaimCountRow {
    pub food_name: String,
    pub claims: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCountRow {
    pub status: ClaimStatus,
    pub claims: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderClaimCountRow {
    pub provider_name: String,
    pub completed_claims: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealTypeCountRow {
    pub meal_type: MealType,
    pub claims: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderQuantityRow {
    pub provider_name: String,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderTypeListingRow {
    pub provider_type: ProviderType,
    pub listings: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderTypeBreakdown {
    pub rows: Vec<ProviderTypeListingRow>,
    pub top: Option<ProviderTypeListingRow>,
}

/// Every parameterless report, each run as its own query.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOverview {
    pub city_counts: Vec<CityCountRow>,
    pub top_provider_type_by_quantity: Option<ProviderTypeQuantityRow>,
    pub total_quantity_available: i64,
    pub top_listing_location: Option<LocationCountRow>,
    pub listings_by_food_type: Vec<FoodTypeCountRow>,
    pub top_claimed_foods: Vec<FoodClaimCountRow>,
    pub claim_status_distribution: Vec<StatusCountRow>,
    pub top_providers_by_completed_claims: Vec<ProviderClaimCountRow>,
    pub meal_type_claims_all: Vec<MealTypeCountRow>,
    pub meal_type_claims_completed: Vec<MealTypeCountRow>,
    pub top_providers_by_quantity: Vec<ProviderQuantityRow>,
    pub listings_by_provider_type: ProviderTypeBreakdown,
}

fn query_rows<T, P, F>(pool: &DbPool, sql: &str, params: P, map: F) -> Result<Vec<T>, AppError>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let conn = get_connection(pool);
    run_bounded(&conn, pool.report_timeout(), |c| {
        let mut stmt = c.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        rows.collect()
    })
}

fn query_first<T, P, F>(pool: &DbPool, sql: &str, params: P, map: F) -> Result<Option<T>, AppError>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    Ok(query_rows(pool, sql, params, map)?.into_iter().next())
}

/// Providers and receivers per city; a city known to only one side counts 0 on the other.
pub fn city_counts(pool: &DbPool) -> Result<Vec<CityCountRow>, AppError> {
    query_rows(
        pool,
        "WITH p AS (SELECT City, COUNT(Provider_ID) AS n FROM Providers GROUP BY City),
              r AS (SELECT City, COUNT(Receiver_ID) AS n FROM Receivers GROUP BY City),
              cities AS (SELECT City FROM p UNION SELECT City FROM r)
         SELECT cities.City, COALESCE(p.n, 0), COALESCE(r.n, 0)
         FROM cities
         LEFT JOIN p ON p.City = cities.City
         LEFT JOIN r ON r.City = cities.City
         ORDER BY cities.City",
        [],
        |r| {
            Ok(CityCountRow {
                city: r.get(0)?,
                providers: r.get(1)?,
                receivers: r.get(2)?,
            })
        },
    )
}

/// Provider type (from the live provider row) with the largest listed quantity.
pub fn top_provider_type_by_quantity(
    pool: &DbPool,
) -> Result<Option<ProviderTypeQuantityRow>, AppError> {
    query_first(
        pool,
        "SELECT p.Type, SUM(fl.Quantity) AS total
         FROM Providers p
         JOIN Food_Listings fl ON p.Provider_ID = fl.Provider_ID
         GROUP BY p.Type
         ORDER BY total DESC, MIN(fl.Food_ID) ASC
         LIMIT 1",
        [],
        |r| {
            Ok(ProviderTypeQuantityRow {
                provider_type: r.get(0)?,
                total_quantity: r.get(1)?,
            })
        },
    )
}

/// Contact details of providers in exactly `city`.
pub fn provider_contacts_by_city(
    pool: &DbPool,
    city: &str,
) -> Result<Vec<ProviderContactRow>, AppError> {
    query_rows(
        pool,
        "SELECT Name, Contact, Address FROM Providers WHERE City = ?1 ORDER BY Provider_ID",
        [city],
        |r| {
            Ok(ProviderContactRow {
                name: r.get(0)?,
                contact: r.get(1)?,
                address: r.get(2)?,
            })
        },
    )
}

/// Sum of quantity over every listing; 0 when there are none.
pub fn total_quantity_available(pool: &DbPool) -> Result<i64, AppError> {
    let total = query_first(
        pool,
        "SELECT COALESCE(SUM(Quantity), 0) FROM Food_Listings",
        [],
        |r| r.get(0),
    )?;
    Ok(total.unwrap_or(0))
}

/// Listing location with the most listings.
pub fn top_listing_location(pool: &DbPool) -> Result<Option<LocationCountRow>, AppError> {
    query_first(
        pool,
        "SELECT Location, COUNT(Food_ID) AS n
         FROM Food_Listings
         GROUP BY Location
         ORDER BY n DESC, MIN(Food_ID) ASC
         LIMIT 1",
        [],
        |r| {
            Ok(LocationCountRow {
                location: r.get(0)?,
                listings: r.get(1)?,
            })
        },
    )
}

/// Listings per dietary category.
pub fn listings_by_food_type(pool: &DbPool) -> Result<Vec<FoodTypeCountRow>, AppError> {
    query_rows(
        pool,
        "SELECT Food_Type, COUNT(Food_ID) AS n
         FROM Food_Listings
         GROUP BY Food_Type
         ORDER BY n DESC, MIN(Food_ID) ASC",
        [],
        |r| {
            Ok(FoodTypeCountRow {
                food_type: r.get(0)?,
                listings: r.get(1)?,
            })
        },
    )
}

/// Food names with the most claims, top 10.
pub fn top_claimed_foods(pool: &DbPool) -> Result<Vec<FoodClaimCountRow>, AppError> {
    query_rows(
        pool,
        "SELECT fl.Food_Name, COUNT(c.Claim_ID) AS n
         FROM Claims c
         JOIN Food_Listings fl ON c.Food_ID = fl.Food_ID
         GROUP BY fl.Food_Name
         ORDER BY n DESC, MIN(c.Claim_ID) ASC
         LIMIT ?1",
        [TOP_CLAIMED_FOODS_LIMIT],
        |r| {
            Ok(FoodClaimCountRow {
                food_name: r.get(0)?,
                claims: r.get(1)?,
            })
        },
    )
}

/// Claims per status. Counts sum to the number of claims.
pub fn claim_status_distribution(pool: &DbPool) -> Result<Vec<StatusCountRow>, AppError> {
    query_rows(
        pool,
        "SELECT Status, COUNT(Claim_ID) AS n
         FROM Claims
         GROUP BY Status
         ORDER BY n DESC, MIN(Claim_ID) ASC",
        [],
        |r| {
            Ok(StatusCountRow {
                status: r.get(0)?,
                claims: r.get(1)?,
            })
        },
    )
}

/// Providers (grouped by name) with the most completed claims, top 5.
pub fn top_providers_by_completed_claims(
    pool: &DbPool,
) -> Result<Vec<ProviderClaimCountRow>, AppError> {
    query_rows(
        pool,
        "SELECT p.Name, COUNT(c.Claim_ID) AS n
         FROM Claims c
         JOIN Food_Listings fl ON c.Food_ID = fl.Food_ID
         JOIN Providers p ON fl.Provider_ID = p.Provider_ID
         WHERE c.Status = ?1
         GROUP BY p.Name
         ORDER BY n DESC, MIN(c.Claim_ID) ASC
         LIMIT ?2",
        rusqlite::params![ClaimStatus::Completed, TOP_PROVIDERS_BY_CLAIMS_LIMIT],
        |r| {
            Ok(ProviderClaimCountRow {
                provider_name: r.get(0)?,
                completed_claims: r.get(1)?,
            })
        },
    )
}

/// Claims per meal type, over all claims or only completed ones.
pub fn meal_type_claims(
    pool: &DbPool,
    completed_only: bool,
) -> Result<Vec<MealTypeCountRow>, AppError> {
    let status = completed_only.then_some(ClaimStatus::Completed);
    query_rows(
        pool,
        "SELECT fl.Meal_Type, COUNT(c.Claim_ID) AS n
         FROM Claims c
         JOIN Food_Listings fl ON c.Food_ID = fl.Food_ID
         WHERE ?1 IS NULL OR c.Status = ?1
         GROUP BY fl.Meal_Type
         ORDER BY n DESC, MIN(c.Claim_ID) ASC",
        [status],
        |r| {
            Ok(MealTypeCountRow {
                meal_type: r.get(0)?,
                claims: r.get(1)?,
            })
        },
    )
}

/// Total listed quantity per provider name, top 10.
pub fn top_providers_by_quantity(pool: &DbPool) -> Result<Vec<ProviderQuantityRow>, AppError> {
    query_rows(
        pool,
        "SELECT p.Name, SUM(fl.Quantity) AS total
         FROM Providers p
         JOIN Food_Listings fl ON p.Provider_ID = fl.Provider_ID
         GROUP BY p.Name
         ORDER BY total DESC, MIN(fl.Food_ID) ASC
         LIMIT ?1",
        [TOP_PROVIDERS_BY_QUANTITY_LIMIT],
        |r| {
            Ok(ProviderQuantityRow {
                provider_name: r.get(0)?,
                total_quantity: r.get(1)?,
            })
        },
    )
}

/// Listings per snapshot provider type, with the leading type.
pub fn listings_by_provider_type(pool: &DbPool) -> Result<ProviderTypeBreakdown, AppError> {
    let rows = query_rows(
        pool,
        "SELECT Provider_Type, COUNT(Food_ID) AS n
         FROM Food_Listings
         GROUP BY Provider_Type
         ORDER BY n DESC, MIN(Food_ID) ASC",
        [],
        |r| {
            Ok(ProviderTypeListingRow {
                provider_type: r.get(0)?,
                listings: r.get(1)?,
            })
        },
    )?;
    let top = rows.first().cloned();
    Ok(ProviderTypeBreakdown { rows, top })
}

pub fn report_overview(pool: &DbPool) -> Result<ReportOverview, AppError> {
    Ok(ReportOverview {
        city_counts: city_counts(pool)?,
        top_provider_type_by_quantity: top_provider_type_by_quantity(pool)?,
        total_quantity_available: total_quantity_available(pool)?,
        top_listing_location: top_listing_location(pool)?,
        listings_by_food_type: listings_by_food_type(pool)?,
        top_claimed_foods: top_claimed_foods(pool)?,
        claim_status_distribution: claim_status_distribution(pool)?,
        top_providers_by_completed_claims: top_providers_by_completed_claims(pool)?,
        meal_type_claims_all: meal_type_claims(pool, false)?,
        meal_type_claims_completed: meal_type_claims(pool, true)?,
        top_providers_by_quantity: top_providers_by_quantity(pool)?,
        listings_by_provider_type: listings_by_provider_type(pool)?,
    })
}
