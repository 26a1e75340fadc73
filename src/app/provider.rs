//! Provider use cases.

use crate::domain::ProviderType;
use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCreateReq {
    pub name: String,
    pub provider_type: ProviderType,
    pub address: String,
    pub city: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderDto {
    pub id: i64,
    pub name: String,
    pub provider_type: ProviderType,
    pub address: String,
    pub city: String,
    pub contact: String,
}

const PROVIDER_COLUMNS: &str = "Provider_ID, Name, Type, Address, City, Contact";

fn map_provider(row: &Row<'_>) -> rusqlite::Result<ProviderDto> {
    Ok(ProviderDto {
        id: row.get(0)?,
        name: row.get(1)?,
        provider_type: row.get(2)?,
        address: row.get(3)?,
        city: row.get(4)?,
        contact: row.get(5)?,
    })
}

/// Insert a provider. Names are not unique; the assigned id is the only identity.
pub fn provider_create(pool: &DbPool, req: ProviderCreateReq) -> Result<ProviderDto, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let address = req.address.trim().to_string();
    let city = req.city.trim().to_string();
    let contact = req.contact.trim().to_string();

    let conn = get_connection(pool);
    conn.execute(
        "INSERT INTO Providers (Name, Type, Address, City, Contact) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, req.provider_type, &address, &city, &contact],
    )?;
    let id = conn.last_insert_rowid();
    log::info!("provider {} created", id);

    Ok(ProviderDto {
        id,
        name: name.to_string(),
        provider_type: req.provider_type,
        address,
        city,
        contact,
    })
}

pub fn provider_list(pool: &DbPool) -> Result<Vec<ProviderDto>, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM Providers ORDER BY Provider_ID",
        PROVIDER_COLUMNS
    ))?;
    let rows = stmt.query_map([], map_provider)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Lookup by id; a missing provider is `None`, not an error.
pub fn provider_get(pool: &DbPool, id: i64) -> Result<Option<ProviderDto>, AppError> {
    let conn = get_connection(pool);
    let dto = conn
        .query_row(
            &format!("SELECT {} FROM Providers WHERE Provider_ID = ?1", PROVIDER_COLUMNS),
            [id],
            map_provider,
        )
        .optional()?;
    Ok(dto)
}

/// Delete a provider together with its listings and their claims.
///
/// Returns whether a row was removed; an unknown id is a no-op.
pub fn provider_delete(pool: &DbPool, id: i64) -> Result<bool, AppError> {
    let conn = get_connection(pool);
    let removed = conn.execute("DELETE FROM Providers WHERE Provider_ID = ?1", [id])?;
    if removed > 0 {
        log::info!("provider {} deleted with its listings", id);
    }
    Ok(removed > 0)
}

/// Distinct provider cities, sorted.
pub fn provider_cities(pool: &DbPool) -> Result<Vec<String>, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn.prepare("SELECT DISTINCT City FROM Providers ORDER BY City")?;
    let rows = stmt.query_map([], |r| r.get(0))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
