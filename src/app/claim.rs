//! Claim use cases.

use crate::domain::{parse_timestamp, ClaimStatus};
use crate::error::{is_foreign_key_violation, AppError};
use crate::infra::get_connection;
use crate::infra::DbPool;
use chrono::{NaiveDateTime, SubsecRound, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCreateReq {
    pub food_id: i64,
    pub receiver_id: i64,
    /// Defaults to `Pending`.
    pub status: Option<ClaimStatus>,
    /// Defaults to the current UTC time.
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimDto {
    pub id: i64,
    pub food_id: i64,
    pub receiver_id: i64,
    pub status: ClaimStatus,
    pub timestamp: NaiveDateTime,
}

fn map_claim(row: &Row<'_>) -> rusqlite::Result<ClaimDto> {
    Ok(ClaimDto {
        id: row.get(0)?,
        food_id: row.get(1)?,
        receiver_id: row.get(2)?,
        status: row.get(3)?,
        timestamp: row.get(4)?,
    })
}

pub fn claim_create(pool: &DbPool, req: ClaimCreateReq) -> Result<ClaimDto, AppError> {
    let timestamp = match req.timestamp.as_deref() {
        Some(raw) => parse_timestamp(raw)
            .ok_or_else(|| AppError::Validation(format!("timestamp is not a date/time: {:?}", raw)))?,
        None => Utc::now().naive_utc().trunc_subsecs(0),
    };
    let status = req.status.unwrap_or_default();

    let conn = get_connection(pool);
    conn.execute(
        "INSERT INTO Claims (Food_ID, Receiver_ID, Status, Timestamp) VALUES (?1, ?2, ?3, ?4)",
        params![req.food_id, req.receiver_id, status, timestamp],
    )
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::Referential(format!(
                "listing {} or receiver {}",
                req.food_id, req.receiver_id
            ))
        } else {
            AppError::from(e)
        }
    })?;

    Ok(ClaimDto {
        id: conn.last_insert_rowid(),
        food_id: req.food_id,
        receiver_id: req.receiver_id,
        status,
        timestamp,
    })
}

pub fn claim_list(pool: &DbPool) -> Result<Vec<ClaimDto>, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn.prepare(
        "SELECT Claim_ID, Food_ID, Receiver_ID, Status, Timestamp FROM Claims ORDER BY Claim_ID",
    )?;
    let rows = stmt.query_map([], map_claim)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn claim_delete(pool: &DbPool, id: i64) -> Result<bool, AppError> {
    let conn = get_connection(pool);
    let removed = conn.execute("DELETE FROM Claims WHERE Claim_ID = ?1", [id])?;
    Ok(removed > 0)
}
