//! Receiver use cases.

use crate::error::AppError;
use crate::infra::get_connection;
use crate::infra::DbPool;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverCreateReq {
    pub name: String,
    /// Free text such as `NGO` or `Shelter`.
    pub receiver_type: String,
    pub city: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiverDto {
    pub id: i64,
    pub name: String,
    pub receiver_type: String,
    pub city: String,
    pub contact: String,
}

fn map_receiver(row: &Row<'_>) -> rusqlite::Result<ReceiverDto> {
    Ok(ReceiverDto {
        id: row.get(0)?,
        name: row.get(1)?,
        receiver_type: row.get(2)?,
        city: row.get(3)?,
        contact: row.get(4)?,
    })
}

pub fn receiver_create(pool: &DbPool, req: ReceiverCreateReq) -> Result<ReceiverDto, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let receiver_type = req.receiver_type.trim();
    if receiver_type.is_empty() {
        return Err(AppError::Validation("receiver_type is required".into()));
    }
    let city = req.city.trim().to_string();
    let contact = req.contact.trim().to_string();

    let conn = get_connection(pool);
    conn.execute(
        "INSERT INTO Receivers (Name, Type, City, Contact) VALUES (?1, ?2, ?3, ?4)",
        params![name, receiver_type, &city, &contact],
    )?;

    Ok(ReceiverDto {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        receiver_type: receiver_type.to_string(),
        city,
        contact,
    })
}

pub fn receiver_list(pool: &DbPool) -> Result<Vec<ReceiverDto>, AppError> {
    let conn = get_connection(pool);
    let mut stmt = conn.prepare(
        "SELECT Receiver_ID, Name, Type, City, Contact FROM Receivers ORDER BY Receiver_ID",
    )?;
    let rows = stmt.query_map([], map_receiver)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn receiver_get(pool: &DbPool, id: i64) -> Result<Option<ReceiverDto>, AppError> {
    let conn = get_connection(pool);
    let dto = conn
        .query_row(
            "SELECT Receiver_ID, Name, Type, City, Contact FROM Receivers WHERE Receiver_ID = ?1",
            [id],
            map_receiver,
        )
        .optional()?;
    Ok(dto)
}

/// Delete a receiver and its claims. Unknown ids are a no-op.
pub fn receiver_delete(pool: &DbPool, id: i64) -> Result<bool, AppError> {
    let conn = get_connection(pool);
    let removed = conn.execute("DELETE FROM Receivers WHERE Receiver_ID = ?1", [id])?;
    Ok(removed > 0)
}
