//! Rewrites rows stored by earlier writers into the canonical stored forms.
//!
//! Tables created before version tracking hold raw spreadsheet cells:
//! `3/17/2025` expiry dates, lower-case labels, `20.0` quantities. Every cell
//! is run through the same checks as the bulk loader and rewritten in place.
//! A cell that cannot be repaired aborts the migration so the store is never
//! adopted in a state the repository cannot read back.

use super::bulk_load::{convert, ColumnKind, TABLES};
use crate::error::AppError;
use rusqlite::types::Value;
use rusqlite::{params, Transaction};

/// Problems quoted in the error; the rest are only logged.
const MAX_REPORTED: usize = 5;

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s.clone()),
        Value::Blob(_) => None,
    }
}

pub(crate) fn normalize_stored_rows(tx: &Transaction<'_>) -> Result<(), AppError> {
    let mut rewritten = 0usize;
    let mut problems = Vec::new();

    for spec in TABLES {
        let id_column = spec.id_column();
        for column in spec.columns.iter().filter(|c| c.kind != ColumnKind::Id) {
            let cells: Vec<(i64, Value)> = tx
                .prepare(&format!(
                    "SELECT {id}, {col} FROM {table} ORDER BY {id}",
                    id = id_column,
                    col = column.name,
                    table = spec.name
                ))?
                .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
                .collect::<Result<_, _>>()?;

            for (id, stored) in cells {
                let checked = cell_text(&stored)
                    .ok_or_else(|| format!("{} holds binary data", column.name))
                    .and_then(|raw| convert(column, &raw));
                match checked {
                    Ok(Some(canonical)) if canonical != stored => {
                        tx.execute(
                            &format!(
                                "UPDATE {} SET {} = ?1 WHERE {} = ?2",
                                spec.name, column.name, id_column
                            ),
                            params![canonical, id],
                        )?;
                        rewritten += 1;
                    }
                    Ok(_) => {}
                    Err(msg) => {
                        log::error!("{} {} {}: {}", spec.name, id_column, id, msg);
                        problems.push(format!("{} {}: {}", spec.name, id, msg));
                    }
                }
            }
        }
    }

    if !problems.is_empty() {
        return Err(AppError::Schema(format!(
            "{} stored value(s) cannot be repaired: {}",
            problems.len(),
            problems[..problems.len().min(MAX_REPORTED)].join("; ")
        )));
    }
    if rewritten > 0 {
        log::info!("rewrote {} stored value(s) into canonical form", rewritten);
    }
    Ok(())
}
