//! One-time CSV ingestion into empty tables.
//!
//! Each table is described statically: which columns the file may carry and
//! how each cell is checked before it reaches SQLite. Rows that fail a check,
//! or that SQLite rejects (dangling foreign key, duplicate id), are skipped and
//! counted; the rest of the file still loads.

use super::schema::TableLoad;
use crate::domain::{
    format_date, format_timestamp, is_valid_quantity, parse_date, parse_timestamp, ClaimStatus,
    FoodType, MealType, ProviderType, MAX_QUANTITY,
};
use crate::error::{is_foreign_key_violation, AppError};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Integer key; blank lets SQLite assign one.
    Id,
    /// Integer reference to a parent row.
    Reference,
    Text,
    Quantity,
    Date,
    Timestamp,
    ProviderType,
    FoodType,
    MealType,
    ClaimStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
}

impl Column {
    pub const fn required(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

#[derive(Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl TableSpec {
    pub fn id_column(&self) -> &'static str {
        self.columns
            .iter()
            .find(|c| c.kind == ColumnKind::Id)
            .map_or("rowid", |c| c.name)
    }

    /// `Food_Listings` → `food_listings_data.csv`.
    pub fn file_name(&self) -> String {
        format!("{}_data.csv", self.name.to_lowercase())
    }
}

pub static PROVIDERS: TableSpec = TableSpec {
    name: "Providers",
    columns: &[
        Column::optional("Provider_ID", ColumnKind::Id),
        Column::required("Name", ColumnKind::Text),
        Column::required("Type", ColumnKind::ProviderType),
        Column::required("Address", ColumnKind::Text),
        Column::required("City", ColumnKind::Text),
        Column::required("Contact", ColumnKind::Text),
    ],
};

pub static RECEIVERS: TableSpec = TableSpec {
    name: "Receivers",
    columns: &[
        Column::optional("Receiver_ID", ColumnKind::Id),
        Column::required("Name", ColumnKind::Text),
        Column::required("Type", ColumnKind::Text),
        Column::required("City", ColumnKind::Text),
        Column::required("Contact", ColumnKind::Text),
    ],
};

pub static FOOD_LISTINGS: TableSpec = TableSpec {
    name: "Food_Listings",
    columns: &[
        Column::optional("Food_ID", ColumnKind::Id),
        Column::required("Food_Name", ColumnKind::Text),
        Column::required("Quantity", ColumnKind::Quantity),
        Column::required("Expiry_Date", ColumnKind::Date),
        Column::required("Provider_ID", ColumnKind::Reference),
        Column::required("Provider_Type", ColumnKind::ProviderType),
        Column::required("Location", ColumnKind::Text),
        Column::required("Food_Type", ColumnKind::FoodType),
        Column::required("Meal_Type", ColumnKind::MealType),
    ],
};

pub static CLAIMS: TableSpec = TableSpec {
    name: "Claims",
    columns: &[
        Column::optional("Claim_ID", ColumnKind::Id),
        Column::required("Food_ID", ColumnKind::Reference),
        Column::required("Receiver_ID", ColumnKind::Reference),
        Column::required("Status", ColumnKind::ClaimStatus),
        Column::required("Timestamp", ColumnKind::Timestamp),
    ],
};

/// Load order: every table comes after the tables it references.
pub static TABLES: &[&TableSpec] = &[&PROVIDERS, &RECEIVERS, &FOOD_LISTINGS, &CLAIMS];

/// Header matching ignores case and surrounding/inner whitespace runs.
fn normalize_header(h: &str) -> String {
    h.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

fn parse_integer(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        // spreadsheet exports sometimes write whole numbers as `20.0`
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f))
            .map(|f| f as i64)
    })
}

fn label<T>(parsed: Option<T>, as_str: fn(&T) -> &'static str, what: &str, raw: &str) -> Result<Value, String> {
    parsed
        .map(|v| Value::Text(as_str(&v).to_string()))
        .ok_or_else(|| format!("unknown {} {:?}", what, raw))
}

/// Check and normalize one cell. `Ok(None)` means "leave the column out".
pub(crate) fn convert(column: &Column, raw: &str) -> Result<Option<Value>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return if column.required {
            Err(format!("{} is required", column.name))
        } else {
            Ok(None)
        };
    }
    let value = match column.kind {
        ColumnKind::Id | ColumnKind::Reference => parse_integer(raw)
            .map(Value::Integer)
            .ok_or_else(|| format!("{} is not an integer: {:?}", column.name, raw))?,
        ColumnKind::Quantity => match parse_integer(raw) {
            Some(q) if is_valid_quantity(q) => Value::Integer(q),
            _ => {
                return Err(format!(
                    "{} must be an integer between 1 and {}: {:?}",
                    column.name, MAX_QUANTITY, raw
                ))
            }
        },
        ColumnKind::Text => Value::Text(raw.to_string()),
        ColumnKind::Date => parse_date(raw)
            .map(|d| Value::Text(format_date(d)))
            .ok_or_else(|| format!("{} is not a date: {:?}", column.name, raw))?,
        ColumnKind::Timestamp => parse_timestamp(raw)
            .map(|ts| Value::Text(format_timestamp(ts)))
            .ok_or_else(|| format!("{} is not a timestamp: {:?}", column.name, raw))?,
        ColumnKind::ProviderType => label(ProviderType::parse(raw), ProviderType::as_str, "provider type", raw)?,
        ColumnKind::FoodType => label(FoodType::parse(raw), FoodType::as_str, "food type", raw)?,
        ColumnKind::MealType => label(MealType::parse(raw), MealType::as_str, "meal type", raw)?,
        ColumnKind::ClaimStatus => label(ClaimStatus::parse(raw), ClaimStatus::as_str, "claim status", raw)?,
    };
    Ok(Some(value))
}

/// Load one CSV file into its (empty) table inside a single transaction.
pub fn load_table(conn: &mut Connection, spec: &TableSpec, path: &Path) -> Result<TableLoad, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AppError::Validation(format!("read {:?}: {}", path, e)))?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("read header of {:?}: {}", path, e)))?
        .clone();
    let positions: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (normalize_header(h), i))
        .collect();

    // (column, position in file); columns absent from the file are skipped
    let mut mapped: Vec<(&Column, usize)> = Vec::new();
    for column in spec.columns {
        match positions.get(&normalize_header(column.name)) {
            Some(&pos) => mapped.push((column, pos)),
            None if column.required => {
                return Err(AppError::Validation(format!(
                    "{:?} has no {} column",
                    path, column.name
                )));
            }
            None => {}
        }
    }

    let tx = conn.transaction()?;
    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for (index, record) in reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::warn!("{} line {}: {}", spec.name, line, e);
                skipped += 1;
                continue;
            }
        };

        let mut names = Vec::with_capacity(mapped.len());
        let mut values = Vec::with_capacity(mapped.len());
        let mut invalid = None;
        for (column, pos) in &mapped {
            match convert(column, record.get(*pos).unwrap_or("")) {
                Ok(Some(v)) => {
                    names.push(column.name);
                    values.push(v);
                }
                Ok(None) => {}
                Err(msg) => {
                    invalid = Some(msg);
                    break;
                }
            }
        }
        if let Some(msg) = invalid {
            log::warn!("{} line {}: {}", spec.name, line, msg);
            skipped += 1;
            continue;
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            spec.name,
            names.join(", "),
            vec!["?"; names.len()].join(", ")
        );
        let result = tx
            .prepare_cached(&sql)
            .and_then(|mut stmt| stmt.execute(rusqlite::params_from_iter(values.iter())));
        match result {
            Ok(_) => inserted += 1,
            Err(e) if is_foreign_key_violation(&e) => {
                log::warn!("{} line {}: references a missing row", spec.name, line);
                skipped += 1;
            }
            Err(e) => {
                log::warn!("{} line {}: {}", spec.name, line, e);
                skipped += 1;
            }
        }
    }

    tx.commit()?;
    Ok(TableLoad {
        table: spec.name.to_string(),
        inserted,
        skipped,
        error: None,
    })
}
