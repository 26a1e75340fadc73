//! Domain enumerations and input parsing shared by the repository and the bulk loader.

/// Declares a closed set of labels stored as TEXT.
///
/// Labels round-trip through SQLite and JSON exactly as written; parsing is
/// case- and whitespace-insensitive so hand-edited data files still load.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($label) {
                        return Some(Self::$variant);
                    }
                )+
                None
            }

            pub fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl rusqlite::types::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                let s = value.as_str()?;
                Self::parse(s).ok_or_else(|| {
                    rusqlite::types::FromSqlError::Other(
                        format!("unknown {} label: {}", stringify!($name), s).into(),
                    )
                })
            }
        }
    };
}

mod kinds;
mod status;
mod time;

pub use kinds::{FoodType, MealType, ProviderType};
pub use status::ClaimStatus;
pub use time::{format_date, format_timestamp, parse_date, parse_timestamp};

/// Largest quantity a single listing may carry.
///
/// Keeps `SUM(Quantity)` over any realistic number of listings inside `i64`.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Positive and at most [`MAX_QUANTITY`].
pub fn is_valid_quantity(quantity: i64) -> bool {
    (1..=MAX_QUANTITY).contains(&quantity)
}
