//! Shared row-mapping helpers for the SQLite repositories.

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::Row;
use rust_decimal::Decimal;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read a decimal stored as TEXT.
pub(crate) fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

/// Read an ISO date stored as TEXT.
pub(crate) fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

/// Read a status enum stored as TEXT.
pub(crate) fn status_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err.into()))
}
