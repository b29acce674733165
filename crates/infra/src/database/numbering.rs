//! Document number assignment against live tables.
//!
//! Numbers are derived from the highest existing number of the series in the
//! current year. The scan runs inside the caller's write transaction; the
//! UNIQUE index on each `number` column catches the remaining race, and the
//! caller retries with a fresh scan.

use chrono::{DateTime, Datelike, Utc};
use oficina_domain::{DocumentSeries, Result};
use rusqlite::Connection;

use crate::errors::map_sql_error;

const fn table_for(series: DocumentSeries) -> &'static str {
    match series {
        DocumentSeries::Quote => "quotes",
        DocumentSeries::ServiceOrder => "service_orders",
        DocumentSeries::Contract => "contracts",
        DocumentSeries::Invoice => "invoices",
    }
}

/// Next number to assign for `series`, dated `at`.
pub(crate) fn next_number(
    conn: &Connection,
    series: DocumentSeries,
    at: DateTime<Utc>,
) -> Result<String> {
    let year = at.year();
    let sql = format!("SELECT MAX(number) FROM {} WHERE number LIKE ?1", table_for(series));
    let last: Option<String> = conn
        .query_row(&sql, [series.like_pattern(year)], |row| row.get(0))
        .map_err(map_sql_error)?;
    let seq = series.next_sequence(last.as_deref())?;
    Ok(series.format(year, seq))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn conn_with_quotes(numbers: &[&str]) -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE quotes (number TEXT NOT NULL UNIQUE)").unwrap();
        for number in numbers {
            conn.execute("INSERT INTO quotes (number) VALUES (?1)", [number]).unwrap();
        }
        conn
    }

    #[test]
    fn first_number_of_a_year_is_0001() {
        let conn = conn_with_quotes(&["ORC20250007"]);
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 9, 0, 0).unwrap();

        let number = next_number(&conn, DocumentSeries::Quote, at).unwrap();
        assert_eq!(number, "ORC20260001");
    }

    #[test]
    fn numbers_continue_from_the_highest_in_year() {
        let conn = conn_with_quotes(&["ORC20260001", "ORC20260002", "ORC20260009"]);
        let at = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();

        let number = next_number(&conn, DocumentSeries::Quote, at).unwrap();
        assert_eq!(number, "ORC20260010");
    }
}
