use std::{error::Error, str::FromStr};

use duckdb::{params, types::Type, Connection, Row};
use itertools::Itertools;
use jiff::Timestamp;
use log::info;

use crate::visitor::VisitorRow;

/// The visitors table in a DuckDB file.  Instants are stored as UTC
/// `TIMESTAMP` values.
#[derive(Clone, Debug)]
pub struct VisitorsTable {
    pub duckdb_path: String,
    pub table: String,
}

impl VisitorsTable {
    pub fn create_table(&self, conn: &Connection) -> Result<(), duckdb::Error> {
        let sql = format!(
            r#"
CREATE TABLE IF NOT EXISTS {} (
    id VARCHAR PRIMARY KEY,
    first_name VARCHAR,
    last_name VARCHAR,
    company VARCHAR,
    visiting VARCHAR,
    phone VARCHAR,
    email VARCHAR,
    visit_date DATE,
    signed_in_at TIMESTAMP,
    signed_out_at TIMESTAMP
);
            "#,
            self.table
        );
        conn.execute_batch(&sql)
    }

    /// Insert the rows, replacing every column of an existing row with the
    /// same `id`.  Returns the number of rows affected.
    pub fn upsert(&self, conn: &Connection, rows: &[VisitorRow]) -> Result<usize, duckdb::Error> {
        info!("upserting {} rows into {} ...", rows.len(), self.table);
        self.create_table(conn)?;

        let updates = VisitorRow::COLUMNS
            .iter()
            .skip(1)
            .map(|c| format!("{c} = EXCLUDED.{c}"))
            .join(", ");
        let sql = format!(
            r#"
INSERT INTO {} ({})
VALUES (?, ?, ?, ?, ?, ?, ?, CAST(? AS DATE), CAST(? AS TIMESTAMP), CAST(? AS TIMESTAMP))
ON CONFLICT (id) DO UPDATE SET {};
            "#,
            self.table,
            VisitorRow::COLUMNS.join(", "),
            updates
        );

        let mut stmt = conn.prepare(&sql)?;
        let mut n = 0;
        for row in rows {
            n += stmt.execute(params![
                row.id,
                row.first_name,
                row.last_name,
                row.company,
                row.visiting,
                row.phone,
                row.email,
                row.visit_date.map(|e| e.to_string()),
                row.signed_in_at.map(utc_timestamp),
                row.signed_out_at.map(utc_timestamp),
            ])?;
        }
        info!("done");
        Ok(n)
    }

    pub fn get_data(&self, conn: &Connection) -> Result<Vec<VisitorRow>, duckdb::Error> {
        let query = format!(
            r#"
SELECT id, first_name, last_name, company, visiting, phone, email,
    CAST(visit_date AS VARCHAR),
    strftime(signed_in_at, '%Y-%m-%dT%H:%M:%SZ'),
    strftime(signed_out_at, '%Y-%m-%dT%H:%M:%SZ')
FROM {}
ORDER BY id;
            "#,
            self.table
        );
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map([], |row| {
            Ok(VisitorRow {
                id: row.get::<usize, String>(0)?,
                first_name: row.get::<usize, Option<String>>(1)?,
                last_name: row.get::<usize, Option<String>>(2)?,
                company: row.get::<usize, Option<String>>(3)?,
                visiting: row.get::<usize, Option<String>>(4)?,
                phone: row.get::<usize, Option<String>>(5)?,
                email: row.get::<usize, Option<String>>(6)?,
                visit_date: parse_column(row, 7)?,
                signed_in_at: parse_column(row, 8)?,
                signed_out_at: parse_column(row, 9)?,
            })
        })?;
        let data: Result<Vec<VisitorRow>, duckdb::Error> = rows.collect();
        data
    }
}

fn utc_timestamp(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%d %H:%M:%S").to_string()
}

fn parse_column<T>(row: &Row, idx: usize) -> Result<Option<T>, duckdb::Error>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    match row.get::<usize, Option<String>>(idx)? {
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|e| duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}
