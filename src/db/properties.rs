use crate::db::connection::Database;
use crate::db::PropertyStore;
use crate::domain::{NewProperty, PropertyRecord};
use crate::errors::ServerError;
use rusqlite::{params, Connection};
use tracing::{error, info};

/// Inserts one property and returns the id SQLite assigned to it.
pub fn insert_property(conn: &Connection, prop: &NewProperty) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        INSERT INTO properties (broker, price, acres, latitude, longitude, city)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            &prop.broker,
            &prop.price,
            &prop.acres,
            prop.position.lat(),
            prop.position.lng(),
            &prop.city,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert property failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// Every saved property, oldest first.
pub fn list_properties(conn: &Connection) -> Result<Vec<PropertyRecord>, ServerError> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT id, broker, price, acres, latitude, longitude, city
            FROM properties
            ORDER BY id
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(PropertyRecord {
                id: row.get(0)?,
                broker: row.get(1)?,
                price: row.get(2)?,
                acres: row.get(3)?,
                latitude: row.get(4)?,
                longitude: row.get(5)?,
                city: row.get(6)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

impl PropertyStore for Database {
    fn create_record(&self, prop: &NewProperty) -> Result<i64, ServerError> {
        let result = self.with_conn(|conn| insert_property(conn, prop));
        match &result {
            Ok(id) => info!("🏠 Saved property #{id}"),
            Err(e) => error!("Saving property failed: {e}"),
        }
        result
    }

    fn list_records(&self) -> Result<Vec<PropertyRecord>, ServerError> {
        self.with_conn(|conn| list_properties(conn))
            .inspect_err(|e| error!("Loading properties failed: {e}"))
    }
}
