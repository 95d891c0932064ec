//! SQLite profile stores (`#Default.db`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode, OpenFlags};
use tracing::debug;

use super::IdentitySource;
use super::schema::{
    INVALID_FIELDS, ID_FIELDS, NAME_FIELDS, RELATIONAL_TABLES, is_truthy, latest_update,
    owner_identity, parse_millis, pick_field, timestamp_fields,
};
use crate::error::StoreError;
use crate::models::{Identity, StoreFormat};

/// Reads owners from a jEveAssets SQLite profile without ever writing to it
#[derive(Debug, Clone)]
pub struct RelationalSource {
    path: PathBuf,
    busy_timeout: Duration,
}

impl RelationalSource {
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self { path: path.into(), busy_timeout }
    }

    fn open(&self) -> Result<Connection, StoreError> {
        // Read-only and shared; a busy writer makes us wait at most busy_timeout
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags)
            .map_err(|e| map_sqlite_err(&self.path, e))?;
        conn.busy_timeout(self.busy_timeout).map_err(|e| map_sqlite_err(&self.path, e))?;
        Ok(conn)
    }
}

impl IdentitySource for RelationalSource {
    fn format(&self) -> StoreFormat {
        StoreFormat::Relational
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn extract(&self) -> Result<Vec<Identity>, StoreError> {
        let conn = self.open()?;
        let tables = list_tables(&conn).map_err(|e| map_sqlite_err(&self.path, e))?;
        debug!(path = %self.path.display(), ?tables, "found tables");

        for candidate in RELATIONAL_TABLES {
            let Some(table) = pick_field(&tables, &[*candidate]) else {
                continue;
            };
            let columns = table_columns(&conn, table).map_err(|e| map_sqlite_err(&self.path, e))?;
            debug!(table, ?columns, "inspecting owner table");

            let Some(plan) = OwnerQuery::resolve(table, &columns) else {
                debug!(table, "no usable identifier/timestamp columns");
                continue;
            };

            match plan.run(&conn) {
                Ok(identities) => return Ok(identities),
                Err(e) if is_access_error(&e) || is_corruption(&e) => {
                    return Err(map_sqlite_err(&self.path, e));
                }
                Err(e) => debug!(table, error = %e, "owner query failed, trying next layout"),
            }
        }

        Err(StoreError::SchemaMismatch {
            path: self.path.clone(),
            tried: RELATIONAL_TABLES.join(", "),
        })
    }
}

/// Column choice for one owner table
#[derive(Debug)]
struct OwnerQuery {
    sql: String,
    id_idx: Option<usize>,
    name_idx: Option<usize>,
    invalid_idx: Option<usize>,
    timestamp_idx: Vec<usize>,
}

impl OwnerQuery {
    fn resolve(table: &str, columns: &[String]) -> Option<Self> {
        let id_col = pick_field(columns, ID_FIELDS);
        let name_col = pick_field(columns, NAME_FIELDS);
        let invalid_col = pick_field(columns, INVALID_FIELDS);
        let timestamp_cols = timestamp_fields(columns);

        if timestamp_cols.is_empty() || (id_col.is_none() && name_col.is_none()) {
            return None;
        }

        let mut select: Vec<&str> = Vec::new();
        let id_idx = id_col.map(|c| select_column(&mut select, c));
        let name_idx = name_col.map(|c| select_column(&mut select, c));
        let invalid_idx = invalid_col.map(|c| select_column(&mut select, c));
        let timestamp_idx =
            timestamp_cols.iter().map(|c| select_column(&mut select, c)).collect();

        let sql = format!(
            "SELECT {} FROM {}",
            select.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", "),
            quote_ident(table)
        );

        Some(Self { sql, id_idx, name_idx, invalid_idx, timestamp_idx })
    }

    fn run(&self, conn: &Connection) -> rusqlite::Result<Vec<Identity>> {
        let mut stmt = conn.prepare(&self.sql)?;
        let mut rows = stmt.query([])?;
        let mut identities = Vec::new();

        while let Some(row) = rows.next()? {
            if let Some(idx) = self.invalid_idx
                && value_is_truthy(row.get_ref(idx)?)
            {
                continue;
            }

            let id = self.id_idx.map(|idx| row.get_ref(idx)).transpose()?.and_then(value_text);
            let name = self.name_idx.map(|idx| row.get_ref(idx)).transpose()?.and_then(value_text);
            let stamps = self
                .timestamp_idx
                .iter()
                .map(|idx| row.get_ref(*idx).map(value_millis))
                .collect::<rusqlite::Result<Vec<_>>>()?;

            match owner_identity(id, name, latest_update(stamps)) {
                Some(identity) => {
                    debug!(
                        id = %identity.id,
                        name = %identity.name,
                        last_update = ?identity.last_update,
                        "owner row"
                    );
                    identities.push(identity);
                }
                None => debug!("skipping owner row without identifier or name"),
            }
        }

        Ok(identities)
    }
}

fn select_column<'a>(select: &mut Vec<&'a str>, column: &'a str) -> usize {
    select.push(column);
    select.len() - 1
}

fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
    names.collect()
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let names = stmt.query_map([table], |row| row.get::<_, String>(0))?;
    names.collect()
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn value_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn value_millis(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(i) if i > 0 => Some(i),
        ValueRef::Real(f) if f.is_finite() && f >= 1.0 && f < i64::MAX as f64 => Some(f as i64),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().and_then(parse_millis),
        _ => None,
    }
}

fn value_is_truthy(value: ValueRef<'_>) -> bool {
    match value {
        ValueRef::Integer(i) => i != 0,
        ValueRef::Real(f) => f != 0.0,
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).is_ok_and(is_truthy),
        ValueRef::Null | ValueRef::Blob(_) => false,
    }
}

fn sqlite_code(err: &rusqlite::Error) -> Option<ErrorCode> {
    match err {
        rusqlite::Error::SqliteFailure(sql_err, _) => Some(sql_err.code),
        _ => None,
    }
}

fn is_access_error(err: &rusqlite::Error) -> bool {
    matches!(
        sqlite_code(err),
        Some(
            ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::PermissionDenied
                | ErrorCode::AuthorizationForStatementDenied
                | ErrorCode::ReadOnly
                | ErrorCode::SystemIoFailure
        )
    )
}

fn is_corruption(err: &rusqlite::Error) -> bool {
    matches!(sqlite_code(err), Some(ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt))
}

fn map_sqlite_err(path: &Path, err: rusqlite::Error) -> StoreError {
    if is_corruption(&err) {
        StoreError::parse(path, err)
    } else {
        StoreError::unreadable(path, err)
    }
}
