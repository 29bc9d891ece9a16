// Copyright 2023 Remi Bernotavicius

use crate::error::{Error, Result};
use diesel::prelude::Connection as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::Path;

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

diesel::define_sql_function! {
    fn last_insert_rowid() -> diesel::sql_types::Integer;
}

/// Returns the id of the row most recently inserted on this connection.
pub fn last_insert_id(conn: &mut Connection) -> Result<i32> {
    use diesel::RunQueryDsl as _;

    Ok(diesel::select(last_insert_rowid()).get_result(conn)?)
}

pub fn establish_connection(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    let url = path
        .to_str()
        .ok_or_else(|| Error::Validation(format!("database path {path:?} is not UTF-8")))?;
    open(url)
}

fn open(url: &str) -> Result<Connection> {
    let mut connection = Connection::establish(url)?;
    connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(Error::Migration)?;
    log::debug!("database ready at {url}");
    Ok(connection)
}

#[cfg(test)]
pub fn establish_in_memory() -> Connection {
    open(":memory:").unwrap()
}

#[test]
fn migrations() {
    let mut conn = establish_in_memory();

    conn.revert_all_migrations(MIGRATIONS).unwrap();
    assert!(conn.has_pending_migration(MIGRATIONS).unwrap());

    conn.run_pending_migrations(MIGRATIONS).unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
}
