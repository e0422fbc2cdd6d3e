use diesel::prelude::*;
use diesel::Connection as ConnectionTrait;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::core::GenericResult;

pub mod models;
pub mod schema;

pub use diesel::sqlite::SqliteConnection as Connection;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn connect(url: &str) -> GenericResult<Connection> {
    let mut connection = SqliteConnection::establish(url).map_err(|e| format!(
        "Unable to connect to {:?} database: {}", url, e))?;

    // SQLite doesn't enforce foreign keys by default, but we rely on
    // cascading deletes
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut connection)?;

    connection.run_pending_migrations(MIGRATIONS).map_err(|e| format!(
        "Failed to prepare the database: {}", e))?;

    Ok(connection)
}
