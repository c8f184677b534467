// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::DatabaseConfig;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use miette::{Diagnostic, IntoDiagnostic};
use std::error::Error;
use std::fmt;

/// Migrations for the users, tickets and feedback tables, applied at startup
const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

// The migration runner returns boxed errors, which need a concrete type to become a diagnostic.
#[derive(Debug, Diagnostic)]
pub enum MigrationError {
	Connection(diesel::r2d2::PoolError),
	Migration(Box<dyn Error + Send + Sync>),
}

impl Error for MigrationError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Connection(error) => Some(error),
			Self::Migration(error) => error.source(),
		}
	}
}

impl fmt::Display for MigrationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Connection(error) => write!(f, "couldn't get a connection to migrate the database: {}", error),
			Self::Migration(error) => write!(f, "database migration failed: {}", error),
		}
	}
}

/// Sets up the connection pool shared by every ticket store operation.
///
/// Connections are tested when checked out, so a restarted database is picked up without restarting the bot.
pub fn connect_db(config: &DatabaseConfig) -> miette::Result<DbPool> {
	let manager: ConnectionManager<PgConnection> = ConnectionManager::new(config.connection_url());
	Pool::builder().test_on_check_out(true).build(manager).into_diagnostic()
}

pub fn run_embedded_migrations(db_connection_pool: &DbPool) -> Result<(), MigrationError> {
	let mut db_connection = db_connection_pool.get().map_err(MigrationError::Connection)?;
	let applied = db_connection
		.run_pending_migrations(MIGRATIONS)
		.map_err(MigrationError::Migration)?;
	for version in applied.iter() {
		tracing::info!(%version, "Applied database migration");
	}
	Ok(())
}
