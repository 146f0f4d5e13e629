//! # Kritika DB
//!
//! The storage collaborator: SQLite behind `sqlx`, with the invariants the
//! rest of the service relies on pushed into the schema itself: unique
//! usernames, emails and slugs, at most one review per (title, author), and
//! the cascade/SET NULL rules between catalog entities.
//!
//! Repositories here return domain errors ([`ApiError`]) so the layers above
//! never pattern-match on driver errors.

pub mod catalog;
pub mod comments;
pub mod models;
pub mod reviews;
pub mod users;

pub use catalog::{CategoryRepository, GenreRepository, NewTitle, TitleFilter, TitlePatch, TitleRepository};
pub use comments::CommentRepository;
pub use models::{Category, Comment, Genre, Review, Title, TitleDetail, User};
pub use reviews::ReviewRepository;
pub use users::{NewUser, UserPatch, UserRepository};

use kritika_core::ApiError;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Embedded schema migrations; run against every new pool.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Open a pool for `database_url` with foreign keys enforced.
///
/// An in-memory URL gets a single-connection pool, since each SQLite memory
/// connection is its own database and pooling them would silently shard the
/// data.
pub async fn connect(database_url: &str) -> sqlx::Result<SqlitePool> {
	let options = SqliteConnectOptions::from_str(database_url)?
		.create_if_missing(true)
		.foreign_keys(true);

	let mut pool_options = SqlitePoolOptions::new();
	if database_url.contains(":memory:") {
		pool_options = pool_options.max_connections(1);
	}
	pool_options.connect_with(options).await
}

/// Open a migrated in-memory database; the fixture for every storage test.
pub async fn connect_for_tests() -> SqlitePool {
	let pool = connect("sqlite::memory:")
		.await
		.expect("in-memory sqlite is always available");
	MIGRATOR
		.run(&pool)
		.await
		.expect("embedded migrations apply cleanly");
	pool
}

/// Map an insert/update error, turning a unique-constraint violation into
/// the given `Conflict` and passing everything else through as `Database`.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> ApiError {
	match &err {
		sqlx::Error::Database(dbe) if dbe.is_unique_violation() => ApiError::conflict(message),
		_ => ApiError::Database(err),
	}
}
