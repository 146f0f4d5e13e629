//! User repository.
//!
//! Username and email uniqueness is enforced by the schema; inserts and
//! updates map constraint violations to `Conflict` instead of pre-checking
//! with reads.

use crate::conflict_on_unique;
use crate::models::User;
use kritika_core::{ApiError, Result, Role};
use sqlx::sqlite::SqlitePool;

const USER_COLUMNS: &str =
	"id, username, email, first_name, last_name, bio, role, is_superuser, confirmation_code";

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
	pub username: String,
	pub email: String,
	pub role: Role,
	pub is_superuser: bool,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub bio: Option<String>,
	pub confirmation_code: Option<String>,
}

impl NewUser {
	/// A plain account with just identity fields, as signup creates them.
	pub fn signup(username: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
		Self {
			username: username.into(),
			email: email.into(),
			role,
			is_superuser: false,
			first_name: None,
			last_name: None,
			bio: None,
			confirmation_code: None,
		}
	}

	pub fn with_confirmation_code(mut self, code: impl Into<String>) -> Self {
		self.confirmation_code = Some(code.into());
		self
	}
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
	pub username: Option<String>,
	pub email: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub bio: Option<String>,
	pub role: Option<Role>,
}

#[derive(Debug, Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new account. Unique-constraint violations surface as
	/// `Conflict`; concurrent signups race here, not in application reads.
	pub async fn create(&self, new: NewUser) -> Result<User> {
		let sql = format!(
			"INSERT INTO users (username, email, first_name, last_name, bio, role, is_superuser, confirmation_code) \
			 VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
		);
		sqlx::query_as::<_, User>(&sql)
			.bind(&new.username)
			.bind(&new.email)
			.bind(&new.first_name)
			.bind(&new.last_name)
			.bind(&new.bio)
			.bind(new.role.as_str())
			.bind(new.is_superuser)
			.bind(&new.confirmation_code)
			.fetch_one(&self.pool)
			.await
			.map_err(|e| conflict_on_unique(e, "a user with this username or email already exists"))
	}

	pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
		let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
		let user = sqlx::query_as::<_, User>(&sql)
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;
		Ok(user)
	}

	pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
		let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
		let user = sqlx::query_as::<_, User>(&sql)
			.bind(username)
			.fetch_optional(&self.pool)
			.await?;
		Ok(user)
	}

	pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
		let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
		let user = sqlx::query_as::<_, User>(&sql)
			.bind(email)
			.fetch_optional(&self.pool)
			.await?;
		Ok(user)
	}

	pub async fn get_by_username(&self, username: &str) -> Result<User> {
		self.find_by_username(username)
			.await?
			.ok_or_else(|| ApiError::not_found(format!("user {username:?}")))
	}

	pub async fn get_by_id(&self, id: i64) -> Result<User> {
		self.find_by_id(id)
			.await?
			.ok_or_else(|| ApiError::not_found(format!("user #{id}")))
	}

	/// The record matching exactly this (email, username) pair, if any; the
	/// signup resend path keys on it.
	pub async fn find_exact_pair(&self, email: &str, username: &str) -> Result<Option<User>> {
		let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? AND username = ?");
		let user = sqlx::query_as::<_, User>(&sql)
			.bind(email)
			.bind(username)
			.fetch_optional(&self.pool)
			.await?;
		Ok(user)
	}

	/// Overwrite the stored confirmation code; the previous one stops
	/// matching from this point on.
	pub async fn set_confirmation_code(&self, user_id: i64, code: &str) -> Result<()> {
		sqlx::query("UPDATE users SET confirmation_code = ? WHERE id = ?")
			.bind(code)
			.bind(user_id)
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	/// All users ordered by username, optionally narrowed by a username
	/// substring.
	pub async fn list(&self, search: Option<&str>) -> Result<Vec<User>> {
		let users = match search {
			Some(term) => {
				let sql = format!(
					"SELECT {USER_COLUMNS} FROM users WHERE username LIKE ? ORDER BY username"
				);
				sqlx::query_as::<_, User>(&sql)
					.bind(format!("%{term}%"))
					.fetch_all(&self.pool)
					.await?
			}
			None => {
				let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username");
				sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?
			}
		};
		Ok(users)
	}

	/// Apply a partial update to the account with this username.
	pub async fn update(&self, username: &str, patch: UserPatch) -> Result<User> {
		let current = self.get_by_username(username).await?;

		let sql = format!(
			"UPDATE users SET \
			 username = COALESCE(?, username), \
			 email = COALESCE(?, email), \
			 first_name = COALESCE(?, first_name), \
			 last_name = COALESCE(?, last_name), \
			 bio = COALESCE(?, bio), \
			 role = COALESCE(?, role) \
			 WHERE id = ? RETURNING {USER_COLUMNS}"
		);
		sqlx::query_as::<_, User>(&sql)
			.bind(&patch.username)
			.bind(&patch.email)
			.bind(&patch.first_name)
			.bind(&patch.last_name)
			.bind(&patch.bio)
			.bind(patch.role.map(|r| r.as_str()))
			.bind(current.id)
			.fetch_one(&self.pool)
			.await
			.map_err(|e| conflict_on_unique(e, "a user with this username or email already exists"))
	}

	pub async fn delete(&self, username: &str) -> Result<()> {
		let result = sqlx::query("DELETE FROM users WHERE username = ?")
			.bind(username)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(ApiError::not_found(format!("user {username:?}")));
		}
		Ok(())
	}
}
