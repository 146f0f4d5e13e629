//! Stored entity types.

use chrono::{DateTime, Utc};
use kritika_core::{AuthUser, Role};
use sqlx::FromRow;

/// A user account row.
#[derive(Debug, Clone, FromRow)]
pub struct User {
	pub id: i64,
	pub username: String,
	pub email: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub bio: Option<String>,
	#[sqlx(try_from = "String")]
	pub role: Role,
	pub is_superuser: bool,
	pub confirmation_code: Option<String>,
}

impl User {
	/// The identity projection permission checks run against.
	pub fn auth_user(&self) -> AuthUser {
		AuthUser {
			id: self.id,
			username: self.username.clone(),
			email: self.email.clone(),
			role: self.role,
			is_superuser: self.is_superuser,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Category {
	pub id: i64,
	pub name: String,
	pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Genre {
	pub id: i64,
	pub name: String,
	pub slug: String,
}

/// A title row as stored; `rating` is computed at read time and lives on
/// [`TitleDetail`].
#[derive(Debug, Clone, FromRow)]
pub struct Title {
	pub id: i64,
	pub name: String,
	pub year: i32,
	pub description: Option<String>,
	pub category_id: Option<i64>,
}

/// A title hydrated for reading: category and genres resolved, rating
/// averaged over the current review set (absent when there are no reviews).
#[derive(Debug, Clone)]
pub struct TitleDetail {
	pub id: i64,
	pub name: String,
	pub year: i32,
	pub description: Option<String>,
	pub rating: Option<f64>,
	pub category: Option<Category>,
	pub genres: Vec<Genre>,
}

/// A review row joined with its author's username.
#[derive(Debug, Clone, FromRow)]
pub struct Review {
	pub id: i64,
	pub title_id: i64,
	pub author_id: i64,
	pub author: String,
	pub text: String,
	pub score: i64,
	pub pub_date: DateTime<Utc>,
}

/// A comment row joined with its author's username.
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
	pub id: i64,
	pub review_id: i64,
	pub author_id: i64,
	pub author: String,
	pub text: String,
	pub pub_date: DateTime<Utc>,
}
