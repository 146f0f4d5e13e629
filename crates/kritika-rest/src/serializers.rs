//! Serializer DTOs: wire shapes plus the field validation the request layer
//! owns. Semantic re-checks (role tokens, the reserved username, the year
//! ceiling) reuse the core validators so the rules live in one place.

use chrono::{DateTime, Utc};
use kritika_core::validators::{
	validate_email, validate_score, validate_text, validate_username, validate_year,
};
use kritika_core::{Result, Role};
use kritika_db::{Category, Comment, Genre, Review, TitleDetail, User};
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
	pub email: String,
	pub username: String,
	/// Optional role hint; must be a valid role token when present.
	pub role: Option<String>,
}

impl SignupRequest {
	pub fn validate(&self) -> Result<Role> {
		validate_email(&self.email)?;
		validate_username(&self.username)?;
		match &self.role {
			Some(token) => token.parse(),
			None => Ok(Role::User),
		}
	}
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SignupResponse {
	pub email: String,
	pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
	pub username: String,
	pub confirmation_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
	pub token: String,
}

// =============================================================================
// Users
// =============================================================================

/// Public user shape; deliberately without id or confirmation code.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserOut {
	pub username: String,
	pub email: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub bio: Option<String>,
	pub role: Role,
}

impl From<User> for UserOut {
	fn from(user: User) -> Self {
		Self {
			username: user.username,
			email: user.email,
			first_name: user.first_name,
			last_name: user.last_name,
			bio: user.bio,
			role: user.role,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
	pub username: String,
	pub email: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub bio: Option<String>,
	pub role: Option<String>,
}

impl UserCreate {
	pub fn validate(&self) -> Result<Role> {
		validate_username(&self.username)?;
		validate_email(&self.email)?;
		match &self.role {
			Some(token) => token.parse(),
			None => Ok(Role::User),
		}
	}
}

/// Partial user update; absent fields stay untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatchRequest {
	pub username: Option<String>,
	pub email: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub bio: Option<String>,
	pub role: Option<String>,
}

impl UserPatchRequest {
	/// The self-profile path may not change roles; the field is dropped
	/// silently and the rest of the update proceeds.
	pub fn without_role(mut self) -> Self {
		self.role = None;
		self
	}

	/// Validate and convert to the storage patch.
	pub fn into_patch(self) -> Result<kritika_db::UserPatch> {
		if let Some(username) = &self.username {
			validate_username(username)?;
		}
		if let Some(email) = &self.email {
			validate_email(email)?;
		}
		let role = match &self.role {
			Some(token) => Some(token.parse::<Role>()?),
			None => None,
		};
		Ok(kritika_db::UserPatch {
			username: self.username,
			email: self.email,
			first_name: self.first_name,
			last_name: self.last_name,
			bio: self.bio,
			role,
		})
	}
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryOut {
	pub name: String,
	pub slug: String,
}

impl From<Category> for CategoryOut {
	fn from(category: Category) -> Self {
		Self {
			name: category.name,
			slug: category.slug,
		}
	}
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenreOut {
	pub name: String,
	pub slug: String,
}

impl From<Genre> for GenreOut {
	fn from(genre: Genre) -> Self {
		Self {
			name: genre.name,
			slug: genre.slug,
		}
	}
}

/// Shared input shape for categories and genres.
#[derive(Debug, Clone, Deserialize)]
pub struct SlugItemIn {
	pub name: String,
	pub slug: String,
}

impl SlugItemIn {
	pub fn validate(&self) -> Result<()> {
		validate_text("name", &self.name)?;
		validate_text("slug", &self.slug)
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleOut {
	pub id: i64,
	pub name: String,
	pub year: i32,
	pub rating: Option<f64>,
	pub description: Option<String>,
	pub category: Option<CategoryOut>,
	pub genre: Vec<GenreOut>,
}

impl From<TitleDetail> for TitleOut {
	fn from(detail: TitleDetail) -> Self {
		Self {
			id: detail.id,
			name: detail.name,
			year: detail.year,
			rating: detail.rating,
			description: detail.description,
			category: detail.category.map(Into::into),
			genre: detail.genres.into_iter().map(Into::into).collect(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct TitleIn {
	pub name: String,
	pub year: i32,
	pub description: Option<String>,
	pub category: Option<String>,
	#[serde(default)]
	pub genre: Vec<String>,
}

impl TitleIn {
	pub fn validate(&self) -> Result<()> {
		validate_text("name", &self.name)?;
		validate_year(self.year)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitlePatchRequest {
	pub name: Option<String>,
	pub year: Option<i32>,
	pub description: Option<String>,
	pub category: Option<String>,
	pub genre: Option<Vec<String>>,
}

impl TitlePatchRequest {
	pub fn into_patch(self) -> Result<kritika_db::TitlePatch> {
		if let Some(name) = &self.name {
			validate_text("name", name)?;
		}
		if let Some(year) = self.year {
			validate_year(year)?;
		}
		Ok(kritika_db::TitlePatch {
			name: self.name,
			year: self.year,
			description: self.description,
			category: self.category,
			genres: self.genre,
		})
	}
}

/// Query parameters accepted by the title list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleQuery {
	pub category: Option<String>,
	pub genre: Option<String>,
	pub name: Option<String>,
	pub year: Option<i32>,
}

impl From<TitleQuery> for kritika_db::TitleFilter {
	fn from(query: TitleQuery) -> Self {
		Self {
			category: query.category,
			genre: query.genre,
			name: query.name,
			year: query.year,
		}
	}
}

// =============================================================================
// Reviews and comments
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ReviewOut {
	pub id: i64,
	pub title: i64,
	pub text: String,
	/// Author's username.
	pub author: String,
	pub score: i64,
	pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewOut {
	fn from(review: Review) -> Self {
		Self {
			id: review.id,
			title: review.title_id,
			text: review.text,
			author: review.author,
			score: review.score,
			pub_date: review.pub_date,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewIn {
	pub text: String,
	pub score: i64,
}

impl ReviewIn {
	pub fn validate(&self) -> Result<()> {
		validate_score(self.score)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatchRequest {
	pub text: Option<String>,
	pub score: Option<i64>,
}

impl ReviewPatchRequest {
	pub fn validate(&self) -> Result<()> {
		match self.score {
			Some(score) => validate_score(score),
			None => Ok(()),
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentOut {
	pub id: i64,
	pub review: i64,
	pub text: String,
	/// Author's username.
	pub author: String,
	pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentOut {
	fn from(comment: Comment) -> Self {
		Self {
			id: comment.id,
			review: comment.review_id,
			text: comment.text,
			author: comment.author,
			pub_date: comment.pub_date,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentIn {
	pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPatchRequest {
	pub text: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Datelike;
	use kritika_core::ApiError;

	#[test]
	fn signup_request_parses_role_hint() {
		let request = SignupRequest {
			email: "a@b.com".into(),
			username: "alice".into(),
			role: Some("moderator".into()),
		};
		assert_eq!(request.validate().unwrap(), Role::Moderator);
	}

	#[test]
	fn signup_request_defaults_role_to_user() {
		let request = SignupRequest {
			email: "a@b.com".into(),
			username: "alice".into(),
			role: None,
		};
		assert_eq!(request.validate().unwrap(), Role::User);
	}

	#[test]
	fn signup_request_rejects_bad_role_and_reserved_username() {
		let bad_role = SignupRequest {
			email: "a@b.com".into(),
			username: "alice".into(),
			role: Some("owner".into()),
		};
		assert!(matches!(bad_role.validate(), Err(ApiError::BadRequest(_))));

		let reserved = SignupRequest {
			email: "a@b.com".into(),
			username: "me".into(),
			role: None,
		};
		assert!(matches!(reserved.validate(), Err(ApiError::BadRequest(_))));
	}

	#[test]
	fn user_patch_without_role_drops_only_role() {
		let patch = UserPatchRequest {
			bio: Some("bio".into()),
			role: Some("admin".into()),
			..UserPatchRequest::default()
		}
		.without_role();

		assert!(patch.role.is_none());
		assert_eq!(patch.bio.as_deref(), Some("bio"));
	}

	#[test]
	fn review_patch_validates_score_only_when_present() {
		assert!(ReviewPatchRequest::default().validate().is_ok());
		let bad = ReviewPatchRequest {
			score: Some(11),
			..ReviewPatchRequest::default()
		};
		assert!(matches!(bad.validate(), Err(ApiError::BadRequest(_))));
	}

	#[test]
	fn title_in_rejects_future_year() {
		let title = TitleIn {
			name: "From the future".into(),
			year: Utc::now().year() + 1,
			description: None,
			category: None,
			genre: Vec::new(),
		};
		assert!(matches!(title.validate(), Err(ApiError::BadRequest(_))));
	}
}
