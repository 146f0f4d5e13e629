//! Error taxonomy shared across the service.
//!
//! Every operation reports failures synchronously through [`ApiError`];
//! nothing is treated as transient or retried internally.

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by Kritika operations.
///
/// The variants mirror the service's externally observable failure classes;
/// the HTTP front end maps each to a status code in one place.
#[derive(Debug, Error)]
pub enum ApiError {
	/// Malformed or invalid field value (bad role token, score out of range,
	/// release year in the future, reserved username).
	#[error("bad request: {0}")]
	BadRequest(String),

	/// Signup identity collision: the email belongs to one account and the
	/// username to another (or to none).
	#[error("conflict: {0}")]
	Conflict(String),

	/// Unknown username, title, review, or comment reference.
	#[error("not found: {0}")]
	NotFound(String),

	/// Confirmation code does not match the stored one for that username.
	#[error("invalid confirmation code")]
	InvalidCode,

	/// Second review by the same author on the same title.
	#[error("Нельзя оставлять больше 1 отзыва!")]
	DuplicateReview,

	/// Caller is anonymous where authentication is required, or presented a
	/// token that fails verification.
	#[error("authentication required")]
	Unauthorized,

	/// Authenticated caller lacks permission for the operation.
	#[error("permission denied")]
	Forbidden,

	/// Full-replace update attempted where only partial updates exist, or a
	/// verb the endpoint deliberately refuses (DELETE on the self profile).
	#[error("method not allowed")]
	MethodNotAllowed,

	/// Storage collaborator failure.
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	/// Anything else that should never reach a client unexplained.
	#[error("internal error: {0}")]
	Internal(String),
}

impl ApiError {
	/// Shorthand for a `BadRequest` with a formatted message.
	pub fn bad_request(msg: impl Into<String>) -> Self {
		Self::BadRequest(msg.into())
	}

	/// Shorthand for a `NotFound` naming the missing resource.
	pub fn not_found(what: impl Into<String>) -> Self {
		Self::NotFound(what.into())
	}

	/// Shorthand for a `Conflict` with a formatted message.
	pub fn conflict(msg: impl Into<String>) -> Self {
		Self::Conflict(msg.into())
	}
}
