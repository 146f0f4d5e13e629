//! Explicit caller identity.
//!
//! Operations never read the acting user from ambient state; every endpoint
//! method receives a [`Caller`] resolved once from the request's bearer
//! token.

use crate::role::Role;
use serde::{Deserialize, Serialize};

/// The identity facts permission decisions depend on.
///
/// This is a projection of the stored user record; profile fields (bio,
/// names, confirmation code) stay in the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
	pub id: i64,
	pub username: String,
	pub email: String,
	pub role: Role,
	pub is_superuser: bool,
}

/// Who is performing the current operation.
///
/// # Examples
///
/// ```
/// use kritika_core::{AuthUser, Caller, Role};
///
/// let caller = Caller::User(AuthUser {
///     id: 1,
///     username: "alice".into(),
///     email: "alice@example.com".into(),
///     role: Role::User,
///     is_superuser: false,
/// });
/// assert!(caller.is_authenticated());
/// assert!(!Caller::Anonymous.is_authenticated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
	Anonymous,
	User(AuthUser),
}

impl Caller {
	pub fn is_authenticated(&self) -> bool {
		matches!(self, Caller::User(_))
	}

	/// The authenticated user, if any.
	pub fn auth_user(&self) -> Option<&AuthUser> {
		match self {
			Caller::User(user) => Some(user),
			Caller::Anonymous => None,
		}
	}

	pub fn is_admin(&self) -> bool {
		matches!(self, Caller::User(user) if user.role == Role::Admin)
	}

	/// Admin role or the superuser flag; the gate for user management.
	pub fn is_superuser_or_admin(&self) -> bool {
		matches!(
			self,
			Caller::User(user) if user.role == Role::Admin || user.is_superuser
		)
	}
}
