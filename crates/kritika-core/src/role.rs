//! The closed set of user roles.

use crate::exception::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role carried by every user account.
///
/// Stored as its lowercase token (`"user"`, `"moderator"`, `"admin"`), which
/// is also the wire form clients submit as a role hint at signup.
///
/// # Examples
///
/// ```
/// use kritika_core::Role;
///
/// let role: Role = "moderator".parse().unwrap();
/// assert_eq!(role, Role::Moderator);
/// assert_eq!(role.as_str(), "moderator");
/// assert!("owner".parse::<Role>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Moderator,
	Admin,
}

impl Role {
	/// The lowercase wire/storage token for this role.
	pub fn as_str(self) -> &'static str {
		match self {
			Role::User => "user",
			Role::Moderator => "moderator",
			Role::Admin => "admin",
		}
	}

	/// Whether this role may moderate other users' reviews and comments.
	pub fn is_moderator_or_admin(self) -> bool {
		matches!(self, Role::Moderator | Role::Admin)
	}
}

impl Default for Role {
	fn default() -> Self {
		Role::User
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Role {
	type Err = ApiError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"user" => Ok(Role::User),
			"moderator" => Ok(Role::Moderator),
			"admin" => Ok(Role::Admin),
			other => Err(ApiError::bad_request(format!("unknown role: {other:?}"))),
		}
	}
}

impl TryFrom<String> for Role {
	type Error = ApiError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
