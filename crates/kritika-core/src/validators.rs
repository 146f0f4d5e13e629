//! Semantic field checks the core re-validates itself.
//!
//! Syntactic validation (slug shape, field presence) belongs to the request
//! parsing layer; the checks here guard invariants the core owns regardless
//! of who called it: the username pattern and reserved name, the score
//! range, and the release-year ceiling.

use crate::exception::{ApiError, Result};
use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 150;
/// Maximum email length.
pub const MAX_EMAIL_LEN: usize = 254;
/// Maximum length for names, slugs, and text fields mirrored from storage.
pub const MAX_TEXT_LEN: usize = 256;
/// Review scores are integers in this inclusive range.
pub const SCORE_MIN: i64 = 1;
/// Upper bound of the review score range.
pub const SCORE_MAX: i64 = 10;

/// Usernames are routed as path segments, so the profile endpoint's own
/// segment is reserved.
pub const RESERVED_USERNAME: &str = "me";

static USERNAME_RE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

/// Validate a username against the account rules.
///
/// # Examples
///
/// ```
/// use kritika_core::validators::validate_username;
///
/// assert!(validate_username("alice.dev+42").is_ok());
/// assert!(validate_username("me").is_err());
/// assert!(validate_username("no spaces").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<()> {
	if username.is_empty() || username.len() > MAX_USERNAME_LEN {
		return Err(ApiError::bad_request(format!(
			"username must be 1..={MAX_USERNAME_LEN} characters"
		)));
	}
	if !USERNAME_RE.is_match(username) {
		return Err(ApiError::bad_request(
			"username may only contain letters, digits and @ . + - _",
		));
	}
	if username == RESERVED_USERNAME {
		return Err(ApiError::bad_request(format!(
			"username {RESERVED_USERNAME:?} is reserved"
		)));
	}
	Ok(())
}

/// Validate an email address: non-empty, bounded, and shaped like an address.
pub fn validate_email(email: &str) -> Result<()> {
	if email.is_empty() || email.len() > MAX_EMAIL_LEN {
		return Err(ApiError::bad_request(format!(
			"email must be 1..={MAX_EMAIL_LEN} characters"
		)));
	}
	// Full RFC-grade validation is the parsing layer's job.
	if !email.contains('@') {
		return Err(ApiError::bad_request("email must contain '@'"));
	}
	Ok(())
}

/// Validate a review score, 1..=10 inclusive.
pub fn validate_score(score: i64) -> Result<()> {
	if (SCORE_MIN..=SCORE_MAX).contains(&score) {
		Ok(())
	} else {
		Err(ApiError::bad_request(format!(
			"score must be between {SCORE_MIN} and {SCORE_MAX}"
		)))
	}
}

/// Validate a title's release year: anything up to the current calendar year.
pub fn validate_year(year: i32) -> Result<()> {
	let current = Utc::now().year();
	if year > current {
		Err(ApiError::bad_request(format!(
			"release year {year} is after the current year {current}"
		)))
	} else {
		Ok(())
	}
}

/// Validate a bounded text field (names, slugs, descriptions).
pub fn validate_text(field: &str, value: &str) -> Result<()> {
	if value.is_empty() || value.len() > MAX_TEXT_LEN {
		return Err(ApiError::bad_request(format!(
			"{field} must be 1..={MAX_TEXT_LEN} characters"
		)));
	}
	Ok(())
}
