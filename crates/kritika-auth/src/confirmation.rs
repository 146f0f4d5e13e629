//! Confirmation codes issued at signup.
//!
//! A code is a short alphanumeric secret mailed to the user and later
//! exchanged for an access token. Codes are regenerated (overwritten) on
//! idempotent re-signup and are not invalidated after use; that behavior is
//! part of the protocol contract, not an accident.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of a confirmation code in characters.
pub const CONFIRMATION_CODE_LEN: usize = 6;

/// Generate a fresh confirmation code.
///
/// Codes are drawn from the thread-local CSPRNG, so they are unpredictable
/// and independent across users.
///
/// # Examples
///
/// ```
/// use kritika_auth::{CONFIRMATION_CODE_LEN, generate_confirmation_code};
///
/// let code = generate_confirmation_code();
/// assert_eq!(code.len(), CONFIRMATION_CODE_LEN);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_confirmation_code() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(CONFIRMATION_CODE_LEN)
		.map(char::from)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn code_is_fixed_length_alphanumeric() {
		let code = generate_confirmation_code();
		assert_eq!(code.len(), CONFIRMATION_CODE_LEN);
		assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
	}

	#[test]
	fn consecutive_codes_differ() {
		// 62^6 values; a collision here means the generator is broken.
		let a = generate_confirmation_code();
		let b = generate_confirmation_code();
		assert_ne!(a, b);
	}
}
