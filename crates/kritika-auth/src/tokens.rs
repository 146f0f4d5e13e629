//! Access tokens.
//!
//! A token is an HS256-signed JWT binding the user's identity, valid for a
//! fixed window from issuance. Clients present it as a bearer credential;
//! verification here must match mint logic exactly, since the HTTP layer
//! delegates both directions to [`TokenService`].

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use kritika_core::{ApiError, AuthUser, Result};
use serde::{Deserialize, Serialize};

/// Access tokens expire this many days after issuance.
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// JWT claims carried by a Kritika access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
	/// User id, stringified.
	pub sub: String,
	/// Expiration time (unix seconds).
	pub exp: i64,
	/// Issued at (unix seconds).
	pub iat: i64,
	pub username: String,
}

impl Claims {
	fn new(user_id: i64, username: String, valid_for: Duration) -> Self {
		let now = Utc::now();
		Self {
			sub: user_id.to_string(),
			username,
			iat: now.timestamp(),
			exp: (now + valid_for).timestamp(),
		}
	}

	pub fn is_expired(&self) -> bool {
		Utc::now().timestamp() > self.exp
	}

	/// The user id the token was minted for.
	pub fn user_id(&self) -> Result<i64> {
		self.sub
			.parse()
			.map_err(|_| ApiError::Unauthorized)
	}
}

/// Mints and verifies access tokens with a server-held signing secret.
///
/// # Examples
///
/// ```
/// use kritika_auth::tokens::TokenService;
/// use kritika_core::{AuthUser, Role};
///
/// let service = TokenService::new(b"server-secret");
/// let user = AuthUser {
///     id: 42,
///     username: "alice".into(),
///     email: "alice@example.com".into(),
///     role: Role::User,
///     is_superuser: false,
/// };
///
/// let token = service.mint(&user).unwrap();
/// let claims = service.verify(&token).unwrap();
/// assert_eq!(claims.user_id().unwrap(), 42);
/// assert_eq!(claims.username, "alice");
/// ```
pub struct TokenService {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
}

impl TokenService {
	pub fn new(secret: &[u8]) -> Self {
		Self {
			encoding_key: EncodingKey::from_secret(secret),
			decoding_key: DecodingKey::from_secret(secret),
			validation: Validation::default(),
		}
	}

	/// Mint a token for `user`, valid for [`TOKEN_VALIDITY_DAYS`].
	pub fn mint(&self, user: &AuthUser) -> Result<String> {
		let claims = Claims::new(
			user.id,
			user.username.clone(),
			Duration::days(TOKEN_VALIDITY_DAYS),
		);
		self.encode(&claims)
	}

	/// Verify signature and expiry, returning the claims.
	///
	/// Any failure (bad signature, malformed token, expired window) is
	/// reported as `Unauthorized`; callers cannot distinguish forgery from
	/// staleness, and should not.
	pub fn verify(&self, token: &str) -> Result<Claims> {
		let claims = self.decode(token)?;
		if claims.is_expired() {
			return Err(ApiError::Unauthorized);
		}
		Ok(claims)
	}

	fn encode(&self, claims: &Claims) -> Result<String> {
		encode(&Header::default(), claims, &self.encoding_key)
			.map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))
	}

	fn decode(&self, token: &str) -> Result<Claims> {
		decode::<Claims>(token, &self.decoding_key, &self.validation)
			.map(|data| data.claims)
			.map_err(|_| ApiError::Unauthorized)
	}
}
