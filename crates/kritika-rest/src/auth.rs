//! Signup, token issuance, and bearer-token resolution.

use crate::serializers::{SignupRequest, SignupResponse, TokenRequest, TokenResponse};
use kritika_auth::{TokenService, generate_confirmation_code};
use kritika_core::{ApiError, Caller, Result};
use kritika_db::{NewUser, UserRepository};
use kritika_mail::{EmailBackend, send_mail};
use std::sync::Arc;

const CONFIRMATION_SUBJECT: &str = "Код подтверждения";

/// Two-step registration, step one: create (or re-confirm) the account and
/// mail out a fresh confirmation code.
pub struct SignupEndpoint {
	users: UserRepository,
	mail: Arc<dyn EmailBackend>,
	from_email: String,
}

impl SignupEndpoint {
	pub fn new(users: UserRepository, mail: Arc<dyn EmailBackend>, from_email: String) -> Self {
		Self {
			users,
			mail,
			from_email,
		}
	}

	/// Register `username`/`email`, or resend a code to an existing exact
	/// match.
	///
	/// A matching (email, username) pair is an idempotent resend: the stored
	/// code is overwritten with a fresh one and the call succeeds without
	/// creating a second identity. A collision on just one of the two fields
	/// is a `Conflict`. The storage constraints re-check both rules, so two
	/// racing signups cannot both win.
	pub async fn post(&self, payload: SignupRequest) -> Result<SignupResponse> {
		let role = payload.validate()?;

		let code = generate_confirmation_code();

		if let Some(existing) = self
			.users
			.find_exact_pair(&payload.email, &payload.username)
			.await?
		{
			self.users.set_confirmation_code(existing.id, &code).await?;
			tracing::info!(username = %existing.username, "signup resend, confirmation code regenerated");
			self.dispatch_code(&payload.email, &code);
			return Ok(SignupResponse {
				email: payload.email,
				username: payload.username,
			});
		}

		if self.users.find_by_email(&payload.email).await?.is_some() {
			return Err(ApiError::conflict("a user with this email already exists"));
		}
		if self.users.find_by_username(&payload.username).await?.is_some() {
			return Err(ApiError::conflict(
				"a user with this username already exists",
			));
		}

		let user = self
			.users
			.create(
				NewUser::signup(payload.username.clone(), payload.email.clone(), role)
					.with_confirmation_code(code.as_str()),
			)
			.await?;
		tracing::info!(username = %user.username, role = %user.role, "user registered");

		self.dispatch_code(&payload.email, &code);
		Ok(SignupResponse {
			email: payload.email,
			username: payload.username,
		})
	}

	/// Fire-and-forget delivery; a failure is logged and never rolls back
	/// the already-committed account.
	fn dispatch_code(&self, email: &str, code: &str) {
		let mail = Arc::clone(&self.mail);
		let from_email = self.from_email.clone();
		let to = email.to_string();
		let body = format!("Ваш код подтверждения: {code}");
		tokio::spawn(async move {
			if let Err(error) =
				send_mail(mail.as_ref(), CONFIRMATION_SUBJECT, &body, &from_email, vec![to]).await
			{
				tracing::warn!(%error, "confirmation email delivery failed");
			}
		});
	}
}

/// Two-step registration, step two: exchange a confirmation code for an
/// access token.
pub struct TokenEndpoint {
	users: UserRepository,
	tokens: Arc<TokenService>,
}

impl TokenEndpoint {
	pub fn new(users: UserRepository, tokens: Arc<TokenService>) -> Self {
		Self { users, tokens }
	}

	/// Mint a bearer token for the (username, confirmation_code) pair.
	///
	/// The stored code is deliberately left in place: the protocol does not
	/// make codes single-use, and repeated issuance from one code is
	/// accepted behavior.
	pub async fn post(&self, payload: TokenRequest) -> Result<TokenResponse> {
		let user = self
			.users
			.find_by_username(&payload.username)
			.await?
			.ok_or_else(|| ApiError::not_found(format!("user {:?}", payload.username)))?;

		if user.confirmation_code.as_deref() != Some(payload.confirmation_code.as_str()) {
			return Err(ApiError::InvalidCode);
		}

		let token = self.tokens.mint(&user.auth_user())?;
		Ok(TokenResponse { token })
	}
}

/// Resolves an incoming bearer token back to a caller identity.
pub struct Authenticator {
	users: UserRepository,
	tokens: Arc<TokenService>,
}

impl Authenticator {
	pub fn new(users: UserRepository, tokens: Arc<TokenService>) -> Self {
		Self { users, tokens }
	}

	/// `None` means an anonymous caller; a present token must verify and
	/// reference a live account, otherwise the request is unauthorized.
	pub async fn resolve(&self, bearer: Option<&str>) -> Result<Caller> {
		let Some(token) = bearer else {
			return Ok(Caller::Anonymous);
		};
		let claims = self.tokens.verify(token)?;
		let user = self
			.users
			.find_by_id(claims.user_id()?)
			.await?
			.ok_or(ApiError::Unauthorized)?;
		Ok(Caller::User(user.auth_user()))
	}
}
