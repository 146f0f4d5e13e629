//! User management viewset.
//!
//! The collection endpoints are gated by `IsSuperuserOrAdmin`; any
//! authenticated user reaches their own record through the `me` operations,
//! which drop the role field from updates instead of rejecting them.

use crate::serializers::{UserCreate, UserOut, UserPatchRequest};
use kritika_auth::{Action, IsSuperuserOrAdmin, enforce};
use kritika_core::{ApiError, Caller, Result};
use kritika_db::{NewUser, UserRepository};

pub struct UserViewSet {
	users: UserRepository,
}

impl UserViewSet {
	pub fn new(users: UserRepository) -> Self {
		Self { users }
	}

	pub async fn list(&self, caller: &Caller, search: Option<&str>) -> Result<Vec<UserOut>> {
		enforce(&IsSuperuserOrAdmin, caller, Action::List)?;
		let users = self.users.list(search).await?;
		Ok(users.into_iter().map(Into::into).collect())
	}

	pub async fn retrieve(&self, caller: &Caller, username: &str) -> Result<UserOut> {
		enforce(&IsSuperuserOrAdmin, caller, Action::Retrieve)?;
		Ok(self.users.get_by_username(username).await?.into())
	}

	pub async fn create(&self, caller: &Caller, payload: UserCreate) -> Result<UserOut> {
		enforce(&IsSuperuserOrAdmin, caller, Action::Create)?;
		let role = payload.validate()?;
		let user = self
			.users
			.create(NewUser {
				username: payload.username,
				email: payload.email,
				role,
				is_superuser: false,
				first_name: payload.first_name,
				last_name: payload.last_name,
				bio: payload.bio,
				confirmation_code: None,
			})
			.await?;
		Ok(user.into())
	}

	/// Admin partial update; the role field is honored here, unlike the
	/// self-profile path.
	pub async fn update(
		&self,
		caller: &Caller,
		username: &str,
		payload: UserPatchRequest,
		partial: bool,
	) -> Result<UserOut> {
		if !partial {
			return Err(ApiError::MethodNotAllowed);
		}
		enforce(&IsSuperuserOrAdmin, caller, Action::Update)?;
		let user = self.users.update(username, payload.into_patch()?).await?;
		Ok(user.into())
	}

	pub async fn destroy(&self, caller: &Caller, username: &str) -> Result<()> {
		enforce(&IsSuperuserOrAdmin, caller, Action::Destroy)?;
		self.users.delete(username).await
	}

	pub async fn me_retrieve(&self, caller: &Caller) -> Result<UserOut> {
		let auth = caller.auth_user().ok_or(ApiError::Unauthorized)?;
		Ok(self.users.get_by_id(auth.id).await?.into())
	}

	/// Self-profile update. Role changes are silently dropped while the rest
	/// of the patch still applies; this asymmetry with the admin path is
	/// deliberate.
	pub async fn me_update(
		&self,
		caller: &Caller,
		payload: UserPatchRequest,
		partial: bool,
	) -> Result<UserOut> {
		if !partial {
			return Err(ApiError::MethodNotAllowed);
		}
		let auth = caller.auth_user().ok_or(ApiError::Unauthorized)?;
		let patch = payload.without_role().into_patch()?;
		let current = self.users.get_by_id(auth.id).await?;
		let user = self.users.update(&current.username, patch).await?;
		Ok(user.into())
	}

	/// Accounts cannot delete themselves through the profile endpoint.
	pub fn me_destroy(&self, _caller: &Caller) -> Result<()> {
		Err(ApiError::MethodNotAllowed)
	}
}
