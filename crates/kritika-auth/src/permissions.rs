//! Permission classes.
//!
//! Pure decision functions over (caller, action, resource owner). Handlers
//! run the request-level check before touching storage and the object-level
//! check once the target instance (and its owner) is loaded, mirroring the
//! two-phase shape of the viewset layer.
//!
//! Denials are classified by [`enforce`]/[`enforce_object`]: an anonymous
//! caller is told to authenticate, an authenticated one is refused.

use kritika_core::{ApiError, Caller, Result};

/// What the caller intends to do with the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	List,
	Retrieve,
	Create,
	Update,
	Destroy,
}

impl Action {
	/// Read-only actions are safe and never gated.
	pub fn is_safe(self) -> bool {
		matches!(self, Action::List | Action::Retrieve)
	}
}

/// A permission class: request-level and object-level checks.
pub trait Policy {
	/// Request-level check, evaluated before the target is loaded.
	fn has_permission(&self, caller: &Caller, action: Action) -> bool;

	/// Object-level check against the target's owning user, if it has one.
	fn has_object_permission(&self, caller: &Caller, action: Action, owner: Option<i64>) -> bool {
		let _ = owner;
		self.has_permission(caller, action)
	}
}

/// Reviews and comments: anyone may read; writes require authentication and
/// touch a specific instance only for its author, a moderator, or an admin.
pub struct IsAuthorModeratorAdminOrReadOnly;

impl Policy for IsAuthorModeratorAdminOrReadOnly {
	fn has_permission(&self, caller: &Caller, action: Action) -> bool {
		action.is_safe() || caller.is_authenticated()
	}

	fn has_object_permission(&self, caller: &Caller, action: Action, owner: Option<i64>) -> bool {
		if action.is_safe() {
			return true;
		}
		match caller {
			Caller::Anonymous => false,
			Caller::User(user) => owner == Some(user.id) || user.role.is_moderator_or_admin(),
		}
	}
}

/// Categories, genres, titles: public reads, admin-only writes. Ownership
/// plays no part here; the object-level check repeats the role gate.
pub struct IsAdminOrReadOnly;

impl Policy for IsAdminOrReadOnly {
	fn has_permission(&self, caller: &Caller, action: Action) -> bool {
		action.is_safe() || caller.is_admin()
	}

	fn has_object_permission(&self, caller: &Caller, action: Action, _owner: Option<i64>) -> bool {
		action.is_safe() || caller.is_admin()
	}
}

/// User management: admins and superusers only, reads included.
pub struct IsSuperuserOrAdmin;

impl Policy for IsSuperuserOrAdmin {
	fn has_permission(&self, caller: &Caller, _action: Action) -> bool {
		caller.is_superuser_or_admin()
	}
}

/// Run the request-level check, classifying a denial as 401 or 403.
pub fn enforce(policy: &impl Policy, caller: &Caller, action: Action) -> Result<()> {
	if policy.has_permission(caller, action) {
		Ok(())
	} else if caller.is_authenticated() {
		Err(ApiError::Forbidden)
	} else {
		Err(ApiError::Unauthorized)
	}
}

/// Run the object-level check, classifying a denial as 401 or 403.
pub fn enforce_object(
	policy: &impl Policy,
	caller: &Caller,
	action: Action,
	owner: Option<i64>,
) -> Result<()> {
	if policy.has_object_permission(caller, action, owner) {
		Ok(())
	} else if caller.is_authenticated() {
		Err(ApiError::Forbidden)
	} else {
		Err(ApiError::Unauthorized)
	}
}
