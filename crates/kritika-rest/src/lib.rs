//! # Kritika REST
//!
//! The request-handling layer: thin viewset-style endpoints that compose the
//! permission evaluator, the repositories, the rating aggregation and the
//! token/mail services. Every operation takes an explicit
//! [`Caller`](kritika_core::Caller); nothing here reads ambient request
//! state or touches HTTP directly. The server crate translates wire
//! requests into these calls.
//!
//! Update endpoints carry a `partial` flag. The public API only permits
//! partial updates; a full-replace request is refused with
//! `MethodNotAllowed` rather than quietly treated as partial.

pub mod auth;
pub mod catalog;
pub mod comments;
pub mod reviews;
pub mod serializers;
pub mod users;

pub use auth::{Authenticator, SignupEndpoint, TokenEndpoint};
pub use catalog::{CategoryViewSet, GenreViewSet, TitleViewSet};
pub use comments::CommentViewSet;
pub use reviews::ReviewViewSet;
pub use users::UserViewSet;
