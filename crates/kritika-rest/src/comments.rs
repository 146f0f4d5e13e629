//! Comment viewset, nested under a review.
//!
//! Same permission shape as reviews, without any uniqueness rule: a user may
//! comment on a review as often as they like.

use crate::serializers::{CommentIn, CommentOut, CommentPatchRequest};
use kritika_auth::{Action, IsAuthorModeratorAdminOrReadOnly, enforce, enforce_object};
use kritika_core::{ApiError, Caller, Result};
use kritika_db::CommentRepository;

pub struct CommentViewSet {
	comments: CommentRepository,
}

impl CommentViewSet {
	pub fn new(comments: CommentRepository) -> Self {
		Self { comments }
	}

	pub async fn list(&self, caller: &Caller, review_id: i64) -> Result<Vec<CommentOut>> {
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::List)?;
		let comments = self.comments.list_for_review(review_id).await?;
		Ok(comments.into_iter().map(Into::into).collect())
	}

	pub async fn retrieve(
		&self,
		caller: &Caller,
		review_id: i64,
		comment_id: i64,
	) -> Result<CommentOut> {
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::Retrieve)?;
		Ok(self.comments.get(review_id, comment_id).await?.into())
	}

	pub async fn create(
		&self,
		caller: &Caller,
		review_id: i64,
		payload: CommentIn,
	) -> Result<CommentOut> {
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::Create)?;
		let author = caller.auth_user().ok_or(ApiError::Unauthorized)?;
		let comment = self
			.comments
			.create(review_id, author.id, &payload.text)
			.await?;
		Ok(comment.into())
	}

	pub async fn update(
		&self,
		caller: &Caller,
		review_id: i64,
		comment_id: i64,
		payload: CommentPatchRequest,
		partial: bool,
	) -> Result<CommentOut> {
		if !partial {
			return Err(ApiError::MethodNotAllowed);
		}
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::Update)?;
		let current = self.comments.get(review_id, comment_id).await?;
		enforce_object(
			&IsAuthorModeratorAdminOrReadOnly,
			caller,
			Action::Update,
			Some(current.author_id),
		)?;
		let comment = self
			.comments
			.update(review_id, comment_id, payload.text.as_deref())
			.await?;
		Ok(comment.into())
	}

	pub async fn destroy(&self, caller: &Caller, review_id: i64, comment_id: i64) -> Result<()> {
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::Destroy)?;
		let current = self.comments.get(review_id, comment_id).await?;
		enforce_object(
			&IsAuthorModeratorAdminOrReadOnly,
			caller,
			Action::Destroy,
			Some(current.author_id),
		)?;
		self.comments.delete(review_id, comment_id).await
	}
}
