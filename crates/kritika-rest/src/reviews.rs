//! Review viewset, nested under a title.
//!
//! Reads are public. Creation stamps the caller as author and relies on the
//! storage constraint for the one-review-per-(title, author) rule; edits and
//! deletes pass the object-level author/moderator/admin check.

use crate::serializers::{ReviewIn, ReviewOut, ReviewPatchRequest};
use kritika_auth::{Action, IsAuthorModeratorAdminOrReadOnly, enforce, enforce_object};
use kritika_core::{ApiError, Caller, Result};
use kritika_db::ReviewRepository;

pub struct ReviewViewSet {
	reviews: ReviewRepository,
}

impl ReviewViewSet {
	pub fn new(reviews: ReviewRepository) -> Self {
		Self { reviews }
	}

	pub async fn list(&self, caller: &Caller, title_id: i64) -> Result<Vec<ReviewOut>> {
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::List)?;
		let reviews = self.reviews.list_for_title(title_id).await?;
		Ok(reviews.into_iter().map(Into::into).collect())
	}

	pub async fn retrieve(&self, caller: &Caller, title_id: i64, review_id: i64) -> Result<ReviewOut> {
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::Retrieve)?;
		Ok(self.reviews.get(title_id, review_id).await?.into())
	}

	pub async fn create(
		&self,
		caller: &Caller,
		title_id: i64,
		payload: ReviewIn,
	) -> Result<ReviewOut> {
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::Create)?;
		payload.validate()?;
		let author = caller.auth_user().ok_or(ApiError::Unauthorized)?;
		let review = self
			.reviews
			.create(title_id, author.id, &payload.text, payload.score)
			.await?;
		Ok(review.into())
	}

	pub async fn update(
		&self,
		caller: &Caller,
		title_id: i64,
		review_id: i64,
		payload: ReviewPatchRequest,
		partial: bool,
	) -> Result<ReviewOut> {
		if !partial {
			return Err(ApiError::MethodNotAllowed);
		}
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::Update)?;
		payload.validate()?;
		let current = self.reviews.get(title_id, review_id).await?;
		enforce_object(
			&IsAuthorModeratorAdminOrReadOnly,
			caller,
			Action::Update,
			Some(current.author_id),
		)?;
		let review = self
			.reviews
			.update(
				title_id,
				review_id,
				payload.text.as_deref(),
				payload.score,
			)
			.await?;
		Ok(review.into())
	}

	pub async fn destroy(&self, caller: &Caller, title_id: i64, review_id: i64) -> Result<()> {
		enforce(&IsAuthorModeratorAdminOrReadOnly, caller, Action::Destroy)?;
		let current = self.reviews.get(title_id, review_id).await?;
		enforce_object(
			&IsAuthorModeratorAdminOrReadOnly,
			caller,
			Action::Destroy,
			Some(current.author_id),
		)?;
		self.reviews.delete(title_id, review_id).await
	}
}
