//! Catalog viewsets: categories, genres, titles.
//!
//! Reads are public; every write is admin-gated through `IsAdminOrReadOnly`.
//! Categories and genres expose only list/create/destroy; titles get the
//! full set with partial updates.

use crate::serializers::{
	CategoryOut, GenreOut, SlugItemIn, TitleIn, TitleOut, TitlePatchRequest, TitleQuery,
};
use kritika_auth::{Action, IsAdminOrReadOnly, enforce};
use kritika_core::{ApiError, Caller, Result};
use kritika_db::{CategoryRepository, GenreRepository, NewTitle, TitleRepository};

pub struct CategoryViewSet {
	categories: CategoryRepository,
}

impl CategoryViewSet {
	pub fn new(categories: CategoryRepository) -> Self {
		Self { categories }
	}

	pub async fn list(&self, caller: &Caller, search: Option<&str>) -> Result<Vec<CategoryOut>> {
		enforce(&IsAdminOrReadOnly, caller, Action::List)?;
		let rows = self.categories.list(search).await?;
		Ok(rows.into_iter().map(Into::into).collect())
	}

	pub async fn create(&self, caller: &Caller, payload: SlugItemIn) -> Result<CategoryOut> {
		enforce(&IsAdminOrReadOnly, caller, Action::Create)?;
		payload.validate()?;
		let category = self.categories.create(&payload.name, &payload.slug).await?;
		Ok(category.into())
	}

	pub async fn destroy(&self, caller: &Caller, slug: &str) -> Result<()> {
		enforce(&IsAdminOrReadOnly, caller, Action::Destroy)?;
		self.categories.delete_by_slug(slug).await
	}
}

pub struct GenreViewSet {
	genres: GenreRepository,
}

impl GenreViewSet {
	pub fn new(genres: GenreRepository) -> Self {
		Self { genres }
	}

	pub async fn list(&self, caller: &Caller, search: Option<&str>) -> Result<Vec<GenreOut>> {
		enforce(&IsAdminOrReadOnly, caller, Action::List)?;
		let rows = self.genres.list(search).await?;
		Ok(rows.into_iter().map(Into::into).collect())
	}

	pub async fn create(&self, caller: &Caller, payload: SlugItemIn) -> Result<GenreOut> {
		enforce(&IsAdminOrReadOnly, caller, Action::Create)?;
		payload.validate()?;
		let genre = self.genres.create(&payload.name, &payload.slug).await?;
		Ok(genre.into())
	}

	pub async fn destroy(&self, caller: &Caller, slug: &str) -> Result<()> {
		enforce(&IsAdminOrReadOnly, caller, Action::Destroy)?;
		self.genres.delete_by_slug(slug).await
	}
}

pub struct TitleViewSet {
	titles: TitleRepository,
}

impl TitleViewSet {
	pub fn new(titles: TitleRepository) -> Self {
		Self { titles }
	}

	/// Public list; every row carries the rating averaged at this instant.
	pub async fn list(&self, caller: &Caller, query: TitleQuery) -> Result<Vec<TitleOut>> {
		enforce(&IsAdminOrReadOnly, caller, Action::List)?;
		let rows = self.titles.list(&query.into()).await?;
		Ok(rows.into_iter().map(Into::into).collect())
	}

	pub async fn retrieve(&self, caller: &Caller, id: i64) -> Result<TitleOut> {
		enforce(&IsAdminOrReadOnly, caller, Action::Retrieve)?;
		Ok(self.titles.retrieve(id).await?.into())
	}

	pub async fn create(&self, caller: &Caller, payload: TitleIn) -> Result<TitleOut> {
		enforce(&IsAdminOrReadOnly, caller, Action::Create)?;
		payload.validate()?;
		let title = self
			.titles
			.create(NewTitle {
				name: payload.name,
				year: payload.year,
				description: payload.description,
				category: payload.category,
				genres: payload.genre,
			})
			.await?;
		Ok(title.into())
	}

	pub async fn update(
		&self,
		caller: &Caller,
		id: i64,
		payload: TitlePatchRequest,
		partial: bool,
	) -> Result<TitleOut> {
		if !partial {
			return Err(ApiError::MethodNotAllowed);
		}
		enforce(&IsAdminOrReadOnly, caller, Action::Update)?;
		let title = self.titles.update(id, payload.into_patch()?).await?;
		Ok(title.into())
	}

	pub async fn destroy(&self, caller: &Caller, id: i64) -> Result<()> {
		enforce(&IsAdminOrReadOnly, caller, Action::Destroy)?;
		self.titles.delete(id).await
	}
}
