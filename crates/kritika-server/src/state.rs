//! Shared application state: one instance of every endpoint, built over a
//! single pool.

use kritika_auth::TokenService;
use kritika_db::{
	CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
	UserRepository,
};
use kritika_mail::EmailBackend;
use kritika_rest::{
	Authenticator, CategoryViewSet, CommentViewSet, GenreViewSet, ReviewViewSet, SignupEndpoint,
	TitleViewSet, TokenEndpoint, UserViewSet,
};
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

pub struct AppState {
	pub authenticator: Authenticator,
	pub signup: SignupEndpoint,
	pub token: TokenEndpoint,
	pub users: UserViewSet,
	pub categories: CategoryViewSet,
	pub genres: GenreViewSet,
	pub titles: TitleViewSet,
	pub reviews: ReviewViewSet,
	pub comments: CommentViewSet,
}

impl AppState {
	pub fn new(
		pool: SqlitePool,
		secret_key: &[u8],
		from_email: String,
		mail: Arc<dyn EmailBackend>,
	) -> Self {
		let tokens = Arc::new(TokenService::new(secret_key));
		let users = UserRepository::new(pool.clone());

		Self {
			authenticator: Authenticator::new(users.clone(), Arc::clone(&tokens)),
			signup: SignupEndpoint::new(users.clone(), mail, from_email),
			token: TokenEndpoint::new(users.clone(), tokens),
			users: UserViewSet::new(users),
			categories: CategoryViewSet::new(CategoryRepository::new(pool.clone())),
			genres: GenreViewSet::new(GenreRepository::new(pool.clone())),
			titles: TitleViewSet::new(TitleRepository::new(pool.clone())),
			reviews: ReviewViewSet::new(ReviewRepository::new(pool.clone())),
			comments: CommentViewSet::new(CommentRepository::new(pool)),
		}
	}
}
