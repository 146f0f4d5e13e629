//! Catalog, review and comment endpoint tests: permission policies in front
//! of real repositories.

use kritika_core::{ApiError, Caller, Role};
use kritika_db::{
	CategoryRepository, CommentRepository, GenreRepository, NewUser, ReviewRepository,
	TitleRepository, User, UserRepository, connect_for_tests,
};
use kritika_rest::serializers::{
	CommentIn, CommentPatchRequest, ReviewIn, ReviewPatchRequest, SlugItemIn, TitleIn,
	TitlePatchRequest, TitleQuery,
};
use kritika_rest::{CategoryViewSet, CommentViewSet, GenreViewSet, ReviewViewSet, TitleViewSet};

struct Env {
	users: UserRepository,
	categories: CategoryViewSet,
	genres: GenreViewSet,
	titles: TitleViewSet,
	reviews: ReviewViewSet,
	comments: CommentViewSet,
}

async fn env() -> Env {
	let pool = connect_for_tests().await;
	Env {
		users: UserRepository::new(pool.clone()),
		categories: CategoryViewSet::new(CategoryRepository::new(pool.clone())),
		genres: GenreViewSet::new(GenreRepository::new(pool.clone())),
		titles: TitleViewSet::new(TitleRepository::new(pool.clone())),
		reviews: ReviewViewSet::new(ReviewRepository::new(pool.clone())),
		comments: CommentViewSet::new(CommentRepository::new(pool)),
	}
}

impl Env {
	async fn seed_user(&self, username: &str, role: Role) -> User {
		self.users
			.create(NewUser::signup(
				username,
				format!("{username}@example.com"),
				role,
			))
			.await
			.unwrap()
	}

	async fn seed_title(&self, admin: &Caller, name: &str) -> i64 {
		self.titles
			.create(
				admin,
				TitleIn {
					name: name.into(),
					year: 1999,
					description: None,
					category: None,
					genre: Vec::new(),
				},
			)
			.await
			.unwrap()
			.id
	}
}

fn caller_of(user: &User) -> Caller {
	Caller::User(user.auth_user())
}

fn slug_item(name: &str, slug: &str) -> SlugItemIn {
	SlugItemIn {
		name: name.into(),
		slug: slug.into(),
	}
}

// =============================================================================
// Catalog: admin-gated writes, public reads
// =============================================================================

#[tokio::test]
async fn catalog_writes_are_admin_gated() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	let plain = caller_of(&env.seed_user("plain", Role::User).await);
	let moderator = caller_of(&env.seed_user("mod", Role::Moderator).await);

	assert!(env.categories.create(&admin, slug_item("Films", "films")).await.is_ok());

	assert!(matches!(
		env.categories.create(&plain, slug_item("X", "x")).await,
		Err(ApiError::Forbidden)
	));
	// Moderators may police content but not reshape the catalog.
	assert!(matches!(
		env.genres.create(&moderator, slug_item("X", "x")).await,
		Err(ApiError::Forbidden)
	));
	assert!(matches!(
		env.categories
			.create(&Caller::Anonymous, slug_item("X", "x"))
			.await,
		Err(ApiError::Unauthorized)
	));
}

#[tokio::test]
async fn catalog_reads_are_public() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	env.categories
		.create(&admin, slug_item("Films", "films"))
		.await
		.unwrap();
	env.genres
		.create(&admin, slug_item("Drama", "drama"))
		.await
		.unwrap();

	let categories = env.categories.list(&Caller::Anonymous, None).await.unwrap();
	assert_eq!(categories.len(), 1);
	let genres = env.genres.list(&Caller::Anonymous, None).await.unwrap();
	assert_eq!(genres[0].slug, "drama");
}

#[tokio::test]
async fn title_lifecycle_with_catalog_references() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	env.categories
		.create(&admin, slug_item("Films", "films"))
		.await
		.unwrap();
	env.genres
		.create(&admin, slug_item("Drama", "drama"))
		.await
		.unwrap();

	let title = env
		.titles
		.create(
			&admin,
			TitleIn {
				name: "Solaris".into(),
				year: 1972,
				description: Some("Tarkovsky".into()),
				category: Some("films".into()),
				genre: vec!["drama".into()],
			},
		)
		.await
		.unwrap();
	assert_eq!(title.category.as_ref().unwrap().slug, "films");
	assert_eq!(title.rating, None);

	// Anonymous retrieve sees the same shape.
	let seen = env
		.titles
		.retrieve(&Caller::Anonymous, title.id)
		.await
		.unwrap();
	assert_eq!(seen.genre.len(), 1);

	// Partial update through PATCH; PUT-style full replace is refused.
	let patched = env
		.titles
		.update(
			&admin,
			title.id,
			TitlePatchRequest {
				name: Some("Solaris (1972)".into()),
				..TitlePatchRequest::default()
			},
			true,
		)
		.await
		.unwrap();
	assert_eq!(patched.name, "Solaris (1972)");
	assert_eq!(patched.year, 1972);

	assert!(matches!(
		env.titles
			.update(&admin, title.id, TitlePatchRequest::default(), false)
			.await,
		Err(ApiError::MethodNotAllowed)
	));
}

#[tokio::test]
async fn title_with_future_year_is_rejected() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);

	let result = env
		.titles
		.create(
			&admin,
			TitleIn {
				name: "Unreleased".into(),
				year: 3000,
				description: None,
				category: None,
				genre: Vec::new(),
			},
		)
		.await;
	assert!(matches!(result, Err(ApiError::BadRequest(_))));
}

#[tokio::test]
async fn title_list_filters_by_query() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	env.seed_title(&admin, "Solaris").await;
	env.seed_title(&admin, "Stalker").await;

	let all = env
		.titles
		.list(&Caller::Anonymous, TitleQuery::default())
		.await
		.unwrap();
	assert_eq!(all.len(), 2);

	let filtered = env
		.titles
		.list(
			&Caller::Anonymous,
			TitleQuery {
				name: Some("Sol".into()),
				..TitleQuery::default()
			},
		)
		.await
		.unwrap();
	assert_eq!(filtered.len(), 1);
	assert_eq!(filtered[0].name, "Solaris");
}

// =============================================================================
// Reviews: Policy A plus the uniqueness rule
// =============================================================================

#[tokio::test]
async fn review_create_stamps_author_and_enforces_uniqueness() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	let alice = caller_of(&env.seed_user("alice", Role::User).await);
	let title_id = env.seed_title(&admin, "Solaris").await;

	let review = env
		.reviews
		.create(
			&alice,
			title_id,
			ReviewIn {
				text: "a masterpiece".into(),
				score: 10,
			},
		)
		.await
		.unwrap();
	assert_eq!(review.author, "alice");
	assert_eq!(review.title, title_id);

	let second = env
		.reviews
		.create(
			&alice,
			title_id,
			ReviewIn {
				text: "changed my mind".into(),
				score: 3,
			},
		)
		.await;
	assert!(matches!(second, Err(ApiError::DuplicateReview)));
}

#[tokio::test]
async fn anonymous_may_read_reviews_but_not_write() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	let alice = caller_of(&env.seed_user("alice", Role::User).await);
	let title_id = env.seed_title(&admin, "Solaris").await;
	env.reviews
		.create(&alice, title_id, ReviewIn { text: "good".into(), score: 8 })
		.await
		.unwrap();

	let listed = env.reviews.list(&Caller::Anonymous, title_id).await.unwrap();
	assert_eq!(listed.len(), 1);

	let denied = env
		.reviews
		.create(
			&Caller::Anonymous,
			title_id,
			ReviewIn { text: "anon".into(), score: 5 },
		)
		.await;
	assert!(matches!(denied, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn review_score_bounds_are_validated() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	let alice = caller_of(&env.seed_user("alice", Role::User).await);
	let title_id = env.seed_title(&admin, "Solaris").await;

	for score in [0, 11] {
		let result = env
			.reviews
			.create(&alice, title_id, ReviewIn { text: "x".into(), score })
			.await;
		assert!(matches!(result, Err(ApiError::BadRequest(_))));
	}
}

#[tokio::test]
async fn review_moderation_rules() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	let alice = caller_of(&env.seed_user("alice", Role::User).await);
	let stranger = caller_of(&env.seed_user("stranger", Role::User).await);
	let moderator = caller_of(&env.seed_user("mod", Role::Moderator).await);
	let title_id = env.seed_title(&admin, "Solaris").await;

	let review = env
		.reviews
		.create(&alice, title_id, ReviewIn { text: "good".into(), score: 8 })
		.await
		.unwrap();

	// A non-author, non-moderator caller may not edit or delete.
	assert!(matches!(
		env.reviews
			.update(
				&stranger,
				title_id,
				review.id,
				ReviewPatchRequest { text: Some("hijack".into()), ..ReviewPatchRequest::default() },
				true,
			)
			.await,
		Err(ApiError::Forbidden)
	));
	assert!(matches!(
		env.reviews.destroy(&stranger, title_id, review.id).await,
		Err(ApiError::Forbidden)
	));

	// The author may edit, partially.
	let edited = env
		.reviews
		.update(
			&alice,
			title_id,
			review.id,
			ReviewPatchRequest { score: Some(9), ..ReviewPatchRequest::default() },
			true,
		)
		.await
		.unwrap();
	assert_eq!(edited.score, 9);
	assert_eq!(edited.text, "good");

	// Full replace is refused before any permission or lookup work.
	assert!(matches!(
		env.reviews
			.update(&alice, title_id, review.id, ReviewPatchRequest::default(), false)
			.await,
		Err(ApiError::MethodNotAllowed)
	));

	// A moderator may delete someone else's review.
	env.reviews
		.destroy(&moderator, title_id, review.id)
		.await
		.unwrap();
	assert!(matches!(
		env.reviews.retrieve(&Caller::Anonymous, title_id, review.id).await,
		Err(ApiError::NotFound(_))
	));
}

#[tokio::test]
async fn rating_tracks_review_set_on_title_reads() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	let alice = caller_of(&env.seed_user("alice", Role::User).await);
	let bob = caller_of(&env.seed_user("bob", Role::User).await);
	let title_id = env.seed_title(&admin, "Solaris").await;

	env.reviews
		.create(&alice, title_id, ReviewIn { text: "great".into(), score: 10 })
		.await
		.unwrap();
	env.reviews
		.create(&bob, title_id, ReviewIn { text: "fine".into(), score: 5 })
		.await
		.unwrap();

	let seen = env
		.titles
		.retrieve(&Caller::Anonymous, title_id)
		.await
		.unwrap();
	assert_eq!(seen.rating, Some(7.5));
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
async fn comment_lifecycle_under_a_review() {
	let env = env().await;
	let admin = caller_of(&env.seed_user("admin", Role::Admin).await);
	let alice = caller_of(&env.seed_user("alice", Role::User).await);
	let bob = caller_of(&env.seed_user("bob", Role::User).await);
	let title_id = env.seed_title(&admin, "Solaris").await;
	let review = env
		.reviews
		.create(&alice, title_id, ReviewIn { text: "great".into(), score: 10 })
		.await
		.unwrap();

	let comment = env
		.comments
		.create(&bob, review.id, CommentIn { text: "agreed".into() })
		.await
		.unwrap();
	assert_eq!(comment.author, "bob");

	// No uniqueness rule for comments.
	env.comments
		.create(&bob, review.id, CommentIn { text: "more thoughts".into() })
		.await
		.unwrap();
	assert_eq!(
		env.comments.list(&Caller::Anonymous, review.id).await.unwrap().len(),
		2
	);

	// Author edits; stranger cannot.
	let edited = env
		.comments
		.update(
			&bob,
			review.id,
			comment.id,
			CommentPatchRequest { text: Some("agreed strongly".into()) },
			true,
		)
		.await
		.unwrap();
	assert_eq!(edited.text, "agreed strongly");

	assert!(matches!(
		env.comments
			.update(
				&alice,
				review.id,
				comment.id,
				CommentPatchRequest { text: Some("hijack".into()) },
				false,
			)
			.await,
		Err(ApiError::MethodNotAllowed)
	));
	assert!(matches!(
		env.comments
			.update(
				&alice,
				review.id,
				comment.id,
				CommentPatchRequest { text: Some("hijack".into()) },
				true,
			)
			.await,
		Err(ApiError::Forbidden)
	));

	env.comments.destroy(&bob, review.id, comment.id).await.unwrap();
}

#[tokio::test]
async fn comment_on_missing_review_is_not_found() {
	let env = env().await;
	let alice = caller_of(&env.seed_user("alice", Role::User).await);

	let result = env
		.comments
		.create(&alice, 404, CommentIn { text: "into the void".into() })
		.await;
	assert!(matches!(result, Err(ApiError::NotFound(_))));
}
