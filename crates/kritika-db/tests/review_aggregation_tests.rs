//! Reviews, comments, rating aggregation, and cascade rules.

use kritika_core::{ApiError, Role};
use kritika_db::{
	CommentRepository, NewTitle, NewUser, ReviewRepository, TitleRepository, UserRepository,
	connect_for_tests,
};
use sqlx::sqlite::SqlitePool;

struct Fixture {
	pool: SqlitePool,
	users: UserRepository,
	titles: TitleRepository,
	reviews: ReviewRepository,
	comments: CommentRepository,
}

async fn fixture() -> Fixture {
	let pool = connect_for_tests().await;
	Fixture {
		users: UserRepository::new(pool.clone()),
		titles: TitleRepository::new(pool.clone()),
		reviews: ReviewRepository::new(pool.clone()),
		comments: CommentRepository::new(pool.clone()),
		pool,
	}
}

impl Fixture {
	async fn seed_user(&self, name: &str) -> i64 {
		self.users
			.create(NewUser::signup(name, format!("{name}@example.com"), Role::User))
			.await
			.unwrap()
			.id
	}

	async fn seed_title(&self, name: &str) -> i64 {
		self.titles
			.create(NewTitle {
				name: name.into(),
				year: 2000,
				description: None,
				category: None,
				genres: Vec::new(),
			})
			.await
			.unwrap()
			.id
	}
}

#[tokio::test]
async fn rating_is_absent_without_reviews_and_exact_with_them() {
	let fx = fixture().await;
	let title_id = fx.seed_title("Solaris").await;

	assert_eq!(fx.reviews.rating(title_id).await.unwrap(), None);

	let alice = fx.seed_user("alice").await;
	let bob = fx.seed_user("bob").await;
	let carol = fx.seed_user("carol").await;
	fx.reviews.create(title_id, alice, "great", 10).await.unwrap();
	fx.reviews.create(title_id, bob, "fine", 7).await.unwrap();
	fx.reviews.create(title_id, carol, "meh", 4).await.unwrap();

	let rating = fx.reviews.rating(title_id).await.unwrap().unwrap();
	assert!((rating - 7.0).abs() < f64::EPSILON);

	// The title read carries the same value.
	let detail = fx.titles.retrieve(title_id).await.unwrap();
	assert_eq!(detail.rating, Some(rating));
}

#[tokio::test]
async fn rating_reflects_review_changes_immediately() {
	let fx = fixture().await;
	let title_id = fx.seed_title("Solaris").await;
	let alice = fx.seed_user("alice").await;
	let bob = fx.seed_user("bob").await;

	let review = fx.reviews.create(title_id, alice, "great", 10).await.unwrap();
	fx.reviews.create(title_id, bob, "fine", 6).await.unwrap();
	assert_eq!(fx.reviews.rating(title_id).await.unwrap(), Some(8.0));

	fx.reviews
		.update(title_id, review.id, None, Some(2))
		.await
		.unwrap();
	assert_eq!(fx.reviews.rating(title_id).await.unwrap(), Some(4.0));

	fx.reviews.delete(title_id, review.id).await.unwrap();
	assert_eq!(fx.reviews.rating(title_id).await.unwrap(), Some(6.0));
}

#[tokio::test]
async fn second_review_by_same_author_is_rejected() {
	let fx = fixture().await;
	let title_id = fx.seed_title("Solaris").await;
	let alice = fx.seed_user("alice").await;

	fx.reviews.create(title_id, alice, "first", 8).await.unwrap();
	let second = fx.reviews.create(title_id, alice, "second", 9).await;
	assert!(matches!(second, Err(ApiError::DuplicateReview)));

	// The same author may still review a different title.
	let other = fx.seed_title("Stalker").await;
	assert!(fx.reviews.create(other, alice, "also", 9).await.is_ok());
}

#[tokio::test]
async fn concurrent_duplicate_attempts_leave_exactly_one_review() {
	let fx = fixture().await;
	let title_id = fx.seed_title("Solaris").await;
	let alice = fx.seed_user("alice").await;

	let first = fx.reviews.create(title_id, alice, "racer a", 5);
	let second = fx.reviews.create(title_id, alice, "racer b", 6);
	let (a, b) = tokio::join!(first, second);

	assert!(a.is_ok() ^ b.is_ok(), "exactly one attempt must win");
	let stored = fx.reviews.list_for_title(title_id).await.unwrap();
	assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn review_update_is_partial_and_keeps_pub_date() {
	let fx = fixture().await;
	let title_id = fx.seed_title("Solaris").await;
	let alice = fx.seed_user("alice").await;
	let review = fx.reviews.create(title_id, alice, "original", 5).await.unwrap();

	let updated = fx
		.reviews
		.update(title_id, review.id, Some("revised"), None)
		.await
		.unwrap();

	assert_eq!(updated.text, "revised");
	assert_eq!(updated.score, 5);
	assert_eq!(updated.pub_date, review.pub_date);
	assert_eq!(updated.author, "alice");
}

#[tokio::test]
async fn comments_attach_to_reviews() {
	let fx = fixture().await;
	let title_id = fx.seed_title("Solaris").await;
	let alice = fx.seed_user("alice").await;
	let bob = fx.seed_user("bob").await;
	let review = fx.reviews.create(title_id, alice, "great", 9).await.unwrap();

	let comment = fx
		.comments
		.create(review.id, bob, "agreed")
		.await
		.unwrap();
	assert_eq!(comment.author, "bob");

	let listed = fx.comments.list_for_review(review.id).await.unwrap();
	assert_eq!(listed.len(), 1);

	let updated = fx
		.comments
		.update(review.id, comment.id, Some("strongly agreed"))
		.await
		.unwrap();
	assert_eq!(updated.text, "strongly agreed");

	fx.comments.delete(review.id, comment.id).await.unwrap();
	assert!(matches!(
		fx.comments.get(review.id, comment.id).await,
		Err(ApiError::NotFound(_))
	));
}

#[tokio::test]
async fn unknown_parents_report_not_found() {
	let fx = fixture().await;
	let alice = fx.seed_user("alice").await;

	assert!(matches!(
		fx.reviews.create(404, alice, "x", 5).await,
		Err(ApiError::NotFound(_))
	));
	assert!(matches!(
		fx.reviews.list_for_title(404).await,
		Err(ApiError::NotFound(_))
	));
	assert!(matches!(
		fx.comments.create(404, alice, "x").await,
		Err(ApiError::NotFound(_))
	));
	assert!(matches!(
		fx.comments.list_for_review(404).await,
		Err(ApiError::NotFound(_))
	));
}

#[tokio::test]
async fn deleting_title_cascades_to_reviews_and_comments() {
	let fx = fixture().await;
	let title_id = fx.seed_title("Solaris").await;
	let alice = fx.seed_user("alice").await;
	let bob = fx.seed_user("bob").await;
	let review = fx.reviews.create(title_id, alice, "great", 9).await.unwrap();
	fx.comments.create(review.id, bob, "agreed").await.unwrap();

	fx.titles.delete(title_id).await.unwrap();

	let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
		.fetch_one(&fx.pool)
		.await
		.unwrap();
	let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
		.fetch_one(&fx.pool)
		.await
		.unwrap();
	assert_eq!((reviews, comments), (0, 0));
}

#[tokio::test]
async fn deleting_review_cascades_to_comments_only() {
	let fx = fixture().await;
	let title_id = fx.seed_title("Solaris").await;
	let alice = fx.seed_user("alice").await;
	let bob = fx.seed_user("bob").await;
	let review = fx.reviews.create(title_id, alice, "great", 9).await.unwrap();
	fx.comments.create(review.id, bob, "agreed").await.unwrap();

	fx.reviews.delete(title_id, review.id).await.unwrap();

	let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
		.fetch_one(&fx.pool)
		.await
		.unwrap();
	assert_eq!(comments, 0);
	assert!(fx.titles.retrieve(title_id).await.is_ok());
}
