//! Review repository.
//!
//! The one-review-per-(title, author) invariant is enforced by the schema's
//! unique constraint; creation is a single conflict-aware insert, never a
//! read followed by a write.

use crate::models::Review;
use kritika_core::{ApiError, Result};
use chrono::Utc;
use sqlx::sqlite::SqlitePool;

const REVIEW_SELECT: &str = "SELECT r.id, r.title_id, r.author_id, u.username AS author, \
	 r.text, r.score, r.pub_date \
	 FROM reviews r JOIN users u ON u.id = r.author_id";

#[derive(Debug, Clone)]
pub struct ReviewRepository {
	pool: SqlitePool,
}

impl ReviewRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a review for (title, author).
	///
	/// The insert races safely: whichever concurrent attempt loses the
	/// unique constraint gets `DuplicateReview`.
	pub async fn create(
		&self,
		title_id: i64,
		author_id: i64,
		text: &str,
		score: i64,
	) -> Result<Review> {
		self.ensure_title(title_id).await?;

		let inserted: Option<i64> = sqlx::query_scalar(
			"INSERT INTO reviews (title_id, author_id, text, score, pub_date) \
			 VALUES (?, ?, ?, ?, ?) \
			 ON CONFLICT (title_id, author_id) DO NOTHING \
			 RETURNING id",
		)
		.bind(title_id)
		.bind(author_id)
		.bind(text)
		.bind(score)
		.bind(Utc::now())
		.fetch_optional(&self.pool)
		.await?;

		match inserted {
			Some(id) => self.get(title_id, id).await,
			None => Err(ApiError::DuplicateReview),
		}
	}

	pub async fn list_for_title(&self, title_id: i64) -> Result<Vec<Review>> {
		self.ensure_title(title_id).await?;
		let sql = format!("{REVIEW_SELECT} WHERE r.title_id = ? ORDER BY r.id");
		let reviews = sqlx::query_as::<_, Review>(&sql)
			.bind(title_id)
			.fetch_all(&self.pool)
			.await?;
		Ok(reviews)
	}

	pub async fn get(&self, title_id: i64, review_id: i64) -> Result<Review> {
		let sql = format!("{REVIEW_SELECT} WHERE r.title_id = ? AND r.id = ?");
		sqlx::query_as::<_, Review>(&sql)
			.bind(title_id)
			.bind(review_id)
			.fetch_optional(&self.pool)
			.await?
			.ok_or_else(|| ApiError::not_found(format!("review #{review_id}")))
	}

	/// Partial update; `pub_date` is immutable by omission.
	pub async fn update(
		&self,
		title_id: i64,
		review_id: i64,
		text: Option<&str>,
		score: Option<i64>,
	) -> Result<Review> {
		let current = self.get(title_id, review_id).await?;
		sqlx::query(
			"UPDATE reviews SET text = COALESCE(?, text), score = COALESCE(?, score) WHERE id = ?",
		)
		.bind(text)
		.bind(score)
		.bind(current.id)
		.execute(&self.pool)
		.await?;
		self.get(title_id, review_id).await
	}

	/// Delete a review; its comments cascade away.
	pub async fn delete(&self, title_id: i64, review_id: i64) -> Result<()> {
		let result = sqlx::query("DELETE FROM reviews WHERE title_id = ? AND id = ?")
			.bind(title_id)
			.bind(review_id)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(ApiError::not_found(format!("review #{review_id}")));
		}
		Ok(())
	}

	/// Mean score across a title's reviews; `None` when it has none.
	pub async fn rating(&self, title_id: i64) -> Result<Option<f64>> {
		let rating: Option<f64> =
			sqlx::query_scalar("SELECT AVG(score) FROM reviews WHERE title_id = ?")
				.bind(title_id)
				.fetch_one(&self.pool)
				.await?;
		Ok(rating)
	}

	async fn ensure_title(&self, title_id: i64) -> Result<()> {
		let found: Option<i64> = sqlx::query_scalar("SELECT id FROM titles WHERE id = ?")
			.bind(title_id)
			.fetch_optional(&self.pool)
			.await?;
		if found.is_none() {
			return Err(ApiError::not_found(format!("title #{title_id}")));
		}
		Ok(())
	}
}
