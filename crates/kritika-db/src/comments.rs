//! Comment repository.

use crate::models::Comment;
use chrono::Utc;
use kritika_core::{ApiError, Result};
use sqlx::sqlite::SqlitePool;

const COMMENT_SELECT: &str = "SELECT c.id, c.review_id, c.author_id, u.username AS author, \
	 c.text, c.pub_date \
	 FROM comments c JOIN users u ON u.id = c.author_id";

#[derive(Debug, Clone)]
pub struct CommentRepository {
	pool: SqlitePool,
}

impl CommentRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub async fn create(&self, review_id: i64, author_id: i64, text: &str) -> Result<Comment> {
		self.ensure_review(review_id).await?;

		let id: i64 = sqlx::query_scalar(
			"INSERT INTO comments (review_id, author_id, text, pub_date) VALUES (?, ?, ?, ?) \
			 RETURNING id",
		)
		.bind(review_id)
		.bind(author_id)
		.bind(text)
		.bind(Utc::now())
		.fetch_one(&self.pool)
		.await?;

		self.get(review_id, id).await
	}

	pub async fn list_for_review(&self, review_id: i64) -> Result<Vec<Comment>> {
		self.ensure_review(review_id).await?;
		let sql = format!("{COMMENT_SELECT} WHERE c.review_id = ? ORDER BY c.id");
		let comments = sqlx::query_as::<_, Comment>(&sql)
			.bind(review_id)
			.fetch_all(&self.pool)
			.await?;
		Ok(comments)
	}

	pub async fn get(&self, review_id: i64, comment_id: i64) -> Result<Comment> {
		let sql = format!("{COMMENT_SELECT} WHERE c.review_id = ? AND c.id = ?");
		sqlx::query_as::<_, Comment>(&sql)
			.bind(review_id)
			.bind(comment_id)
			.fetch_optional(&self.pool)
			.await?
			.ok_or_else(|| ApiError::not_found(format!("comment #{comment_id}")))
	}

	pub async fn update(
		&self,
		review_id: i64,
		comment_id: i64,
		text: Option<&str>,
	) -> Result<Comment> {
		let current = self.get(review_id, comment_id).await?;
		sqlx::query("UPDATE comments SET text = COALESCE(?, text) WHERE id = ?")
			.bind(text)
			.bind(current.id)
			.execute(&self.pool)
			.await?;
		self.get(review_id, comment_id).await
	}

	pub async fn delete(&self, review_id: i64, comment_id: i64) -> Result<()> {
		let result = sqlx::query("DELETE FROM comments WHERE review_id = ? AND id = ?")
			.bind(review_id)
			.bind(comment_id)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(ApiError::not_found(format!("comment #{comment_id}")));
		}
		Ok(())
	}

	async fn ensure_review(&self, review_id: i64) -> Result<()> {
		let found: Option<i64> = sqlx::query_scalar("SELECT id FROM reviews WHERE id = ?")
			.bind(review_id)
			.fetch_optional(&self.pool)
			.await?;
		if found.is_none() {
			return Err(ApiError::not_found(format!("review #{review_id}")));
		}
		Ok(())
	}
}
