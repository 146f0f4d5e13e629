//! Catalog repositories: categories, genres, titles.
//!
//! Titles reference categories by nullable FK (deleting a category nulls the
//! reference) and genres through a join table (deleting a genre removes
//! memberships). A title's rating is averaged inside the read query so every
//! read reflects the review set at that instant.

use crate::conflict_on_unique;
use crate::models::{Category, Genre, Title, TitleDetail};
use kritika_core::{ApiError, Result};
use sqlx::sqlite::SqlitePool;
use sqlx::{FromRow, QueryBuilder, Sqlite};

#[derive(Debug, Clone)]
pub struct CategoryRepository {
	pool: SqlitePool,
}

impl CategoryRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub async fn create(&self, name: &str, slug: &str) -> Result<Category> {
		sqlx::query_as::<_, Category>(
			"INSERT INTO categories (name, slug) VALUES (?, ?) RETURNING id, name, slug",
		)
		.bind(name)
		.bind(slug)
		.fetch_one(&self.pool)
		.await
		.map_err(|e| conflict_on_unique(e, "a category with this slug already exists"))
	}

	pub async fn list(&self, search: Option<&str>) -> Result<Vec<Category>> {
		let rows = match search {
			Some(term) => {
				sqlx::query_as::<_, Category>(
					"SELECT id, name, slug FROM categories WHERE name LIKE ? ORDER BY slug",
				)
				.bind(format!("%{term}%"))
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories ORDER BY slug")
					.fetch_all(&self.pool)
					.await?
			}
		};
		Ok(rows)
	}

	/// Delete a category; dependent titles keep existing with a null
	/// category (schema: ON DELETE SET NULL).
	pub async fn delete_by_slug(&self, slug: &str) -> Result<()> {
		let result = sqlx::query("DELETE FROM categories WHERE slug = ?")
			.bind(slug)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(ApiError::not_found(format!("category {slug:?}")));
		}
		Ok(())
	}
}

#[derive(Debug, Clone)]
pub struct GenreRepository {
	pool: SqlitePool,
}

impl GenreRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub async fn create(&self, name: &str, slug: &str) -> Result<Genre> {
		sqlx::query_as::<_, Genre>(
			"INSERT INTO genres (name, slug) VALUES (?, ?) RETURNING id, name, slug",
		)
		.bind(name)
		.bind(slug)
		.fetch_one(&self.pool)
		.await
		.map_err(|e| conflict_on_unique(e, "a genre with this slug already exists"))
	}

	pub async fn list(&self, search: Option<&str>) -> Result<Vec<Genre>> {
		let rows = match search {
			Some(term) => {
				sqlx::query_as::<_, Genre>(
					"SELECT id, name, slug FROM genres WHERE name LIKE ? ORDER BY slug",
				)
				.bind(format!("%{term}%"))
				.fetch_all(&self.pool)
				.await?
			}
			None => {
				sqlx::query_as::<_, Genre>("SELECT id, name, slug FROM genres ORDER BY slug")
					.fetch_all(&self.pool)
					.await?
			}
		};
		Ok(rows)
	}

	/// Delete a genre; membership rows cascade away, titles survive.
	pub async fn delete_by_slug(&self, slug: &str) -> Result<()> {
		let result = sqlx::query("DELETE FROM genres WHERE slug = ?")
			.bind(slug)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(ApiError::not_found(format!("genre {slug:?}")));
		}
		Ok(())
	}
}

/// Fields for a new title; category and genres are referenced by slug.
#[derive(Debug, Clone)]
pub struct NewTitle {
	pub name: String,
	pub year: i32,
	pub description: Option<String>,
	pub category: Option<String>,
	pub genres: Vec<String>,
}

/// Partial title update; `None` fields stay untouched, `genres` replaces the
/// whole membership set when present.
#[derive(Debug, Clone, Default)]
pub struct TitlePatch {
	pub name: Option<String>,
	pub year: Option<i32>,
	pub description: Option<String>,
	pub category: Option<String>,
	pub genres: Option<Vec<String>>,
}

/// List filters, matching the public query surface: substring matches on
/// category slug, genre slug and name, exact year.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
	pub category: Option<String>,
	pub genre: Option<String>,
	pub name: Option<String>,
	pub year: Option<i32>,
}

/// Title row with the rating subquery attached.
#[derive(Debug, Clone, FromRow)]
struct TitleRow {
	id: i64,
	name: String,
	year: i32,
	description: Option<String>,
	category_id: Option<i64>,
	rating: Option<f64>,
}

const TITLE_SELECT: &str = "SELECT t.id, t.name, t.year, t.description, t.category_id, \
	 (SELECT AVG(r.score) FROM reviews r WHERE r.title_id = t.id) AS rating \
	 FROM titles t";

#[derive(Debug, Clone)]
pub struct TitleRepository {
	pool: SqlitePool,
}

impl TitleRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub async fn create(&self, new: NewTitle) -> Result<TitleDetail> {
		let mut tx = self.pool.begin().await?;

		let category_id = match &new.category {
			Some(slug) => Some(resolve_category(&mut tx, slug).await?),
			None => None,
		};

		let title = sqlx::query_as::<_, Title>(
			"INSERT INTO titles (name, year, description, category_id) VALUES (?, ?, ?, ?) \
			 RETURNING id, name, year, description, category_id",
		)
		.bind(&new.name)
		.bind(new.year)
		.bind(&new.description)
		.bind(category_id)
		.fetch_one(&mut *tx)
		.await?;

		for slug in &new.genres {
			let genre_id = resolve_genre(&mut tx, slug).await?;
			sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES (?, ?)")
				.bind(title.id)
				.bind(genre_id)
				.execute(&mut *tx)
				.await?;
		}

		tx.commit().await?;
		self.retrieve(title.id).await
	}

	pub async fn retrieve(&self, id: i64) -> Result<TitleDetail> {
		let sql = format!("{TITLE_SELECT} WHERE t.id = ?");
		let row = sqlx::query_as::<_, TitleRow>(&sql)
			.bind(id)
			.fetch_optional(&self.pool)
			.await?
			.ok_or_else(|| ApiError::not_found(format!("title #{id}")))?;
		self.hydrate(row).await
	}

	pub async fn list(&self, filter: &TitleFilter) -> Result<Vec<TitleDetail>> {
		let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(TITLE_SELECT);
		qb.push(" WHERE 1 = 1");

		if let Some(category) = &filter.category {
			qb.push(
				" AND t.category_id IN (SELECT c.id FROM categories c WHERE c.slug LIKE ",
			);
			qb.push_bind(format!("%{category}%"));
			qb.push(")");
		}
		if let Some(genre) = &filter.genre {
			qb.push(
				" AND EXISTS (SELECT 1 FROM title_genres tg JOIN genres g ON g.id = tg.genre_id \
				 WHERE tg.title_id = t.id AND g.slug LIKE ",
			);
			qb.push_bind(format!("%{genre}%"));
			qb.push(")");
		}
		if let Some(name) = &filter.name {
			qb.push(" AND t.name LIKE ");
			qb.push_bind(format!("%{name}%"));
		}
		if let Some(year) = filter.year {
			qb.push(" AND t.year = ");
			qb.push_bind(year);
		}
		qb.push(" ORDER BY t.id");

		let rows = qb.build_query_as::<TitleRow>().fetch_all(&self.pool).await?;
		let mut details = Vec::with_capacity(rows.len());
		for row in rows {
			details.push(self.hydrate(row).await?);
		}
		Ok(details)
	}

	pub async fn update(&self, id: i64, patch: TitlePatch) -> Result<TitleDetail> {
		let mut tx = self.pool.begin().await?;

		let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM titles WHERE id = ?")
			.bind(id)
			.fetch_optional(&mut *tx)
			.await?;
		if existing.is_none() {
			return Err(ApiError::not_found(format!("title #{id}")));
		}

		let category_id = match &patch.category {
			Some(slug) => Some(resolve_category(&mut tx, slug).await?),
			None => None,
		};

		sqlx::query(
			"UPDATE titles SET \
			 name = COALESCE(?, name), \
			 year = COALESCE(?, year), \
			 description = COALESCE(?, description), \
			 category_id = COALESCE(?, category_id) \
			 WHERE id = ?",
		)
		.bind(&patch.name)
		.bind(patch.year)
		.bind(&patch.description)
		.bind(category_id)
		.bind(id)
		.execute(&mut *tx)
		.await?;

		if let Some(genres) = &patch.genres {
			sqlx::query("DELETE FROM title_genres WHERE title_id = ?")
				.bind(id)
				.execute(&mut *tx)
				.await?;
			for slug in genres {
				let genre_id = resolve_genre(&mut tx, slug).await?;
				sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES (?, ?)")
					.bind(id)
					.bind(genre_id)
					.execute(&mut *tx)
					.await?;
			}
		}

		tx.commit().await?;
		self.retrieve(id).await
	}

	/// Delete a title; its reviews and their comments cascade away.
	pub async fn delete(&self, id: i64) -> Result<()> {
		let result = sqlx::query("DELETE FROM titles WHERE id = ?")
			.bind(id)
			.execute(&self.pool)
			.await?;
		if result.rows_affected() == 0 {
			return Err(ApiError::not_found(format!("title #{id}")));
		}
		Ok(())
	}

	async fn hydrate(&self, row: TitleRow) -> Result<TitleDetail> {
		let category = match row.category_id {
			Some(category_id) => {
				sqlx::query_as::<_, Category>(
					"SELECT id, name, slug FROM categories WHERE id = ?",
				)
				.bind(category_id)
				.fetch_optional(&self.pool)
				.await?
			}
			None => None,
		};

		let genres = sqlx::query_as::<_, Genre>(
			"SELECT g.id, g.name, g.slug FROM genres g \
			 JOIN title_genres tg ON tg.genre_id = g.id \
			 WHERE tg.title_id = ? ORDER BY g.slug",
		)
		.bind(row.id)
		.fetch_all(&self.pool)
		.await?;

		Ok(TitleDetail {
			id: row.id,
			name: row.name,
			year: row.year,
			description: row.description,
			rating: row.rating,
			category,
			genres,
		})
	}
}

async fn resolve_category(
	tx: &mut sqlx::Transaction<'_, Sqlite>,
	slug: &str,
) -> Result<i64> {
	sqlx::query_scalar::<_, i64>("SELECT id FROM categories WHERE slug = ?")
		.bind(slug)
		.fetch_optional(&mut **tx)
		.await?
		.ok_or_else(|| ApiError::bad_request(format!("unknown category slug {slug:?}")))
}

async fn resolve_genre(tx: &mut sqlx::Transaction<'_, Sqlite>, slug: &str) -> Result<i64> {
	sqlx::query_scalar::<_, i64>("SELECT id FROM genres WHERE slug = ?")
		.bind(slug)
		.fetch_optional(&mut **tx)
		.await?
		.ok_or_else(|| ApiError::bad_request(format!("unknown genre slug {slug:?}")))
}
