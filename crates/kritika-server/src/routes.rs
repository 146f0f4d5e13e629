//! URL table for `/api/v1/`, mirroring the nested router layout:
//! auth endpoints, users (with the reserved `me` segment), the catalog, and
//! reviews/comments nested under titles.

/// A resolved route; path parameters are extracted, verbs are not yet
/// checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
	Signup,
	Token,
	Users,
	UserMe,
	UserDetail(String),
	Categories,
	CategoryDetail(String),
	Genres,
	GenreDetail(String),
	Titles,
	TitleDetail(i64),
	Reviews(i64),
	ReviewDetail(i64, i64),
	Comments(i64, i64),
	CommentDetail(i64, i64, i64),
}

/// Resolve a path (query string already stripped) to a route.
pub fn resolve(path: &str) -> Option<Route> {
	let rest = path.strip_prefix("/api/v1")?;
	let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

	match segments.as_slice() {
		["auth", "signup"] => Some(Route::Signup),
		["auth", "token"] => Some(Route::Token),
		["users"] => Some(Route::Users),
		["users", "me"] => Some(Route::UserMe),
		["users", username] => Some(Route::UserDetail((*username).to_string())),
		["categories"] => Some(Route::Categories),
		["categories", slug] => Some(Route::CategoryDetail((*slug).to_string())),
		["genres"] => Some(Route::Genres),
		["genres", slug] => Some(Route::GenreDetail((*slug).to_string())),
		["titles"] => Some(Route::Titles),
		["titles", title_id] => Some(Route::TitleDetail(title_id.parse().ok()?)),
		["titles", title_id, "reviews"] => Some(Route::Reviews(title_id.parse().ok()?)),
		["titles", title_id, "reviews", review_id] => Some(Route::ReviewDetail(
			title_id.parse().ok()?,
			review_id.parse().ok()?,
		)),
		["titles", title_id, "reviews", review_id, "comments"] => Some(Route::Comments(
			title_id.parse().ok()?,
			review_id.parse().ok()?,
		)),
		["titles", title_id, "reviews", review_id, "comments", comment_id] => {
			Some(Route::CommentDetail(
				title_id.parse().ok()?,
				review_id.parse().ok()?,
				comment_id.parse().ok()?,
			))
		}
		_ => None,
	}
}
