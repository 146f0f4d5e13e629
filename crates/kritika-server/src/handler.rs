//! Request dispatch: verb + route → endpoint call, `ApiError` → status.

use crate::routes::{Route, resolve};
use crate::state::AppState;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode, header};
use kritika_core::{ApiError, Caller};
use kritika_rest::serializers::{
	CommentIn, CommentPatchRequest, ReviewIn, ReviewPatchRequest, SignupRequest, SlugItemIn,
	TitleIn, TitlePatchRequest, TitleQuery, TokenRequest, UserCreate, UserPatchRequest,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
	search: Option<String>,
}

/// hyper entry point: collect the body, dispatch, assemble the response.
pub async fn handle(state: &AppState, request: Request<Incoming>) -> Response<Full<Bytes>> {
	let method = request.method().clone();
	let path = request.uri().path().to_string();
	let query = request.uri().query().unwrap_or("").to_string();
	let bearer = bearer_token(&request);

	let body = match request.into_body().collect().await {
		Ok(collected) => collected.to_bytes(),
		Err(error) => {
			tracing::warn!(%error, "failed to read request body");
			Bytes::new()
		}
	};

	let (status, value) = dispatch(state, &method, &path, &query, bearer.as_deref(), &body).await;
	tracing::info!(%method, %path, status = status.as_u16(), "request");

	let mut builder = Response::builder().status(status);
	if status == StatusCode::NO_CONTENT {
		return builder.body(Full::new(Bytes::new())).expect("valid response");
	}
	builder = builder.header(header::CONTENT_TYPE, "application/json");
	let payload = serde_json::to_vec(&value).unwrap_or_else(|_| b"{}".to_vec());
	builder
		.body(Full::new(Bytes::from(payload)))
		.expect("valid response")
}

fn bearer_token(request: &Request<Incoming>) -> Option<String> {
	let header = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
	header
		.strip_prefix("Bearer ")
		.map(|token| token.trim().to_string())
}

/// Testable core of the front end: everything after HTTP parsing.
pub async fn dispatch(
	state: &AppState,
	method: &Method,
	path: &str,
	query: &str,
	bearer: Option<&str>,
	body: &[u8],
) -> (StatusCode, Value) {
	match route_request(state, method, path, query, bearer, body).await {
		Ok((status, value)) => (status, value),
		Err(error) => (status_of(&error), json!({ "detail": error.to_string() })),
	}
}

/// HTTP status for each error class.
pub fn status_of(error: &ApiError) -> StatusCode {
	match error {
		ApiError::BadRequest(_) | ApiError::InvalidCode | ApiError::DuplicateReview => {
			StatusCode::BAD_REQUEST
		}
		ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
		ApiError::Forbidden => StatusCode::FORBIDDEN,
		ApiError::NotFound(_) => StatusCode::NOT_FOUND,
		ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
		ApiError::Conflict(_) => StatusCode::CONFLICT,
		ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
	// An empty body is a valid empty JSON object; partial updates allow it.
	let body = if body.is_empty() { b"{}".as_slice() } else { body };
	serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))
}

fn parse_query<T: DeserializeOwned + Default>(query: &str) -> Result<T, ApiError> {
	if query.is_empty() {
		return Ok(T::default());
	}
	serde_urlencoded::from_str(query)
		.map_err(|e| ApiError::bad_request(format!("invalid query string: {e}")))
}

fn ok<T: serde::Serialize>(status: StatusCode, value: T) -> Result<(StatusCode, Value), ApiError> {
	let value = serde_json::to_value(value)
		.map_err(|e| ApiError::Internal(format!("response serialization failed: {e}")))?;
	Ok((status, value))
}

fn no_content() -> Result<(StatusCode, Value), ApiError> {
	Ok((StatusCode::NO_CONTENT, Value::Null))
}

async fn route_request(
	state: &AppState,
	method: &Method,
	path: &str,
	query: &str,
	bearer: Option<&str>,
	body: &[u8],
) -> Result<(StatusCode, Value), ApiError> {
	let route = resolve(path).ok_or_else(|| ApiError::not_found(format!("no route for {path}")))?;
	let caller: Caller = state.authenticator.resolve(bearer).await?;

	match route {
		Route::Signup => match method {
			&Method::POST => {
				let payload: SignupRequest = parse_json(body)?;
				ok(StatusCode::OK, state.signup.post(payload).await?)
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::Token => match method {
			&Method::POST => {
				let payload: TokenRequest = parse_json(body)?;
				ok(StatusCode::OK, state.token.post(payload).await?)
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::Users => match method {
			&Method::GET => {
				let search: SearchQuery = parse_query(query)?;
				ok(
					StatusCode::OK,
					state.users.list(&caller, search.search.as_deref()).await?,
				)
			}
			&Method::POST => {
				let payload: UserCreate = parse_json(body)?;
				ok(StatusCode::CREATED, state.users.create(&caller, payload).await?)
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::UserMe => match method {
			&Method::GET => ok(StatusCode::OK, state.users.me_retrieve(&caller).await?),
			// POST is accepted as an alias for PATCH on the profile.
			&Method::PATCH | &Method::POST => {
				let payload: UserPatchRequest = parse_json(body)?;
				ok(StatusCode::OK, state.users.me_update(&caller, payload, true).await?)
			}
			&Method::PUT => {
				let payload: UserPatchRequest = parse_json(body)?;
				ok(StatusCode::OK, state.users.me_update(&caller, payload, false).await?)
			}
			&Method::DELETE => {
				state.users.me_destroy(&caller)?;
				no_content()
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::UserDetail(username) => match method {
			&Method::GET => ok(StatusCode::OK, state.users.retrieve(&caller, &username).await?),
			&Method::PATCH => {
				let payload: UserPatchRequest = parse_json(body)?;
				ok(
					StatusCode::OK,
					state.users.update(&caller, &username, payload, true).await?,
				)
			}
			&Method::PUT => {
				let payload: UserPatchRequest = parse_json(body)?;
				ok(
					StatusCode::OK,
					state.users.update(&caller, &username, payload, false).await?,
				)
			}
			&Method::DELETE => {
				state.users.destroy(&caller, &username).await?;
				no_content()
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::Categories => match method {
			&Method::GET => {
				let search: SearchQuery = parse_query(query)?;
				ok(
					StatusCode::OK,
					state
						.categories
						.list(&caller, search.search.as_deref())
						.await?,
				)
			}
			&Method::POST => {
				let payload: SlugItemIn = parse_json(body)?;
				ok(
					StatusCode::CREATED,
					state.categories.create(&caller, payload).await?,
				)
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::CategoryDetail(slug) => match method {
			&Method::DELETE => {
				state.categories.destroy(&caller, &slug).await?;
				no_content()
			}
			// No retrieve/update on catalog items.
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::Genres => match method {
			&Method::GET => {
				let search: SearchQuery = parse_query(query)?;
				ok(
					StatusCode::OK,
					state.genres.list(&caller, search.search.as_deref()).await?,
				)
			}
			&Method::POST => {
				let payload: SlugItemIn = parse_json(body)?;
				ok(StatusCode::CREATED, state.genres.create(&caller, payload).await?)
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::GenreDetail(slug) => match method {
			&Method::DELETE => {
				state.genres.destroy(&caller, &slug).await?;
				no_content()
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::Titles => match method {
			&Method::GET => {
				let filter: TitleQuery = parse_query(query)?;
				ok(StatusCode::OK, state.titles.list(&caller, filter).await?)
			}
			&Method::POST => {
				let payload: TitleIn = parse_json(body)?;
				ok(StatusCode::CREATED, state.titles.create(&caller, payload).await?)
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::TitleDetail(title_id) => match method {
			&Method::GET => ok(StatusCode::OK, state.titles.retrieve(&caller, title_id).await?),
			&Method::PATCH => {
				let payload: TitlePatchRequest = parse_json(body)?;
				ok(
					StatusCode::OK,
					state.titles.update(&caller, title_id, payload, true).await?,
				)
			}
			&Method::PUT => {
				let payload: TitlePatchRequest = parse_json(body)?;
				ok(
					StatusCode::OK,
					state.titles.update(&caller, title_id, payload, false).await?,
				)
			}
			&Method::DELETE => {
				state.titles.destroy(&caller, title_id).await?;
				no_content()
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::Reviews(title_id) => match method {
			&Method::GET => ok(StatusCode::OK, state.reviews.list(&caller, title_id).await?),
			&Method::POST => {
				let payload: ReviewIn = parse_json(body)?;
				ok(
					StatusCode::CREATED,
					state.reviews.create(&caller, title_id, payload).await?,
				)
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::ReviewDetail(title_id, review_id) => match method {
			&Method::GET => ok(
				StatusCode::OK,
				state.reviews.retrieve(&caller, title_id, review_id).await?,
			),
			&Method::PATCH => {
				let payload: ReviewPatchRequest = parse_json(body)?;
				ok(
					StatusCode::OK,
					state
						.reviews
						.update(&caller, title_id, review_id, payload, true)
						.await?,
				)
			}
			&Method::PUT => {
				let payload: ReviewPatchRequest = parse_json(body)?;
				ok(
					StatusCode::OK,
					state
						.reviews
						.update(&caller, title_id, review_id, payload, false)
						.await?,
				)
			}
			&Method::DELETE => {
				state.reviews.destroy(&caller, title_id, review_id).await?;
				no_content()
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::Comments(_title_id, review_id) => match method {
			&Method::GET => ok(StatusCode::OK, state.comments.list(&caller, review_id).await?),
			&Method::POST => {
				let payload: CommentIn = parse_json(body)?;
				ok(
					StatusCode::CREATED,
					state.comments.create(&caller, review_id, payload).await?,
				)
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
		Route::CommentDetail(_title_id, review_id, comment_id) => match method {
			&Method::GET => ok(
				StatusCode::OK,
				state.comments.retrieve(&caller, review_id, comment_id).await?,
			),
			&Method::PATCH => {
				let payload: CommentPatchRequest = parse_json(body)?;
				ok(
					StatusCode::OK,
					state
						.comments
						.update(&caller, review_id, comment_id, payload, true)
						.await?,
				)
			}
			&Method::PUT => {
				let payload: CommentPatchRequest = parse_json(body)?;
				ok(
					StatusCode::OK,
					state
						.comments
						.update(&caller, review_id, comment_id, payload, false)
						.await?,
				)
			}
			&Method::DELETE => {
				state.comments.destroy(&caller, review_id, comment_id).await?;
				no_content()
			}
			_ => Err(ApiError::MethodNotAllowed),
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_statuses_match_the_taxonomy() {
		assert_eq!(status_of(&ApiError::bad_request("x")), StatusCode::BAD_REQUEST);
		assert_eq!(status_of(&ApiError::InvalidCode), StatusCode::BAD_REQUEST);
		assert_eq!(status_of(&ApiError::DuplicateReview), StatusCode::BAD_REQUEST);
		assert_eq!(status_of(&ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
		assert_eq!(status_of(&ApiError::Forbidden), StatusCode::FORBIDDEN);
		assert_eq!(status_of(&ApiError::not_found("x")), StatusCode::NOT_FOUND);
		assert_eq!(
			status_of(&ApiError::MethodNotAllowed),
			StatusCode::METHOD_NOT_ALLOWED
		);
		assert_eq!(status_of(&ApiError::conflict("x")), StatusCode::CONFLICT);
	}

	#[test]
	fn empty_body_parses_as_empty_patch() {
		let patch: UserPatchRequest = parse_json(b"").unwrap();
		assert!(patch.username.is_none());
		assert!(patch.role.is_none());
	}

	#[test]
	fn malformed_body_is_bad_request() {
		let result: Result<SignupRequest, _> = parse_json(b"{not json");
		assert!(matches!(result, Err(ApiError::BadRequest(_))));
	}
}
