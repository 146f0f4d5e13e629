//! # Kritika Mail
//!
//! Outbound mail for the Kritika service.
//!
//! The core treats delivery as fire-and-forget: it builds an
//! [`EmailMessage`], hands it to an [`EmailBackend`], and never consumes a
//! delivery result beyond logging. Two backends ship here:
//!
//! - [`ConsoleBackend`]: prints messages to the log (development default)
//! - [`MemoryBackend`]: stores messages for assertions in tests
//!
//! Real SMTP delivery sits behind the same trait and is deliberately out of
//! this repository's scope.

pub mod backends;
pub mod message;

pub use backends::{ConsoleBackend, EmailBackend, MemoryBackend};
pub use message::EmailMessage;

use thiserror::Error;

/// Mail collaborator failures. Never propagated into API responses.
#[derive(Debug, Error)]
pub enum MailError {
	#[error("mail backend error: {0}")]
	Backend(String),
}

/// Send a single message through `backend`.
///
/// # Examples
///
/// ```
/// use kritika_mail::{MemoryBackend, send_mail};
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = MemoryBackend::new();
/// send_mail(
///     &backend,
///     "Код подтверждения",
///     "Ваш код подтверждения: aB3x9Z",
///     "noreply@kritika.example",
///     vec!["user@example.com".to_string()],
/// )
/// .await
/// .unwrap();
/// assert_eq!(backend.sent().len(), 1);
/// # }
/// ```
pub async fn send_mail(
	backend: &dyn EmailBackend,
	subject: &str,
	body: &str,
	from_email: &str,
	to: Vec<String>,
) -> Result<usize, MailError> {
	let message = EmailMessage::new(subject, body, from_email, to);
	backend.send_messages(&[message]).await
}
