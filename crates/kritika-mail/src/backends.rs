//! Delivery backends.

use crate::{EmailMessage, MailError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// A mail delivery backend.
///
/// Returns the number of messages handed off. Callers in the core treat
/// delivery as fire-and-forget; failures are logged, never surfaced.
#[async_trait]
pub trait EmailBackend: Send + Sync {
	async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailError>;
}

/// Development backend: writes each message to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleBackend;

impl ConsoleBackend {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl EmailBackend for ConsoleBackend {
	async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailError> {
		for message in messages {
			tracing::info!(
				to = ?message.to,
				from = %message.from_email,
				subject = %message.subject,
				body = %message.body,
				"outbound email"
			);
		}
		Ok(messages.len())
	}
}

/// Test backend: stores messages instead of sending them.
///
/// # Examples
///
/// ```
/// use kritika_mail::{EmailMessage, EmailBackend, MemoryBackend};
///
/// # #[tokio::main]
/// # async fn main() {
/// let backend = MemoryBackend::new();
/// let message = EmailMessage::new("s", "b", "from@x", vec!["to@x".to_string()]);
/// backend.send_messages(&[message]).await.unwrap();
/// assert_eq!(backend.sent()[0].subject, "s");
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryBackend {
	outbox: Arc<RwLock<Vec<EmailMessage>>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of everything sent so far.
	pub fn sent(&self) -> Vec<EmailMessage> {
		self.outbox.read().clone()
	}

	/// Drop all stored messages.
	pub fn clear(&self) {
		self.outbox.write().clear();
	}
}

#[async_trait]
impl EmailBackend for MemoryBackend {
	async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailError> {
		self.outbox.write().extend_from_slice(messages);
		Ok(messages.len())
	}
}
