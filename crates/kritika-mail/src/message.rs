//! Email message type.

/// A plain-text email message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
	pub subject: String,
	pub body: String,
	pub from_email: String,
	pub to: Vec<String>,
}

impl EmailMessage {
	/// Build a message addressed to `to`.
	///
	/// # Examples
	///
	/// ```
	/// use kritika_mail::EmailMessage;
	///
	/// let message = EmailMessage::new(
	///     "Subject",
	///     "Body",
	///     "noreply@kritika.example",
	///     vec!["user@example.com".to_string()],
	/// );
	/// assert_eq!(message.to.len(), 1);
	/// ```
	pub fn new(
		subject: impl Into<String>,
		body: impl Into<String>,
		from_email: impl Into<String>,
		to: Vec<String>,
	) -> Self {
		Self {
			subject: subject.into(),
			body: body.into(),
			from_email: from_email.into(),
			to,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn construction_keeps_fields() {
		let message = EmailMessage::new(
			"Код подтверждения",
			"Ваш код подтверждения: abc123",
			"noreply@kritika.example",
			vec!["a@example.com".into(), "b@example.com".into()],
		);
		assert_eq!(message.subject, "Код подтверждения");
		assert_eq!(message.to.len(), 2);
	}
}
