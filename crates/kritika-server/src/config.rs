//! Environment-based settings.
//!
//! Every knob reads a `KRITIKA_`-prefixed variable with a development
//! default, so `kritika-server` starts with no configuration at all.

use std::env;
use std::net::SocketAddr;

const DEV_SECRET: &str = "insecure-dev-secret";

/// Which mail backend to wire in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBackendKind {
	/// Log outbound mail (default).
	Console,
	/// Keep outbound mail in memory; useful for local poking.
	Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
	pub database_url: String,
	pub bind_addr: SocketAddr,
	pub secret_key: String,
	pub from_email: String,
	pub mail_backend: MailBackendKind,
}

impl Settings {
	pub fn from_env() -> anyhow::Result<Self> {
		let database_url =
			env::var("KRITIKA_DATABASE_URL").unwrap_or_else(|_| "sqlite://kritika.db".to_string());

		let bind_addr: SocketAddr = env::var("KRITIKA_BIND_ADDR")
			.unwrap_or_else(|_| "127.0.0.1:8000".to_string())
			.parse()?;

		let secret_key = match env::var("KRITIKA_SECRET_KEY") {
			Ok(secret) if !secret.is_empty() => secret,
			_ => {
				tracing::warn!("KRITIKA_SECRET_KEY is not set; using an insecure development secret");
				DEV_SECRET.to_string()
			}
		};

		let from_email = env::var("KRITIKA_FROM_EMAIL")
			.unwrap_or_else(|_| "noreply@kritika.example".to_string());

		let mail_backend = match env::var("KRITIKA_MAIL_BACKEND").as_deref() {
			Ok("memory") => MailBackendKind::Memory,
			Ok("console") | Err(_) => MailBackendKind::Console,
			Ok(other) => anyhow::bail!("unknown mail backend {other:?}"),
		};

		Ok(Self {
			database_url,
			bind_addr,
			secret_key,
			from_email,
			mail_backend,
		})
	}
}
