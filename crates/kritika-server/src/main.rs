//! kritika-server: the HTTP front end for the review-aggregation API.

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use kritika_mail::{ConsoleBackend, EmailBackend, MemoryBackend};
use kritika_server::{AppState, MailBackendKind, Settings, handler};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let settings = Settings::from_env()?;

	let pool = kritika_db::connect(&settings.database_url).await?;
	kritika_db::MIGRATOR.run(&pool).await?;
	tracing::info!(database_url = %settings.database_url, "database ready");

	let mail: Arc<dyn EmailBackend> = match settings.mail_backend {
		MailBackendKind::Console => Arc::new(ConsoleBackend::new()),
		MailBackendKind::Memory => Arc::new(MemoryBackend::new()),
	};

	let state = Arc::new(AppState::new(
		pool,
		settings.secret_key.as_bytes(),
		settings.from_email.clone(),
		mail,
	));

	let listener = TcpListener::bind(settings.bind_addr).await?;
	tracing::info!(addr = %settings.bind_addr, "kritika-server listening");

	loop {
		let (stream, remote) = listener.accept().await?;
		let io = TokioIo::new(stream);
		let state = Arc::clone(&state);

		tokio::spawn(async move {
			let service = service_fn(move |request| {
				let state = Arc::clone(&state);
				async move { Ok::<_, Infallible>(handler::handle(&state, request).await) }
			});

			if let Err(error) = http1::Builder::new().serve_connection(io, service).await {
				tracing::debug!(%error, %remote, "connection closed with error");
			}
		});
	}
}
