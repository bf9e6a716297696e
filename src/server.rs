//! HTTP surface: `GET /` for health and `POST /session` for key issuance.
//!
//! The [`Broker`] lives in [`AppState`] and is shared by every request; handlers never build
//! upstream clients themselves. Failures leave the handler as [`ApiError`], which renders
//! `{ "detail": ... }` bodies.

// crates.io
use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
// self
use crate::{_prelude::*, broker::Broker};

/// Static payload returned by `GET /`.
pub const WELCOME_MESSAGE: &str =
	"Welcome to the realtime voice session broker. The agent is ready!";

const INTERNAL_DETAIL: &str = "Internal server error while creating the realtime session.";

/// Shared request state.
#[derive(Clone, Debug)]
pub struct AppState {
	/// Broker constructed at startup.
	pub broker: Arc<Broker>,
}
impl AppState {
	/// Wraps a broker for sharing across handlers.
	pub fn new(broker: Broker) -> Self {
		Self { broker: Arc::new(broker) }
	}
}

/// Body of `GET /`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeResponse {
	/// Greeting text.
	pub message: String,
}

/// Body of a successful `POST /session`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCreateResponse {
	/// Ephemeral key the browser uses to open its realtime connection.
	pub ephemeral_key: String,
}

/// Body of every error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Human-readable, credential-free failure description.
	pub detail: String,
}

/// Broker error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub Error);
impl ApiError {
	/// HTTP status for the wrapped error.
	pub fn status(&self) -> StatusCode {
		StatusCode::INTERNAL_SERVER_ERROR
	}

	/// Client-facing detail text.
	///
	/// Upstream rejections and malformed responses are described; transport and configuration
	/// failures collapse into a generic message.
	pub fn detail(&self) -> String {
		match &self.0 {
			e @ (Error::Upstream { .. } | Error::MalformedResponse { .. }) =>
				format!("Error creating the realtime session: {e}"),
			Error::Transport(_) | Error::Config(_) => INTERNAL_DETAIL.into(),
		}
	}
}
impl From<Error> for ApiError {
	fn from(e: Error) -> Self {
		Self(e)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status(), Json(ErrorResponse { detail: self.detail() })).into_response()
	}
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(health_check))
		.route("/session", post(create_session))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
	F: 'static + Send + Future<Output = ()>,
{
	if let Ok(addr) = listener.local_addr() {
		tracing::info!(%addr, "Session broker listening.");
	}

	axum::serve(listener, router(state)).with_graceful_shutdown(shutdown).await
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed, never resolves.
pub async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("Shutdown signal received."),
		Err(e) => {
			tracing::error!(error = %e, "Failed to listen for the shutdown signal.");

			std::future::pending::<()>().await;
		},
	}
}

async fn health_check() -> Json<WelcomeResponse> {
	Json(WelcomeResponse { message: WELCOME_MESSAGE.into() })
}

async fn create_session(
	State(state): State<AppState>,
) -> Result<Json<SessionCreateResponse>, ApiError> {
	let credential = state.broker.create_session().await?;

	Ok(Json(SessionCreateResponse { ephemeral_key: credential.key.into_inner() }))
}
