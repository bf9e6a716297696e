// std
use std::{sync::Arc, time::Duration as StdDuration};
// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::oneshot};
// self
use ephemeral_key_broker::{
	auth::ApiKey,
	broker::Broker,
	config::{UpstreamApi, UpstreamConfig},
	error::{Error, TransportError},
	http::{CredentialService, OpenAiCredentialService},
	server::{self, AppState},
	session::{ResponseShape, SessionConfig},
};

const API_KEY: &str = "sk-test-4f9c2e7a1b";

fn service(server: &MockServer, api: UpstreamApi) -> OpenAiCredentialService {
	service_with_timeout(server, api, StdDuration::from_secs(5))
}

fn service_with_timeout(
	server: &MockServer,
	api: UpstreamApi,
	timeout: StdDuration,
) -> OpenAiCredentialService {
	let upstream = UpstreamConfig::new(&server.base_url(), api, timeout)
		.expect("Mock upstream config should build.");

	OpenAiCredentialService::new(
		ApiKey::new(API_KEY).expect("Test API key should be accepted."),
		upstream,
	)
	.expect("Credential service should build.")
}

fn ecommerce_payload() -> Value {
	serde_json::to_value(SessionConfig::ecommerce_agent())
		.expect("Session preset should serialize.")
}

#[tokio::test]
async fn sessions_flavor_sends_preset_with_bearer_and_beta_headers() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/realtime/sessions")
				.header("authorization", format!("Bearer {API_KEY}"))
				.header("openai-beta", "realtime=v1")
				.json_body(ecommerce_payload());
			then.status(200).header("content-type", "application/json").body(
				"{\"id\":\"sess_001\",\"object\":\"realtime.session\",\"client_secret\":{\"value\":\"ek_abc123\",\"expires_at\":1734626400}}",
			);
		})
		.await;
	let broker = Broker::new(
		Arc::new(service(&server, UpstreamApi::Sessions)),
		SessionConfig::ecommerce_agent(),
	);
	let credential = broker.create_session().await.expect("Session should be issued.");

	assert_eq!(credential.key.expose(), "ek_abc123");
	assert_eq!(credential.shape, ResponseShape::ClientSecretObject);
	assert_eq!(credential.expires_at.map(|at| at.unix_timestamp()), Some(1_734_626_400));

	mock.assert_async().await;
}

#[tokio::test]
async fn client_secrets_flavor_reads_top_level_value() {
	let server = MockServer::start_async().await;
	let session = SessionConfig::ecommerce_agent();
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/realtime/client_secrets")
				.header("authorization", format!("Bearer {API_KEY}"))
				.json_body(json!({
					"session": {
						"type": "realtime",
						"model": session.model,
						"instructions": session.instructions,
						"audio": { "output": { "voice": "alloy" } },
						"tools": session.tools
					}
				}));
			then.status(200).header("content-type", "application/json").body(
				"{\"value\":\"ek_ga_789\",\"expires_at\":1756310470,\"session\":{\"type\":\"realtime\"}}",
			);
		})
		.await;
	let svc = service(&server, UpstreamApi::ClientSecrets);
	let body = svc.create_session(&session).await.expect("Upstream call should succeed.");

	assert_eq!(body["value"], "ek_ga_789");

	mock.assert_async().await;
}

#[tokio::test]
async fn invalid_api_key_is_scrubbed_and_classified() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/realtime/sessions");
			then.status(401).header("content-type", "application/json").body(format!(
				"{{\"error\":{{\"message\":\"Incorrect API key provided: {API_KEY}.\",\"type\":\"invalid_request_error\",\"code\":\"invalid_api_key\"}}}}"
			));
		})
		.await;
	let err = service(&server, UpstreamApi::Sessions)
		.create_session(&SessionConfig::ecommerce_agent())
		.await
		.expect_err("Rejected key should fail.");

	match &err {
		Error::Upstream { status, code, message } => {
			assert_eq!(*status, 401);
			assert_eq!(code.as_deref(), Some("invalid_api_key"));
			assert!(!message.contains(API_KEY), "{message}");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
	assert!(!format!("{err:?}").contains(API_KEY));

	mock.assert_async().await;
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/realtime/sessions");
			then.status(200).header("content-type", "text/html").body("<html>gateway</html>");
		})
		.await;
	let err = service(&server, UpstreamApi::Sessions)
		.create_session(&SessionConfig::ecommerce_agent())
		.await
		.expect_err("HTML body should fail.");

	assert!(matches!(err, Error::MalformedResponse { .. }));

	mock.assert_async().await;
}

#[tokio::test]
async fn slow_upstream_times_out() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/realtime/sessions");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"ek_late\"}")
				.delay(StdDuration::from_secs(3));
		})
		.await;
	let err = service_with_timeout(&server, UpstreamApi::Sessions, StdDuration::from_millis(200))
		.create_session(&SessionConfig::ecommerce_agent())
		.await
		.expect_err("Delayed upstream should time out.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout)));
}

#[tokio::test]
async fn served_broker_never_leaks_the_api_key() {
	let upstream = MockServer::start_async().await;
	let mock = upstream
		.mock_async(|when, then| {
			when.method(POST).path("/v1/realtime/sessions");
			then.status(401).header("content-type", "application/json").body(format!(
				"{{\"error\":{{\"message\":\"Incorrect API key provided: {API_KEY}.\",\"code\":\"invalid_api_key\"}}}}"
			));
		})
		.await;
	let broker = Broker::new(
		Arc::new(service(&upstream, UpstreamApi::Sessions)),
		SessionConfig::ecommerce_agent(),
	);
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Test listener should bind.");
	let addr = listener.local_addr().expect("Test listener should expose its address.");
	let (stop_tx, stop_rx) = oneshot::channel::<()>();
	let handle = tokio::spawn(server::serve(listener, AppState::new(broker), async move {
		let _ = stop_rx.await;
	}));
	let response = reqwest::Client::new()
		.post(format!("http://{addr}/session"))
		.send()
		.await
		.expect("Broker should answer.");
	let status = response.status();
	let text = response.text().await.expect("Broker body should be readable.");

	assert_eq!(status.as_u16(), 500);
	assert!(text.contains("invalid_api_key"), "{text}");
	assert!(!text.contains(API_KEY), "{text}");

	let body: Value = serde_json::from_str(&text).expect("Error body should be JSON.");

	assert!(body["detail"].is_string());

	mock.assert_async().await;

	let _ = stop_tx.send(());

	handle
		.await
		.expect("Server task should join.")
		.expect("Server should shut down cleanly.");
}
