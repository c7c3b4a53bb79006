use reqwest::{Client, IntoUrl, Method};
use reqwest_cookie_store::{CookieStore, CookieStoreMutex};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::dispatch::{DispatchError, DispatchOutcome, Transport, TransportFuture};
use crate::request::{HttpMethod, HttpRequest};
use crate::response::HttpResponse;

/// `reqwest` backed transport. Cookies set by responses are kept for the rest of the session.
#[derive(Clone)]
pub struct HttpClient {
	client: Client,
	cookies_store: Arc<CookieStoreMutex>,
	max_body_bytes: usize,
}

impl HttpClient {
	pub fn new(config: &Config) -> Self {
		let cookies_store = Arc::new(CookieStoreMutex::new(CookieStore::default()));

		// Timeouts are enforced by the dispatcher so they surface as their own error.
		let client = Client::builder()
			.user_agent(config.user_agent.clone())
			.cookie_provider(Arc::clone(&cookies_store))
			.build()
			.unwrap_or_else(|error| {
				tracing::warn!("falling back to default http client: {error}");
				Client::new()
			});

		let http_client = Self { client, cookies_store, max_body_bytes: config.max_body_bytes };

		if !config.cookies.is_empty() {
			if let Err(error) = http_client.add_cookies(config.cookies.clone(), config.initial_url.as_str()) {
				tracing::warn!("ignoring --cookie values: {error}");
			}
		}

		http_client
	}

	pub async fn send_request(&self, request: &HttpRequest) -> DispatchOutcome {
		let url = reqwest::Url::parse(request.url.trim()).map_err(|_| DispatchError::InvalidUrl(request.url.clone()))?;

		let start_time = Instant::now();

		let method = convert_method(request.method);
		let mut request_builder = self.client.request(method, url);

		for (key, value) in &request.headers {
			request_builder = request_builder.header(key, value);
		}

		if request.has_body() {
			request_builder = request_builder.body(request.body.clone());
		}

		let response = request_builder.send().await.map_err(transport_error)?;
		let response_time = start_time.elapsed();

		let status_code = response.status().as_u16();
		let status_text = response.status().canonical_reason().unwrap_or("Unknown").to_string();

		let mut headers = HashMap::new();
		for (key, value) in response.headers() {
			if let Ok(value_str) = value.to_str() {
				headers.insert(key.to_string(), value_str.to_string());
			}
		}

		let bytes = response.bytes().await.map_err(transport_error)?;
		let body = String::from_utf8_lossy(&bytes).into_owned();

		tracing::debug!(
			status_code,
			size = bytes.len(),
			elapsed_ms = response_time.as_millis(),
			cookies = self.get_cookies().map_or(0, |cookies| cookies.len()),
			"response received"
		);

		Ok(HttpResponse::new(request.id.clone(), status_code, status_text, headers, body, response_time)
			.truncated_to(self.max_body_bytes))
	}

	pub fn add_cookies(&self, cookies: Vec<String>, url: impl IntoUrl) -> anyhow::Result<()> {
		if cookies.is_empty() {
			return Ok(());
		}

		let url = url.into_url()?;

		{
			let mut cookies_store =
				self.cookies_store.lock().map_err(|_| anyhow::anyhow!("Failed to acquire cookies store lock"))?;

			for cookie in cookies {
				let _ = cookies_store.parse(&cookie, &url);
			}
		}

		Ok(())
	}

	pub fn get_cookies(&self) -> anyhow::Result<Vec<String>> {
		let cookies = {
			let cookies_store =
				self.cookies_store.lock().map_err(|_| anyhow::anyhow!("Failed to acquire cookies store lock"))?;

			cookies_store.iter_any().map(|cookie| cookie.to_string()).collect()
		};
		Ok(cookies)
	}
}

impl Transport for HttpClient {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move { self.send_request(&request).await })
	}
}

fn transport_error(error: reqwest::Error) -> DispatchError {
	// reqwest only shows the outermost layer; the cause is what the user needs to see.
	let mut message = error.to_string();
	let mut source = std::error::Error::source(&error);
	while let Some(cause) = source {
		message = format!("{message}: {cause}");
		source = cause.source();
	}
	DispatchError::Transport(message)
}

const fn convert_method(method: HttpMethod) -> Method {
	match method {
		HttpMethod::Get => Method::GET,
		HttpMethod::Post => Method::POST,
		HttpMethod::Put => Method::PUT,
		HttpMethod::Patch => Method::PATCH,
		HttpMethod::Delete => Method::DELETE,
		HttpMethod::Options => Method::OPTIONS,
		HttpMethod::Head => Method::HEAD,
	}
}
