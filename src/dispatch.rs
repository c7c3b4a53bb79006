use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::event::AppEvent;
use crate::request::HttpRequest;
use crate::response::HttpResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
	InvalidUrl(String),
	Transport(String),
	Timeout(Duration),
	Cancelled,
}

impl std::fmt::Display for DispatchError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidUrl(url) if url.is_empty() => write!(f, "URL cannot be empty"),
			Self::InvalidUrl(url) => write!(f, "Invalid URL: {url}"),
			Self::Transport(message) => write!(f, "Request failed: {message}"),
			Self::Timeout(after) => write!(f, "Request timed out after {}s", after.as_secs()),
			Self::Cancelled => write!(f, "Request cancelled"),
		}
	}
}

impl std::error::Error for DispatchError {}

pub type DispatchOutcome = Result<HttpResponse, DispatchError>;

pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = DispatchOutcome> + Send + 'a>>;

/// The network capability the dispatcher is built on.
pub trait Transport: Send + Sync {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

struct InFlight {
	id: RequestId,
	handle: JoinHandle<()>,
}

/// Runs one request at a time in the background and reports back through the event channel.
pub struct Dispatcher {
	transport: Arc<dyn Transport>,
	events: UnboundedSender<AppEvent>,
	timeout: Duration,
	next_id: u64,
	in_flight: Option<InFlight>,
}

impl Dispatcher {
	pub fn new(transport: Arc<dyn Transport>, events: UnboundedSender<AppEvent>, timeout: Duration) -> Self {
		Self { transport, events, timeout, next_id: 0, in_flight: None }
	}

	/// Starts `request`, aborting whatever was still running.
	///
	/// Must be called from within a tokio runtime.
	pub fn send(&mut self, request: HttpRequest) -> RequestId {
		self.cancel();

		self.next_id += 1;
		let id = RequestId(self.next_id);

		let transport = Arc::clone(&self.transport);
		let events = self.events.clone();
		let timeout = self.timeout;

		tracing::info!(request = ?id, method = %request.method, url = %request.url, "dispatching request");

		let handle = tokio::spawn(async move {
			let outcome = match tokio::time::timeout(timeout, transport.send(request)).await {
				Ok(outcome) => outcome,
				Err(_) => Err(DispatchError::Timeout(timeout)),
			};

			if let Err(error) = &outcome {
				tracing::warn!(request = ?id, "{error}");
			}

			// The receiver is gone only when the app is shutting down.
			let _ = events.send(AppEvent::Response { id, outcome });
		});

		self.in_flight = Some(InFlight { id, handle });
		id
	}

	/// Aborts the running request, if any. Returns whether something was cancelled.
	pub fn cancel(&mut self) -> bool {
		let Some(in_flight) = self.in_flight.take() else {
			return false;
		};

		if in_flight.handle.is_finished() {
			return false;
		}

		tracing::info!(request = ?in_flight.id, "cancelling request");
		in_flight.handle.abort();
		true
	}

	/// Whether a completion for `id` should still be shown. Clears the in-flight slot when it is.
	pub fn accept(&mut self, id: RequestId) -> bool {
		match &self.in_flight {
			Some(in_flight) if in_flight.id == id => {
				self.in_flight = None;
				true
			},
			_ => false,
		}
	}

	pub const fn is_busy(&self) -> bool {
		self.in_flight.is_some()
	}
}

impl Drop for Dispatcher {
	fn drop(&mut self) {
		self.cancel();
	}
}

#[cfg(test)]
pub mod testing {
	use std::collections::HashMap;
	use std::sync::Mutex;

	use super::*;

	/// Answers every request with a canned outcome, optionally after a delay.
	pub struct StubTransport {
		outcome: DispatchOutcome,
		delay: Duration,
		pub seen: Mutex<Vec<HttpRequest>>,
	}

	impl StubTransport {
		pub fn failing(message: &str) -> Self {
			Self {
				outcome: Err(DispatchError::Transport(message.to_string())),
				delay: Duration::ZERO,
				seen: Mutex::new(Vec::new()),
			}
		}

		pub fn ok(status_code: u16, body: &str) -> Self {
			let response = HttpResponse::new(
				String::new(),
				status_code,
				String::from("OK"),
				HashMap::from([(String::from("content-type"), String::from("text/plain"))]),
				body.to_string(),
				Duration::from_millis(5),
			);
			Self { outcome: Ok(response), delay: Duration::ZERO, seen: Mutex::new(Vec::new()) }
		}

		pub fn outcome(&self) -> DispatchOutcome {
			self.outcome.clone()
		}

		pub const fn delayed(mut self, delay: Duration) -> Self {
			self.delay = delay;
			self
		}
	}

	impl Transport for StubTransport {
		fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
			if let Ok(mut seen) = self.seen.lock() {
				seen.push(request);
			}
			let outcome = self.outcome.clone();
			let delay = self.delay;

			Box::pin(async move {
				if !delay.is_zero() {
					tokio::time::sleep(delay).await;
				}
				outcome
			})
		}
	}
}

#[cfg(test)]
mod tests {
	use super::testing::StubTransport;
	use super::*;
	use crate::event;

	fn request() -> HttpRequest {
		HttpRequest::new().with_url("http://x")
	}

	#[tokio::test]
	async fn test_failure_is_reported_as_event() {
		let (tx, mut rx) = event::channel();
		let mut dispatcher = Dispatcher::new(Arc::new(StubTransport::failing("connection refused")), tx, Duration::from_secs(5));

		let id = dispatcher.send(request());

		let Some(AppEvent::Response { id: received, outcome }) = rx.recv().await else {
			panic!("expected a response event");
		};
		assert_eq!(received, id);
		assert_eq!(outcome.unwrap_err(), DispatchError::Transport(String::from("connection refused")));
		assert!(dispatcher.accept(id));
		assert!(!dispatcher.is_busy());
	}

	#[tokio::test(start_paused = true)]
	async fn test_slow_transport_times_out() {
		let (tx, mut rx) = event::channel();
		let transport = StubTransport::ok(200, "late").delayed(Duration::from_secs(60));
		let mut dispatcher = Dispatcher::new(Arc::new(transport), tx, Duration::from_secs(10));

		dispatcher.send(request());

		let Some(AppEvent::Response { outcome, .. }) = rx.recv().await else {
			panic!("expected a response event");
		};
		let error = outcome.unwrap_err();
		assert_eq!(error, DispatchError::Timeout(Duration::from_secs(10)));
		assert_eq!(error.to_string(), "Request timed out after 10s");
	}

	#[tokio::test(start_paused = true)]
	async fn test_second_send_supersedes_first() {
		let (tx, mut rx) = event::channel();
		let transport = StubTransport::ok(200, "done").delayed(Duration::from_secs(1));
		let mut dispatcher = Dispatcher::new(Arc::new(transport), tx, Duration::from_secs(10));

		let first = dispatcher.send(request());
		let second = dispatcher.send(request());
		assert_ne!(first, second);

		let Some(AppEvent::Response { id, outcome }) = rx.recv().await else {
			panic!("expected a response event");
		};
		assert_eq!(id, second);
		assert!(outcome.is_ok());
		assert!(!dispatcher.accept(first));
		assert!(dispatcher.accept(second));
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancel_stops_in_flight_request() {
		let (tx, mut rx) = event::channel();
		let transport = StubTransport::ok(200, "never").delayed(Duration::from_secs(1));
		let mut dispatcher = Dispatcher::new(Arc::new(transport), tx, Duration::from_secs(10));

		dispatcher.send(request());
		assert!(dispatcher.is_busy());
		assert!(dispatcher.cancel());
		assert!(!dispatcher.is_busy());

		tokio::time::sleep(Duration::from_secs(2)).await;
		assert!(rx.try_recv().is_err());
	}

	#[test]
	fn test_error_messages() {
		assert_eq!(DispatchError::InvalidUrl(String::new()).to_string(), "URL cannot be empty");
		assert_eq!(DispatchError::InvalidUrl(String::from("nope")).to_string(), "Invalid URL: nope");
		assert_eq!(
			DispatchError::Transport(String::from("connection refused")).to_string(),
			"Request failed: connection refused"
		);
	}
}
