use std::sync::Arc;

use apg::{client::Offline, Client, Document, DocumentError};

use crate::{config::Config, walk::StopToken};

/// Receives faults from best-effort operations (counting, pagination, address fan-out)
///
/// These operations keep going or stop gracefully instead of failing, the sink is where the
/// caller learns what went wrong along the way.
pub trait Sink: Sync + Send {
	fn report(&self, uri: &str, error: &DocumentError);
}

/// Default sink: every fault becomes a warning in the logs
pub struct LogSink;

impl Sink for LogSink {
	fn report(&self, uri: &str, error: &DocumentError) {
		tracing::warn!("failed resolving '{uri}': {error}");
	}
}

impl<F: Fn(&str, &DocumentError) + Sync + Send> Sink for F {
	fn report(&self, uri: &str, error: &DocumentError) {
		(self)(uri, error)
	}
}

#[derive(Clone)]
pub struct Context {
	inner: Arc<ContextInner>,
	stop: StopToken,
}

struct ContextInner {
	config: Config,
	client: Arc<dyn Client>,
	sink: Box<dyn Sink>,
}

impl Default for Context {
	fn default() -> Self {
		Context::new(Config::default(), Arc::new(Offline))
	}
}

impl Context {
	pub fn new(config: Config, client: Arc<dyn Client>) -> Self {
		Context {
			inner: Arc::new(ContextInner { config, client, sink: Box::new(LogSink) }),
			stop: StopToken::never(),
		}
	}

	pub fn with_sink(self, sink: impl Sink + 'static) -> Self {
		let inner = ContextInner {
			config: self.inner.config.clone(),
			client: self.inner.client.clone(),
			sink: Box::new(sink),
		};
		Context { inner: Arc::new(inner), stop: self.stop }
	}

	/// traversals started from the returned context end once the token fires
	pub fn with_stop(mut self, stop: StopToken) -> Self {
		self.stop = stop;
		self
	}

	pub fn cfg(&self) -> &Config {
		&self.inner.config
	}

	pub fn client(&self) -> Arc<dyn Client> {
		self.inner.client.clone()
	}

	pub fn stop(&self) -> &StopToken {
		&self.stop
	}

	pub fn report(&self, uri: &str, error: &DocumentError) {
		self.inner.sink.report(uri, error);
	}

	/// wrap a raw value or bare id so that it resolves through this context's client
	pub fn document(&self, raw: impl Into<apg::Value>) -> Document {
		Document::with_client(raw, self.client())
	}

	pub async fn unwrap_activity(&self, activity: &Document) -> Result<Document, DocumentError> {
		activity.unwrap_activity_within(self.cfg().security.max_unwrap_depth).await
	}
}
