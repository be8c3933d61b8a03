use std::{future::Future, pin::Pin, task::Poll};

use apg::DocumentError;
use tokio::sync::{mpsc, watch};

/// Cancellation flag shared by every traversal started from a [`crate::Context`]
#[derive(Debug, Clone, Default)]
pub struct StopToken(Option<watch::Receiver<bool>>);

/// The sending half of a [`StopToken`]
#[derive(Debug)]
pub struct StopSignal(watch::Sender<bool>);

impl StopSignal {
	pub fn stop(&self) {
		self.0.send_replace(true);
	}
}

impl StopToken {
	pub fn new() -> (StopSignal, StopToken) {
		let (tx, rx) = watch::channel(false);
		(StopSignal(tx), StopToken(Some(rx)))
	}

	/// token which never fires
	pub fn never() -> Self {
		StopToken(None)
	}

	pub fn stopped(&self) -> bool {
		self.0.as_ref().is_some_and(|rx| *rx.borrow())
	}

	/// resolves once stop is requested, never if the signal is dropped without firing
	pub async fn wait(&self) {
		if let Some(mut rx) = self.0.clone() {
			if rx.wait_for(|stop| *stop).await.is_ok() {
				return;
			}
		}
		std::future::pending::<()>().await
	}
}

/// Lazy sequence produced by a background task, at most one step ahead of its consumer
///
/// Dropping it aborts the producer, so no more fetches are issued once nobody is listening.
pub struct Walk<T> {
	rx: mpsc::Receiver<T>,
	task: Option<tokio::task::JoinHandle<()>>,
}

impl<T: Send + 'static> Walk<T> {
	/// must be called from within a tokio runtime
	pub(crate) fn spawn<F, Fut>(stop: StopToken, producer: F) -> Self
	where
		F: FnOnce(Yielder<T>) -> Fut,
		Fut: Future<Output = ()> + Send + 'static,
	{
		let (tx, rx) = mpsc::channel(1);
		let task = tokio::spawn(producer(Yielder { tx, stop }));
		Walk { rx, task: Some(task) }
	}
}

impl<T> Walk<T> {
	/// stop the producer and join it, a panic inside it surfaces as an internal error
	pub async fn finish(mut self) -> Result<(), DocumentError> {
		self.rx.close();
		let Some(task) = self.task.take() else { return Ok(()) };
		match task.await {
			Err(e) if e.is_panic() => Err(DocumentError::Internal(format!("traversal task panicked: {e}"))),
			_ => Ok(()),
		}
	}
}

impl<T> futures::Stream for Walk<T> {
	type Item = T;

	fn poll_next(mut self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Option<T>> {
		self.rx.poll_recv(cx)
	}
}

impl<T> Drop for Walk<T> {
	fn drop(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}

/// Producer side of a [`Walk`]
pub(crate) struct Yielder<T> {
	tx: mpsc::Sender<T>,
	stop: StopToken,
}

impl<T: Send> Yielder<T> {
	/// hand one item to the consumer, false once nobody is listening anymore
	pub async fn emit(&self, item: T) -> bool {
		if self.stop.stopped() {
			return false;
		}
		tokio::select! {
			sent = self.tx.send(item) => sent.is_ok(),
			_ = self.stop.wait() => false,
		}
	}

	/// run a fetch, unless the consumer goes away or a stop is requested first
	pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
		if self.stop.stopped() {
			return None;
		}
		tokio::select! {
			out = fut => Some(out),
			_ = self.tx.closed() => None,
			_ = self.stop.wait() => None,
		}
	}
}
