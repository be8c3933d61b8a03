use std::{collections::BTreeMap, sync::atomic::{AtomicUsize, Ordering}};

use crate::{Document, DocumentError, Value};

/// Resolves ids into documents, usually over the network
///
/// Caching, retries, signatures and timeouts are all the implementer's business. Every document
/// returned gets bound to the client which asked for it, so implementations don't need to attach
/// themselves to their results.
#[async_trait::async_trait]
pub trait Client: Send + Sync {
	async fn load(&self, uri: &str) -> Result<Document, DocumentError>;
}

/// A client which resolves nothing, for documents that should never touch the network
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

#[async_trait::async_trait]
impl Client for Offline {
	async fn load(&self, uri: &str) -> Result<Document, DocumentError> {
		Err(DocumentError::NotFound(uri.to_string()))
	}
}

/// Pre-seeded in-memory store of documents, keeps count of how many lookups it served
#[derive(Debug, Default)]
pub struct Memory {
	documents: BTreeMap<String, Value>,
	calls: AtomicUsize,
}

impl Memory {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, uri: &str, document: impl Into<Value>) -> Self {
		self.documents.insert(uri.to_string(), document.into());
		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::Relaxed)
	}
}

#[async_trait::async_trait]
impl Client for Memory {
	async fn load(&self, uri: &str) -> Result<Document, DocumentError> {
		self.calls.fetch_add(1, Ordering::Relaxed);
		match self.documents.get(uri) {
			Some(doc) => Ok(Document::new(doc.clone())),
			None => Err(DocumentError::NotFound(uri.to_string())),
		}
	}
}
