use apg::{Document, Uniquer};

use crate::{ext::ReportedError, walk::{Walk, Yielder}, Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
	/// from `first` following `next`
	#[default]
	Forward,
	/// from `last` following `prev`
	Backward,
}

impl Direction {
	fn start(self) -> &'static str {
		match self {
			Direction::Forward => "first",
			Direction::Backward => "last",
		}
	}

	fn step(self) -> &'static str {
		match self {
			Direction::Forward => "next",
			Direction::Backward => "prev",
		}
	}
}

/// Walks remote (Ordered)Collections page by page
///
/// Remote servers are not trusted to terminate their feeds: every walk stops on a second
/// consecutive empty page, on a page it already visited, or after `security.max_pages` pages.
/// Fetch failures are handed to the context sink and end the walk, whatever was already
/// produced stays with the consumer.
#[allow(async_fn_in_trait)]
pub trait Collector {
	fn pages(&self, collection: &Document, direction: Direction) -> Walk<Document>;
	fn items(&self, collection: &Document) -> Walk<Document>;
	fn items_reverse(&self, collection: &Document) -> Walk<Document>;
	async fn count_items(&self, collection: &Document) -> u64;
}

impl Collector for Context {
	fn pages(&self, collection: &Document, direction: Direction) -> Walk<Document> {
		walk_pages(self, collection, direction, |page| vec![page])
	}

	fn items(&self, collection: &Document) -> Walk<Document> {
		walk_pages(self, collection, Direction::Forward, |page| page.embedded_items().iter().collect())
	}

	fn items_reverse(&self, collection: &Document) -> Walk<Document> {
		walk_pages(self, collection, Direction::Backward, |page| {
			let mut items : Vec<Document> = page.embedded_items().iter().collect();
			items.reverse();
			items
		})
	}

	async fn count_items(&self, collection: &Document) -> u64 {
		let Some(root) = collection.load().await.or_report(self, collection.id()) else { return 0 };

		let total = root.property("totalItems").value().as_int64();
		if total > 0 {
			return total as u64;
		}

		let mut count = 0;
		let mut pages = self.pages(&root, Direction::Forward);
		while let Some(page) = futures::StreamExt::next(&mut pages).await {
			count += page.embedded_items().len() as u64;
		}
		if let Err(e) = pages.finish().await {
			self.report(root.id(), &e);
		}
		count
	}
}

fn walk_pages<F>(ctx: &Context, collection: &Document, direction: Direction, explode: F) -> Walk<Document>
where
	F: Fn(Document) -> Vec<Document> + Send + 'static,
{
	let ctx = ctx.clone();
	let collection = collection.clone();
	Walk::spawn(ctx.stop().clone(), move |out| async move {
		let Some(root) = fetch(&ctx, &out, &collection).await else { return };
		let mut guard = PageGuard::new(ctx.cfg().security.max_pages);

		let start = root.property(direction.start());
		let mut page = if start.is_nil() {
			root.clone()
		} else {
			let Some(first) = fetch(&ctx, &out, &start).await else { return };
			first
		};

		// without `prev` links the only way back is walking forward and replaying
		if direction == Direction::Backward && page.property("prev").is_nil() {
			let first = root.property("first");
			if !first.is_nil() && (start.is_nil() || first.id() != page.id()) {
				tracing::debug!("'{}' can't be walked backwards, buffering it forward", collection.id());
				let Some(first) = fetch(&ctx, &out, &first).await else { return };
				let mut pages = Vec::new();
				let mut page = first;
				while guard.admit(&page) {
					let step = page.property("next");
					pages.push(page);
					if !guard.advance(collection.id()) || step.is_nil() {
						break;
					}
					let Some(next) = fetch(&ctx, &out, &step).await else { break };
					page = next;
				}
				for page in pages.into_iter().rev() {
					for item in explode(page) {
						if !out.emit(item).await {
							return;
						}
					}
				}
				return;
			}
		}

		while guard.admit(&page) {
			let step = page.property(direction.step());
			for item in explode(page) {
				if !out.emit(item).await {
					return;
				}
			}
			if !guard.advance(collection.id()) || step.is_nil() {
				break;
			}
			let Some(next) = fetch(&ctx, &out, &step).await else { break };
			page = next;
		}
	})
}

/// Termination guards shared by every page walk
struct PageGuard {
	visited: Uniquer<String>,
	walked: u32,
	max_pages: u32,
	previous_empty: bool,
}

impl PageGuard {
	fn new(max_pages: u32) -> Self {
		PageGuard { visited: Uniquer::new(), walked: 0, max_pages, previous_empty: false }
	}

	/// false for nil pages, pages already seen and a second empty page in a row
	fn admit(&mut self, page: &Document) -> bool {
		if page.is_nil() {
			return false;
		}
		let id = page.id().to_string();
		if !id.is_empty() && self.visited.is_duplicate(id.clone()) {
			tracing::warn!("page {id} links back into its own collection, stopping");
			return false;
		}
		let empty = page.embedded_items().is_empty();
		if empty && self.previous_empty {
			tracing::debug!("second consecutive empty page at '{id}', stopping");
			return false;
		}
		self.previous_empty = empty;
		true
	}

	/// count a walked page, false once `max_pages` is reached (0 never stops)
	fn advance(&mut self, collection: &str) -> bool {
		self.walked += 1;
		if self.max_pages != 0 && self.walked >= self.max_pages {
			tracing::warn!("stopping walk of '{collection}' after {} pages", self.walked);
			return false;
		}
		true
	}
}

/// load a page, reporting failures; None when it failed or nobody is listening anymore
async fn fetch(ctx: &Context, out: &Yielder<Document>, doc: &Document) -> Option<Document> {
	out.guard(doc.load()).await?.or_report(ctx, doc.id())
}

#[cfg(test)]
mod test {
	use std::sync::{Arc, Mutex};

	use apg::{client::Memory, Document, DocumentError};
	use futures::StreamExt;
	use serde_json::json;

	use super::{Collector, Direction};
	use crate::{walk::StopToken, Config, Context};

	const COLLECTION: &str = "https://a/c";

	fn page_id(n: usize) -> String {
		format!("{COLLECTION}?page={n}")
	}

	/// `pages` pages of `per` items each, items numbered from 1
	fn paged(pages: usize, per: usize) -> Memory {
		let mut client = Memory::new();
		for n in 1..=pages {
			let items : Vec<String> = (1..=per)
				.map(|i| format!("https://a/item/{}", (n - 1) * per + i))
				.collect();
			let mut page = json!({
				"id": page_id(n),
				"type": "OrderedCollectionPage",
				"partOf": COLLECTION,
				"orderedItems": items,
			});
			if n < pages {
				page["next"] = json!(page_id(n + 1));
			}
			if n > 1 {
				page["prev"] = json!(page_id(n - 1));
			}
			client = client.with(&page_id(n), page);
		}
		client
	}

	fn root(pages: usize) -> serde_json::Value {
		json!({
			"id": COLLECTION,
			"type": "OrderedCollection",
			"first": page_id(1),
			"last": page_id(pages),
		})
	}

	fn item(n: usize) -> String {
		format!("https://a/item/{n}")
	}

	async fn ids(walk: crate::Walk<Document>) -> Vec<String> {
		walk.map(|doc| doc.id().to_string()).collect().await
	}

	#[tokio::test]
	async fn flattens_pages_in_order() {
		let client = Arc::new(paged(3, 3));
		let ctx = Context::new(Config::default(), client.clone());
		let collection = ctx.document(root(3));
		assert_eq!(ids(ctx.items(&collection)).await, (1..=9).map(item).collect::<Vec<_>>());
		assert_eq!(client.calls(), 3);
	}

	#[tokio::test]
	async fn reverse_is_exact_reverse_of_forward() {
		let ctx = Context::new(Config::default(), Arc::new(paged(3, 3)));
		let collection = ctx.document(root(3));
		let mut forward = ids(ctx.items(&collection)).await;
		forward.reverse();
		assert_eq!(ids(ctx.items_reverse(&collection)).await, forward);

		let pages = ids(ctx.pages(&collection, Direction::Backward)).await;
		assert_eq!(pages, vec![page_id(3), page_id(2), page_id(1)]);
	}

	#[tokio::test]
	async fn collections_without_pages_are_their_own_page() {
		let ctx = Context::default();
		let collection = ctx.document(json!({
			"id": COLLECTION,
			"type": "Collection",
			"items": [ "https://a/item/1", "https://a/item/2" ],
		}));
		assert_eq!(ids(ctx.items(&collection)).await, vec![item(1), item(2)]);
		assert_eq!(ctx.count_items(&collection).await, 2);
	}

	#[tokio::test]
	async fn stays_at_most_one_fetch_ahead() {
		let client = Arc::new(paged(5, 3));
		let ctx = Context::new(Config::default(), client.clone());
		let collection = ctx.document(root(5));
		let first : Vec<Document> = ctx.items(&collection).take(3).collect().await;
		assert_eq!(first.len(), 3);
		assert!(client.calls() <= 2, "walk fetched {} pages for a single page of items", client.calls());
	}

	#[tokio::test]
	async fn trailing_empty_pages_terminate() {
		let mut client = Memory::new()
			.with(&page_id(1), json!({ "id": page_id(1), "orderedItems": [ item(1), item(2) ], "next": page_id(2) }));
		for n in 2..=5 {
			// every empty page keeps pointing further, forever
			client = client.with(&page_id(n), json!({ "id": page_id(n), "orderedItems": [], "next": page_id(n + 1) }));
		}
		let client = Arc::new(client);
		let ctx = Context::new(Config::default(), client.clone());
		let collection = ctx.document(root(5));

		let pages = ids(ctx.pages(&collection, Direction::Forward)).await;
		assert_eq!(pages, vec![page_id(1), page_id(2)]);
		assert_eq!(client.calls(), 3);
	}

	#[tokio::test]
	async fn looping_pages_terminate() {
		let client = Memory::new()
			.with(&page_id(1), json!({ "id": page_id(1), "orderedItems": [ item(1) ], "next": page_id(2) }))
			.with(&page_id(2), json!({ "id": page_id(2), "orderedItems": [ item(2) ], "next": page_id(1) }));
		let ctx = Context::new(Config::default(), Arc::new(client));
		let collection = ctx.document(root(2));
		assert_eq!(ids(ctx.items(&collection)).await, vec![item(1), item(2)]);
	}

	#[tokio::test]
	async fn page_limit_caps_the_walk() {
		let mut cfg = Config::default();
		cfg.security.max_pages = 2;
		let ctx = Context::new(cfg, Arc::new(paged(3, 3)));
		let collection = ctx.document(root(3));
		assert_eq!(ids(ctx.items(&collection)).await.len(), 6);
	}

	#[tokio::test]
	async fn total_items_needs_no_fetch() {
		let client = Arc::new(paged(3, 3));
		let ctx = Context::new(Config::default(), client.clone());
		let collection = ctx.document(json!({ "id": COLLECTION, "totalItems": 42, "first": page_id(1) }));
		assert_eq!(ctx.count_items(&collection).await, 42);
		assert_eq!(client.calls(), 0);
	}

	#[tokio::test]
	async fn counts_by_walking_when_total_is_missing() {
		let ctx = Context::new(Config::default(), Arc::new(paged(3, 3)));
		let collection = ctx.document(json!({ "id": COLLECTION, "totalItems": 0, "first": page_id(1) }));
		assert_eq!(ctx.count_items(&collection).await, 9);
	}

	#[tokio::test]
	async fn broken_pages_are_reported_and_partial_count_returned() {
		let reported = Arc::new(Mutex::new(Vec::new()));
		let reported_c = reported.clone();
		let client = Memory::new()
			.with(&page_id(1), json!({ "id": page_id(1), "orderedItems": [ item(1), item(2), item(3) ], "next": page_id(2) }));
		let ctx = Context::new(Config::default(), Arc::new(client))
			.with_sink(move |uri: &str, e: &DocumentError| {
				reported_c.lock().unwrap().push((uri.to_string(), e.is_not_found()));
			});
		let collection = ctx.document(root(2));
		assert_eq!(ctx.count_items(&collection).await, 3);
		assert_eq!(*reported.lock().unwrap(), vec![(page_id(2), true)]);
	}

	#[tokio::test]
	async fn unreachable_collection_counts_zero() {
		let ctx = Context::new(Config::default(), Arc::new(Memory::new()));
		assert_eq!(ctx.count_items(&ctx.document(COLLECTION)).await, 0);
	}

	#[tokio::test]
	async fn stop_token_halts_traversal() {
		let (signal, stop) = StopToken::new();
		let ctx = Context::new(Config::default(), Arc::new(paged(3, 3))).with_stop(stop);
		let collection = ctx.document(root(3));
		let mut walk = ctx.items(&collection);
		assert!(walk.next().await.is_some());
		signal.stop();
		let rest : Vec<Document> = walk.collect().await;
		assert!(rest.len() <= 1);
	}

	#[tokio::test]
	async fn backward_walk_without_last_replays_forward_pages() {
		let ctx = Context::new(Config::default(), Arc::new(paged(3, 3)));
		let collection = ctx.document(json!({ "id": COLLECTION, "totalItems": 9, "first": page_id(1) }));
		let mut forward = ids(ctx.items(&collection)).await;
		assert_eq!(forward.len(), 9);
		forward.reverse();
		assert_eq!(ids(ctx.items_reverse(&collection)).await, forward);

		let pages = ids(ctx.pages(&collection, Direction::Backward)).await;
		assert_eq!(pages, vec![page_id(3), page_id(2), page_id(1)]);
	}

	#[tokio::test]
	async fn backward_walk_without_prev_links_replays_forward_pages() {
		let mut client = Memory::new();
		for n in 1..=3 {
			let mut page = json!({ "id": page_id(n), "orderedItems": [ item(n) ] });
			if n < 3 {
				page["next"] = json!(page_id(n + 1));
			}
			client = client.with(&page_id(n), page);
		}
		let ctx = Context::new(Config::default(), Arc::new(client));
		let collection = ctx.document(root(3));
		assert_eq!(ids(ctx.items_reverse(&collection)).await, vec![item(3), item(2), item(1)]);
	}

	#[tokio::test]
	async fn panics_while_counting_are_reported_with_partial_count() {
		struct Exploding(Memory);

		#[async_trait::async_trait]
		impl apg::Client for Exploding {
			async fn load(&self, uri: &str) -> Result<Document, DocumentError> {
				if uri == page_id(2) {
					panic!("deep deref blew up");
				}
				self.0.load(uri).await
			}
		}

		let reported = Arc::new(Mutex::new(Vec::new()));
		let reported_c = reported.clone();
		let ctx = Context::new(Config::default(), Arc::new(Exploding(paged(3, 3))))
			.with_sink(move |uri: &str, e: &DocumentError| {
				reported_c.lock().unwrap().push((uri.to_string(), matches!(e, DocumentError::Internal(_))));
			});
		let collection = ctx.document(root(3));
		assert_eq!(ctx.count_items(&collection).await, 3);
		assert_eq!(*reported.lock().unwrap(), vec![(COLLECTION.to_string(), true)]);
	}
}
