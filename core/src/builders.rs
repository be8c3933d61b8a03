use apg::{CollectionType, Value, LD};

use crate::config::CollectionsConfig;

/// cursor of the first page of a collection
pub const FIRST_CURSOR: &str = "0";

pub fn page_link(id: &str, cursor: &str) -> String {
	format!("{id}?after={cursor}")
}

/// One item of a served collection, with the opaque cursor storage assigned to it
#[derive(Debug, Clone)]
pub struct Entry {
	pub cursor: String,
	pub item: Value,
}

impl Entry {
	pub fn new(cursor: impl ToString, item: impl Into<Value>) -> Self {
		Entry { cursor: cursor.to_string(), item: item.into() }
	}
}

impl CollectionsConfig {
	/// how many items storage should load to answer a request at this cursor
	pub fn limit(&self, cursor: Option<&str>, total: u64) -> usize {
		match cursor {
			Some(_) => self.page_size,
			None if total <= self.full_collection as u64 => total as usize,
			None => 0,
		}
	}

	/// answer a request for a collection root (`cursor` is None) or one of its pages
	pub fn serve(&self, id: &str, cursor: Option<&str>, total: u64, items: Vec<Entry>) -> Value {
		match cursor {
			None => self.collection(id, total, items),
			Some(cursor) => self.collection_page(id, cursor, items),
		}
	}

	/// small collections are served whole, bigger ones only link their first page
	pub fn collection(&self, id: &str, total: u64, items: Vec<Entry>) -> Value {
		let base = apg::new()
			.with("id", id)
			.with("type", CollectionType::OrderedCollection.as_ref())
			.with("totalItems", total);

		if total as usize <= self.full_collection {
			let items : Vec<Value> = items.into_iter().map(|e| e.item).collect();
			base.with("orderedItems", Value::Slice(items)).ld_context()
		} else {
			base.with("first", page_link(id, FIRST_CURSOR)).ld_context()
		}
	}

	pub fn collection_page(&self, id: &str, cursor: &str, items: Vec<Entry>) -> Value {
		let next = if items.len() < self.page_size {
			None
		} else {
			items.last().map(|e| page_link(id, &e.cursor))
		};
		let items : Vec<Value> = items.into_iter().map(|e| e.item).collect();

		apg::new()
			.with("id", page_link(id, cursor))
			.with("type", CollectionType::OrderedCollectionPage.as_ref())
			.with("partOf", id)
			.with("orderedItems", Value::Slice(items))
			.with("next", next)
			.ld_context()
	}
}
