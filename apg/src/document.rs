use std::{collections::BTreeMap, sync::Arc};

use crate::{
	client::Offline, macros::{getter, setter},
	ActivityType, ActorType, Client, CollectionType, DocumentError, ObjectType, Uniquer, Value,
};

pub type Metadata = BTreeMap<String, Value>;

/// how many nested activities [`Document::unwrap_activity`] will peel before giving up
pub const DEFAULT_UNWRAP_DEPTH: usize = 16;

/// One node of the federated object graph: a bare id, an embedded object, or many of them
///
/// Every document derived from another one (properties, array elements, loaded objects) shares
/// the parent's client and metadata, so navigation keeps resolving links transitively:
/// `doc.actor().await.public_key().await` works the same whether the actor was embedded or not.
/// Failed lookups never raise, they produce nil documents which can be navigated further.
#[derive(Clone)]
pub struct Document {
	value: Value,
	client: Arc<dyn Client>,
	metadata: Arc<Metadata>,
}

impl std::fmt::Debug for Document {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Document")
			.field("value", &self.value)
			.field("metadata", &self.metadata)
			.finish_non_exhaustive()
	}
}

impl serde::Serialize for Document {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.value.serialize(serializer)
	}
}

impl From<Value> for Document {
	fn from(value: Value) -> Self {
		Document::new(value)
	}
}

impl From<serde_json::Value> for Document {
	fn from(value: serde_json::Value) -> Self {
		Document::new(value)
	}
}

impl Document {
	/// wrap a raw value, links won't resolve until a client is bound
	pub fn new(raw: impl Into<Value>) -> Self {
		Self::with_client(raw, Arc::new(Offline))
	}

	pub fn with_client(raw: impl Into<Value>, client: Arc<dyn Client>) -> Self {
		Document {
			value: raw.into(),
			client,
			metadata: Arc::default(),
		}
	}

	pub fn nil() -> Self {
		Self::new(Value::Nil)
	}

	fn derive(&self, value: Value) -> Self {
		Document {
			value,
			client: self.client.clone(),
			metadata: self.metadata.clone(),
		}
	}

	pub fn value(&self) -> &Value {
		&self.value
	}

	pub fn into_value(self) -> Value {
		self.value
	}

	pub fn map_value(mut self, f: impl FnOnce(Value) -> Value) -> Self {
		self.value = f(std::mem::take(&mut self.value));
		self
	}

	pub fn client(&self) -> Arc<dyn Client> {
		self.client.clone()
	}

	pub fn metadata(&self) -> &Metadata {
		&self.metadata
	}

	pub fn meta(&self, key: &str) -> &Value {
		self.metadata.get(key).unwrap_or(&crate::value::NIL)
	}

	pub fn with_metadata(mut self, key: &str, val: impl Into<Value>) -> Self {
		Arc::make_mut(&mut self.metadata).insert(key.to_string(), val.into());
		self
	}

	/// a bare id is its own id, objects carry theirs in `"id"`
	pub fn id(&self) -> &str {
		self.value.get("id").as_str()
	}

	pub fn is_nil(&self) -> bool {
		self.value.is_nil()
	}

	/// true when this document (or its head) is a bare id still to be fetched
	pub fn is_link(&self) -> bool {
		self.value.head().is_string()
	}

	pub fn len(&self) -> usize {
		self.value.len()
	}

	pub fn is_empty(&self) -> bool {
		self.value.is_empty()
	}

	pub fn head(&self) -> Document {
		self.derive(self.value.head().clone())
	}

	pub fn tail(&self) -> Document {
		self.derive(self.value.tail())
	}

	pub fn iter(&self) -> impl Iterator<Item = Document> + '_ {
		self.value.iter().map(|v| self.derive(v.clone()))
	}

	/// ids of every element, embedded objects answering with their `"id"`
	pub fn all_ids(&self) -> Vec<String> {
		self.value.iter()
			.map(Value::as_string)
			.filter(|id| !id.is_empty())
			.collect()
	}

	/// embedded property, never touches the network
	pub fn property(&self, key: &str) -> Document {
		self.derive(self.value.get(key).clone())
	}

	/// property access which transparently dereferences bare ids, degrading to nil on failure
	pub async fn get(&self, key: &str) -> Document {
		match self.try_get(key).await {
			Ok(doc) => doc,
			Err(e) => {
				tracing::debug!("could not dereference '{}' for property '{key}': {e}", self.id());
				self.derive(Value::Nil)
			},
		}
	}

	pub async fn try_get(&self, key: &str) -> Result<Document, DocumentError> {
		if key != "id" && self.is_link() {
			return Ok(self.load().await?.property(key));
		}
		Ok(self.property(key))
	}

	/// resolve into an object-shaped document (or nil), fetching it if this is a bare id
	pub async fn load(&self) -> Result<Document, DocumentError> {
		match self.value.head() {
			Value::Nil => Ok(self.derive(Value::Nil)),
			Value::Map(_) => Ok(self.head()),
			Value::String(uri) => {
				tracing::debug!("dereferencing {uri}");
				let Document { value, metadata, .. } = self.client.load(uri).await?;
				let value = match value {
					Value::Slice(_) => value.head().clone(),
					other => other,
				};
				match value {
					Value::Map(_) | Value::Nil => Ok(Document { value, metadata, client: self.client.clone() }),
					_ => Err(DocumentError::Malformed(format!("{uri} did not resolve to an object"))),
				}
			},
			_ => Err(DocumentError::Malformed("scalar value can't be loaded".to_string())),
		}
	}

	/// loaded version of this document, nil if it can't be fetched
	pub async fn resolved(&self) -> Document {
		match self.load().await {
			Ok(doc) => doc,
			Err(e) => {
				tracing::debug!("could not load '{}': {e}", self.id());
				self.derive(Value::Nil)
			},
		}
	}

	/// all values of the embedded `"type"` property
	pub fn types(&self) -> impl Iterator<Item = &str> {
		self.value.head().get("type").iter().map(Value::as_str)
	}

	pub fn object_type(&self) -> Option<ObjectType> {
		self.types().find_map(|t| ObjectType::try_from(t).ok())
	}

	pub fn is_activity(&self) -> bool {
		self.types().any(|t| ActivityType::try_from(t).is_ok())
	}

	pub fn is_actor(&self) -> bool {
		self.types().any(|t| ActorType::try_from(t).is_ok())
	}

	pub fn is_collection(&self) -> bool {
		self.types().any(|t| CollectionType::try_from(t).is_ok())
	}

	pub fn is_object(&self) -> bool {
		self.types()
			.filter_map(|t| ObjectType::try_from(t).ok())
			.any(|t| t.is_content())
	}

	/// embedded items of a collection or page, `orderedItems` winning over `items`
	pub fn embedded_items(&self) -> Document {
		let ordered = self.property("orderedItems");
		if !ordered.is_nil() {
			return ordered;
		}
		self.property("items")
	}

	pub async fn items(&self) -> Document {
		self.resolved().await.embedded_items()
	}

	pub async fn type_of(&self) -> String {
		self.get("type").await.value().as_string()
	}

	getter! { actor -> node }
	getter! { object -> node }
	getter! { target -> node }
	getter! { to -> node }
	getter! { cc -> node }
	getter! { bto -> node }
	getter! { bcc -> node }
	getter! { in_reply_to::inReplyTo -> node }
	getter! { tag -> node }
	getter! { attributed_to::attributedTo -> node }
	getter! { context -> node }
	getter! { replies -> node }
	getter! { ordered_items::orderedItems -> node }
	getter! { current -> node }
	getter! { first -> node }
	getter! { last -> node }
	getter! { next -> node }
	getter! { prev -> node }
	getter! { part_of::partOf -> node }
	getter! { inbox -> node }
	getter! { outbox -> node }
	getter! { followers -> node }
	getter! { following -> node }
	getter! { liked -> node }
	getter! { public_key::publicKey -> node }

	getter! { name -> String }
	getter! { content -> String }
	getter! { summary -> String }
	getter! { href -> String }
	getter! { media_type::mediaType -> String }
	getter! { preferred_username::preferredUsername -> String }
	getter! { public_key_pem::publicKeyPem -> String }
	getter! { total_items::totalItems -> i64 }
	getter! { published -> chrono::DateTime<chrono::Utc> }
	getter! { updated -> chrono::DateTime<chrono::Utc> }

	/// keep peeling `object` off activities (Announce → Create → Note) until reaching content
	pub async fn unwrap_activity(&self) -> Result<Document, DocumentError> {
		self.unwrap_activity_within(DEFAULT_UNWRAP_DEPTH).await
	}

	pub async fn unwrap_activity_within(&self, max_depth: usize) -> Result<Document, DocumentError> {
		let mut seen = Uniquer::new();
		let mut current = self.load().await?;
		for _ in 0..=max_depth {
			if !current.is_activity() {
				return Ok(current);
			}
			let id = current.id().to_string();
			if !id.is_empty() && seen.is_duplicate(id.clone()) {
				return Err(DocumentError::Internal(format!("activity {id} wraps itself")));
			}
			current = current.property("object").load().await?;
		}
		Err(DocumentError::Internal(
			format!("activity {} nests more than {max_depth} activities", self.id())
		))
	}

	/// set a property on the head of this document, nil removes it
	pub fn set(mut self, key: &str, val: impl Into<Value>) -> Self {
		self.value.set(key, val);
		self
	}

	/// add a value to a property of the head of this document, empty strings are ignored
	pub fn append(mut self, key: &str, val: impl Into<Value>) -> Self {
		self.value.append(key, val);
		self
	}

	pub fn set_type(self, val: impl AsRef<str>) -> Self {
		self.set("type", val.as_ref())
	}

	setter! { id }
	setter! { actor }
	setter! { object }
	setter! { target }
	setter! { to, many }
	setter! { cc, many }
	setter! { bto, many }
	setter! { bcc, many }
	setter! { tag, many }
	setter! { in_reply_to::inReplyTo }
	setter! { attributed_to::attributedTo }
	setter! { content }
	setter! { published }
}
