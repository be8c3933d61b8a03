use crate::{Document, Value};

pub const CONTENT_TYPE_LD_JSON_ACTIVITYPUB: &str = "application/ld+json; profile=\"https://www.w3.org/ns/activitystreams\"";
pub const CONTENT_TYPE_ACTIVITY_JSON: &str = "application/activity+json";

pub trait LD {
	fn ld_context(self) -> Self;
}

impl LD for Value {
	fn ld_context(mut self) -> Self {
		if let Value::Map(ref mut obj) = self {
			obj.insert(
				"@context".to_string(),
				Value::slice([
					Value::from("https://www.w3.org/ns/activitystreams"),
					Value::from("https://w3id.org/security/v1"),
				]),
			);
		} else {
			tracing::warn!("cannot add @context to value different than object");
		}
		self
	}
}

impl LD for Document {
	fn ld_context(self) -> Self {
		self.map_value(LD::ld_context)
	}
}
