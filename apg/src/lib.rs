mod macros;

pub mod value;
pub use value::{Map, Value};

mod error;
pub use error::DocumentError;

mod types;
pub use types::{ActivityType, ActorType, CollectionType, ObjectType, TypeValueError};

pub mod client;
pub use client::Client;

pub mod document;
pub use document::Document;

mod uniquer;
pub use uniquer::Uniquer;

pub mod jsonld;
pub use jsonld::LD;

pub mod target;

/// empty object, ready to be filled for outbound documents
pub fn new() -> Value {
	Value::Map(Map::new())
}
