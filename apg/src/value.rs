use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

pub type Map = BTreeMap<String, Value>;

pub(crate) static NIL: Value = Value::Nil;

/// A JSON-LD property value: nothing, a scalar, an object, or many of them
///
/// ActivityStreams allows any property to be a bare id, an embedded object or an array of either,
/// so every variant supports the same operations: scalars and maps behave like a list of one
/// element, slices delegate scalar operations to their first element. Nothing here ever fails:
/// missing or mismatched data yields [`Value::Nil`] or a zero value.
///
/// Iterate any value with the head/tail idiom:
/// ```
/// let v = apg::Value::from(serde_json::json!(["a", "b"]));
/// let mut cur = v.clone();
/// while !cur.is_nil() {
/// 	println!("{}", cur.head().as_str());
/// 	cur = cur.tail();
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	#[default]
	Nil,
	Bool(bool),
	Int(i32),
	Int64(i64),
	Float(f64),
	String(String),
	Time(DateTime<Utc>),
	Map(Map),
	Slice(Vec<Value>),
}

impl Value {
	/// build a slice, flattening nested arrays and dropping nils
	pub fn slice(values: impl IntoIterator<Item = Value>) -> Self {
		let mut out = Vec::new();
		for v in values {
			flatten_into(v, &mut out);
		}
		Value::Slice(out)
	}

	pub fn get(&self, key: &str) -> &Value {
		match self {
			Value::String(_) if key == "id" => self,
			Value::Map(map) => map.get(key).unwrap_or(&NIL),
			Value::Slice(_) => self.head().get(key),
			_ => &NIL,
		}
	}

	/// first element for slices, the value itself for everything else
	pub fn head(&self) -> &Value {
		match self {
			Value::Slice(arr) => arr.first().map(Value::head).unwrap_or(&NIL),
			_ => self,
		}
	}

	/// everything but the first element, nil once fewer than two elements remain
	pub fn tail(&self) -> Value {
		match self {
			Value::Slice(arr) if arr.len() >= 2 => Value::Slice(arr[1..].to_vec()),
			_ => Value::Nil,
		}
	}

	pub fn len(&self) -> usize {
		match self {
			Value::Nil => 0,
			Value::Slice(arr) => arr.len(),
			_ => 1,
		}
	}

	pub fn is_nil(&self) -> bool {
		self.len() == 0
	}

	pub fn is_empty(&self) -> bool {
		self.is_nil()
	}

	pub fn is_string(&self) -> bool {
		matches!(self, Value::String(_))
	}

	pub fn is_map(&self) -> bool {
		matches!(self, Value::Map(_))
	}

	pub fn is_slice(&self) -> bool {
		matches!(self, Value::Slice(_))
	}

	/// iterate contained values: none for nil, one for scalars and maps
	pub fn iter(&self) -> std::slice::Iter<'_, Value> {
		match self {
			Value::Nil => [].iter(),
			Value::Slice(arr) => arr.iter(),
			_ => std::slice::from_ref(self).iter(),
		}
	}

	/// borrowed string content, maps yield their id
	pub fn as_str(&self) -> &str {
		match self {
			Value::String(s) => s,
			Value::Map(_) => self.get("id").as_str(),
			Value::Slice(_) => self.head().as_str(),
			_ => "",
		}
	}

	pub fn as_string(&self) -> String {
		match self {
			Value::Nil => String::new(),
			Value::Bool(x) => x.to_string(),
			Value::Int(x) => x.to_string(),
			Value::Int64(x) => x.to_string(),
			Value::Float(x) => x.to_string(),
			Value::String(x) => x.clone(),
			Value::Time(x) => x.to_rfc3339(),
			Value::Map(_) | Value::Slice(_) => self.as_str().to_string(),
		}
	}

	pub fn as_int(&self) -> i32 {
		match self {
			Value::Bool(x) => *x as i32,
			Value::Int(x) => *x,
			Value::Int64(x) => i32::try_from(*x).unwrap_or_default(),
			Value::Float(x) => *x as i32,
			Value::String(x) => x.trim().parse().unwrap_or_default(),
			Value::Slice(_) => self.head().as_int(),
			Value::Nil | Value::Time(_) | Value::Map(_) => 0,
		}
	}

	pub fn as_int64(&self) -> i64 {
		match self {
			Value::Bool(x) => *x as i64,
			Value::Int(x) => *x as i64,
			Value::Int64(x) => *x,
			Value::Float(x) => *x as i64,
			Value::String(x) => x.trim().parse().unwrap_or_default(),
			Value::Time(x) => x.timestamp(),
			Value::Slice(_) => self.head().as_int64(),
			Value::Nil | Value::Map(_) => 0,
		}
	}

	pub fn as_float(&self) -> f64 {
		match self {
			Value::Bool(x) => if *x { 1.0 } else { 0.0 },
			Value::Int(x) => *x as f64,
			Value::Int64(x) => *x as f64,
			Value::Float(x) => *x,
			Value::String(x) => x.trim().parse().unwrap_or_default(),
			Value::Slice(_) => self.head().as_float(),
			Value::Nil | Value::Time(_) | Value::Map(_) => 0.0,
		}
	}

	pub fn as_bool(&self) -> bool {
		match self {
			Value::Bool(x) => *x,
			Value::Int(x) => *x != 0,
			Value::Int64(x) => *x != 0,
			Value::Float(x) => *x != 0.0,
			Value::String(x) => x.trim().eq_ignore_ascii_case("true"),
			Value::Slice(_) => self.head().as_bool(),
			Value::Nil | Value::Time(_) | Value::Map(_) => false,
		}
	}

	/// rfc3339 strings and unix timestamps are understood, anything else is the epoch
	pub fn as_time(&self) -> DateTime<Utc> {
		match self {
			Value::Time(x) => *x,
			Value::String(x) => DateTime::parse_from_rfc3339(x.trim())
				.map(|t| t.with_timezone(&Utc))
				.unwrap_or_default(),
			Value::Int(x) => DateTime::from_timestamp(*x as i64, 0).unwrap_or_default(),
			Value::Int64(x) => DateTime::from_timestamp(*x, 0).unwrap_or_default(),
			Value::Slice(_) => self.head().as_time(),
			Value::Nil | Value::Bool(_) | Value::Float(_) | Value::Map(_) => DateTime::default(),
		}
	}

	/// object view of this value, a bare string becomes `{"id": <string>}`
	pub fn map(&self) -> Map {
		match self {
			Value::Map(map) => map.clone(),
			Value::String(id) => Map::from([("id".to_string(), Value::String(id.clone()))]),
			Value::Slice(_) => self.head().map(),
			_ => Map::new(),
		}
	}

	/// set a property on this value (or on its head), setting nil removes the property
	pub fn set(&mut self, key: &str, val: impl Into<Value>) {
		let val = val.into();
		match self {
			Value::Map(map) => {
				if matches!(val, Value::Nil) {
					map.remove(key);
				} else {
					map.insert(key.to_string(), val);
				}
			},
			Value::Slice(arr) if !arr.is_empty() => arr[0].set(key, val),
			Value::Nil | Value::Slice(_) => {
				if !matches!(val, Value::Nil) {
					*self = Value::Map(Map::from([(key.to_string(), val)]));
				}
			},
			Value::String(id) => {
				let mut map = Map::from([("id".to_string(), Value::String(std::mem::take(id)))]);
				if !matches!(val, Value::Nil) {
					map.insert(key.to_string(), val);
				}
				*self = Value::Map(map);
			},
			_ => tracing::error!("error setting '{key}' on value: not an object"),
		}
	}

	/// add one more value to a property, turning it into an array if necessary
	pub fn append(&mut self, key: &str, val: impl Into<Value>) {
		let val = val.into();
		if val.is_nil() || matches!(&val, Value::String(s) if s.is_empty()) {
			return;
		}
		let current = self.head().get(key).clone();
		if current.is_nil() {
			self.set(key, val);
		} else {
			self.set(key, Value::slice([current, val]));
		}
	}

	/// builder flavor of [`Value::set`]
	pub fn with(mut self, key: &str, val: impl Into<Value>) -> Self {
		self.set(key, val);
		self
	}
}

fn flatten_into(value: Value, out: &mut Vec<Value>) {
	match value {
		Value::Nil => {},
		Value::Slice(arr) => {
			for v in arr {
				flatten_into(v, out);
			}
		},
		x => out.push(x),
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int64(value)
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Value::Int64(value.min(i64::MAX as u64) as i64)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<&String> for Value {
	fn from(value: &String) -> Self {
		Value::String(value.clone())
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(value: DateTime<Utc>) -> Self {
		Value::Time(value)
	}
}

impl From<Map> for Value {
	fn from(value: Map) -> Self {
		Value::Map(value)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(value: Vec<T>) -> Self {
		Value::slice(value.into_iter().map(Into::into))
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		match value {
			Some(x) => x.into(),
			None => Value::Nil,
		}
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::Nil,
			serde_json::Value::Bool(x) => Value::Bool(x),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(x) => match i32::try_from(x) {
					Ok(small) => Value::Int(small),
					Err(_) => Value::Int64(x),
				},
				None => Value::Float(n.as_f64().unwrap_or_default()),
			},
			serde_json::Value::String(x) => Value::String(x),
			serde_json::Value::Array(arr) => Value::slice(arr.into_iter().map(Value::from)),
			serde_json::Value::Object(obj) => Value::Map(
				obj.into_iter()
					.map(|(k, v)| (k, Value::from(v)))
					.collect()
			),
		}
	}
}

impl From<Value> for serde_json::Value {
	fn from(value: Value) -> Self {
		match value {
			Value::Nil => serde_json::Value::Null,
			Value::Bool(x) => serde_json::Value::Bool(x),
			Value::Int(x) => serde_json::Value::from(x),
			Value::Int64(x) => serde_json::Value::from(x),
			Value::Float(x) => serde_json::Number::from_f64(x)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
			Value::String(x) => serde_json::Value::String(x),
			Value::Time(x) => serde_json::Value::String(x.to_rfc3339()),
			Value::Map(map) => serde_json::Value::Object(
				map.into_iter()
					.map(|(k, v)| (k, serde_json::Value::from(v)))
					.collect()
			),
			Value::Slice(arr) => serde_json::Value::Array(
				arr.into_iter().map(serde_json::Value::from).collect()
			),
		}
	}
}

impl serde::Serialize for Value {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::Nil => serializer.serialize_unit(),
			Value::Bool(x) => serializer.serialize_bool(*x),
			Value::Int(x) => serializer.serialize_i32(*x),
			Value::Int64(x) => serializer.serialize_i64(*x),
			Value::Float(x) => serializer.serialize_f64(*x),
			Value::String(x) => serializer.serialize_str(x),
			Value::Time(x) => serializer.serialize_str(&x.to_rfc3339()),
			Value::Map(x) => x.serialize(serializer),
			Value::Slice(x) => x.serialize(serializer),
		}
	}
}

impl<'de> serde::Deserialize<'de> for Value {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		<serde_json::Value as serde::Deserialize>::deserialize(deserializer).map(Value::from)
	}
}

#[cfg(test)]
mod test {
	use super::Value;

	fn every_variant() -> Vec<Value> {
		vec![
			Value::Nil,
			Value::Bool(true),
			Value::Int(7),
			Value::Int64(1 << 40),
			Value::Float(2.5),
			Value::from("https://example.org/users/alice"),
			Value::Time(chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap()),
			Value::from(serde_json::json!({ "id": "https://example.org/objects/1" })),
			Value::from(serde_json::json!(["a", { "id": "b" }, 3])),
			Value::from(serde_json::json!([])),
		]
	}

	#[test]
	fn head_of_head_is_head_for_every_variant() {
		for v in every_variant() {
			assert_eq!(v.head().head(), v.head(), "failed on {v:?}");
		}
	}

	#[test]
	fn scalars_and_maps_behave_like_single_element_lists() {
		for v in every_variant().into_iter().filter(|v| !v.is_slice()) {
			assert_eq!(v.tail(), Value::Nil);
			assert_eq!(v.head(), &v);
		}
	}

	#[test]
	fn head_tail_walk_visits_every_element_in_order() {
		let v = Value::from(serde_json::json!(["a", "b", "c"]));
		let mut seen = Vec::new();
		let mut cur = v.clone();
		while !cur.is_nil() {
			seen.push(cur.head().as_string());
			cur = cur.tail();
		}
		assert_eq!(seen, vec!["a", "b", "c"]);
	}

	#[test]
	fn nested_arrays_are_flattened_and_nulls_dropped() {
		let v = Value::from(serde_json::json!([["a", null], "b", [["c"]]]));
		assert_eq!(v, Value::Slice(vec!["a".into(), "b".into(), "c".into()]));
	}

	#[test]
	fn bare_string_only_answers_id() {
		let v = Value::from("https://example.org/notes/1");
		assert_eq!(v.get("id").as_str(), "https://example.org/notes/1");
		assert!(v.get("type").is_nil());
		assert!(v.get("content").is_nil());
	}

	#[test]
	fn slices_delegate_scalar_operations_to_head() {
		let v = Value::from(serde_json::json!([{ "id": "x", "type": "Note" }, { "id": "y" }]));
		assert_eq!(v.get("type").as_str(), "Note");
		assert_eq!(v.as_string(), "x");
		assert_eq!(v.len(), 2);
	}

	#[test]
	fn conversions_never_fail() {
		let garbage = Value::from("not a number");
		assert_eq!(garbage.as_int(), 0);
		assert_eq!(garbage.as_int64(), 0);
		assert_eq!(garbage.as_float(), 0.0);
		assert!(!garbage.as_bool());
		assert_eq!(garbage.as_time(), chrono::DateTime::<chrono::Utc>::default());
		assert_eq!(Value::Int64(i64::MAX).as_int(), 0);
		assert_eq!(Value::from(" 42 ").as_int(), 42);
		assert_eq!(
			Value::from("2024-06-04T17:09:20+00:00").as_time().timestamp(),
			1717520960,
		);
	}

	#[test]
	fn json_numbers_pick_the_narrowest_integer() {
		assert_eq!(Value::from(serde_json::json!(42)), Value::Int(42));
		assert_eq!(Value::from(serde_json::json!(1u64 << 40)), Value::Int64(1 << 40));
		assert_eq!(Value::from(serde_json::json!(0.5)), Value::Float(0.5));
	}

	#[test]
	fn setting_on_a_bare_id_promotes_it_to_an_object() {
		let mut v = Value::from("https://example.org/users/bob");
		v.set("type", "Person");
		assert_eq!(v.get("id").as_str(), "https://example.org/users/bob");
		assert_eq!(v.get("type").as_str(), "Person");
		v.set("type", Value::Nil);
		assert!(v.get("type").is_nil());
	}

	#[test]
	fn append_grows_property_and_ignores_empty_strings() {
		let mut v = crate::new();
		v.append("to", "https://a.example/users/a");
		v.append("to", "");
		assert_eq!(v.get("to"), &Value::from("https://a.example/users/a"));
		v.append("to", "https://b.example/users/b");
		assert_eq!(v.get("to").len(), 2);
		assert_eq!(v.get("to").tail().as_str(), "https://b.example/users/b");
	}

	#[test]
	fn serialization_matches_json_shape() {
		let raw = serde_json::json!({
			"id": "https://example.org/activities/1",
			"to": ["https://example.org/users/a"],
			"totalItems": 3,
		});
		let v = Value::from(raw.clone());
		assert_eq!(serde_json::to_value(&v).unwrap(), raw);
		let back : Value = serde_json::from_value(raw).unwrap();
		assert_eq!(back, v);
	}
}
