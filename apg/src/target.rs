use crate::Document;

pub const PUBLIC : &str = "https://www.w3.org/ns/activitystreams#Public";

/// the public collection may also be spelled in its compacted forms
pub fn is_public(id: &str) -> bool {
	matches!(id, PUBLIC | "as:Public" | "Public")
}

/// Embedded audience of an object, nothing gets fetched
pub trait Addressed {
	fn addressed(&self) -> Vec<String>;
	fn mentioning(&self) -> Vec<String>;
}

impl Addressed for Document {
	fn addressed(&self) -> Vec<String> {
		let mut to = self.property("to").all_ids();
		to.append(&mut self.property("cc").all_ids());
		to.append(&mut self.property("bto").all_ids());
		to.append(&mut self.property("bcc").all_ids());
		to
	}

	fn mentioning(&self) -> Vec<String> {
		let mut to = self.property("to").all_ids();
		to.append(&mut self.property("bto").all_ids());
		to
	}
}

#[cfg(test)]
mod test {
	use super::Addressed;

	#[test]
	fn recognizes_all_spellings_of_public() {
		assert!(super::is_public(super::PUBLIC));
		assert!(super::is_public("as:Public"));
		assert!(!super::is_public("https://example.org/users/root/followers"));
	}

	#[test]
	fn addressed_finds_all_targets() {
		let obj = crate::Document::new(serde_json::json!({
			"id": "http://localhost:8080/obj/1",
			"type": "Note",
			"to": ["http://localhost:8080/usr/root/followers"],
			"bto": ["https://localhost:8080/usr/secret"],
			"cc": [super::PUBLIC, { "id": "http://localhost:8080/usr/embedded" }],
			"bcc": [],
		}));

		assert_eq!(
			obj.addressed(),
			vec![
				"http://localhost:8080/usr/root/followers".to_string(),
				super::PUBLIC.to_string(),
				"http://localhost:8080/usr/embedded".to_string(),
				"https://localhost:8080/usr/secret".to_string(),
			]
		);
		assert_eq!(
			obj.mentioning(),
			vec![
				"http://localhost:8080/usr/root/followers".to_string(),
				"https://localhost:8080/usr/secret".to_string(),
			]
		);
	}
}
