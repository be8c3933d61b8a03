#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
	#[error("resource not found: {0}")]
	NotFound(String),

	#[error("error fetching resource: {0}")]
	Transport(String),

	#[error("dereferenced resource is malformed: {0}")]
	Malformed(String),

	// invariant violations, like an activity wrapping itself
	#[error("internal error: {0}")]
	Internal(String),
}

impl DocumentError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, DocumentError::NotFound(_))
	}
}
