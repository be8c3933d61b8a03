use std::collections::BTreeSet;

/// Remembers what it has already seen, to drop repeated ids from a stream of them
#[derive(Debug, Clone)]
pub struct Uniquer<T: Ord>(BTreeSet<T>);

impl<T: Ord> Default for Uniquer<T> {
	fn default() -> Self {
		Uniquer(BTreeSet::new())
	}
}

impl<T: Ord> Uniquer<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// true the first time an id is offered, false afterwards
	pub fn is_unique(&mut self, id: T) -> bool {
		self.0.insert(id)
	}

	pub fn is_duplicate(&mut self, id: T) -> bool {
		!self.is_unique(id)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn into_inner(self) -> BTreeSet<T> {
		self.0
	}
}
