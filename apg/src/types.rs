#[derive(Debug, thiserror::Error)]
#[error("invalid type value")]
pub struct TypeValueError;

macro_rules! strenum {
	( $(pub enum $enum_name:ident { $($flat:ident),* ; $($deep:ident($inner:ident)),* };)+ ) => {
		$(
			#[derive(PartialEq, Eq, Debug, Clone, Copy)]
			pub enum $enum_name {
				$($flat,)*
				$($deep($inner),)*
			}

			impl AsRef<str> for $enum_name {
				fn as_ref(&self) -> &str {
					match self {
						$(Self::$flat => stringify!($flat),)*
						$(Self::$deep(x) => x.as_ref(),)*
					}
				}
			}

			impl TryFrom<&str> for $enum_name {
				type Error = TypeValueError;

				fn try_from(value: &str) -> Result<Self, Self::Error> {
					// compacted "as:Note" is common enough to accept it too
					let value = value.strip_prefix("as:").unwrap_or(value);
					match value {
						$(stringify!($flat) => Ok(Self::$flat),)*
						_ => {
							$(
								if let Ok(x) = $inner::try_from(value) {
									return Ok(Self::$deep(x));
								}
							)*
							Err(TypeValueError)
						},
					}
				}
			}
		)*
	};
}

strenum! {
	pub enum ActivityType {
		Activity,
		Accept,
		Add,
		Announce,
		Arrive,
		Block,
		Create,
		Delete,
		Dislike,
		Flag,
		Follow,
		Ignore,
		Invite,
		Join,
		Leave,
		Like,
		Listen,
		Move,
		Offer,
		Question,
		Reject,
		Read,
		Remove,
		TentativeReject,
		TentativeAccept,
		Travel,
		Undo,
		Update,
		View;
	};

	pub enum ActorType {
		Application,
		Group,
		Organization,
		Person,
		Service;
	};

	pub enum CollectionType {
		Collection,
		CollectionPage,
		OrderedCollection,
		OrderedCollectionPage;
	};

	pub enum ObjectType {
		Object,
		Article,
		Audio,
		Document,
		Event,
		Image,
		Note,
		Page,
		Place,
		Profile,
		Relationship,
		Tombstone,
		Video;

		Activity(ActivityType),
		Actor(ActorType),
		Collection(CollectionType)
	};
}

impl ObjectType {
	/// plain content objects, not activities, actors or collections
	pub fn is_content(&self) -> bool {
		!matches!(self, Self::Activity(_) | Self::Actor(_) | Self::Collection(_))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn nested_vocabularies_resolve() {
		assert_eq!(ObjectType::try_from("Create").unwrap(), ObjectType::Activity(ActivityType::Create));
		assert_eq!(ObjectType::try_from("as:Person").unwrap(), ObjectType::Actor(ActorType::Person));
		assert_eq!(ObjectType::try_from("OrderedCollectionPage").unwrap().as_ref(), "OrderedCollectionPage");
		assert!(ObjectType::try_from("Emoji").is_err());
		assert!(ObjectType::Note.is_content());
		assert!(!ObjectType::Activity(ActivityType::Like).is_content());
	}
}
