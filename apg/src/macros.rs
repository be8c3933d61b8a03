// accessors generated on Document, all of them dereference bare ids through the client

macro_rules! getter {
	($name:ident::$rename:ident -> node) => {
		pub async fn $name(&self) -> $crate::Document {
			self.get(stringify!($rename)).await
		}
	};

	($name:ident::$rename:ident -> String) => {
		pub async fn $name(&self) -> String {
			self.get(stringify!($rename)).await.value().as_string()
		}
	};

	($name:ident::$rename:ident -> i64) => {
		pub async fn $name(&self) -> i64 {
			self.get(stringify!($rename)).await.value().as_int64()
		}
	};

	($name:ident::$rename:ident -> chrono::DateTime<chrono::Utc>) => {
		pub async fn $name(&self) -> chrono::DateTime<chrono::Utc> {
			self.get(stringify!($rename)).await.value().as_time()
		}
	};

	($name:ident -> $($t:tt)+) => {
		$crate::macros::getter! { $name::$name -> $($t)+ }
	};
}

pub(crate) use getter;

macro_rules! setter {
	($name:ident::$rename:ident) => {
		paste::paste! {
			pub fn [< set_ $name >](self, val: impl Into<$crate::Value>) -> Self {
				self.set(stringify!($rename), val)
			}
		}
	};

	// multi-valued properties also get an appender
	($name:ident::$rename:ident, many) => {
		$crate::macros::setter! { $name::$rename }

		paste::paste! {
			pub fn [< append_ $name >](self, val: impl Into<$crate::Value>) -> Self {
				self.append(stringify!($rename), val)
			}
		}
	};

	($name:ident, many) => {
		$crate::macros::setter! { $name::$name, many }
	};

	($name:ident) => {
		$crate::macros::setter! { $name::$name }
	};
}

pub(crate) use setter;
