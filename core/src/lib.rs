pub mod config;
pub mod context;
pub mod walk;
pub mod collection;
pub mod addressing;
pub mod builders;
pub mod client;
pub mod ext;

pub use apg;

pub use config::Config;
pub use context::{Context, LogSink, Sink};
pub use walk::{StopSignal, StopToken, Walk};
pub use collection::{Collector, Direction};
pub use addressing::Addresser;
pub use client::HttpClient;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
