#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct Config {
	#[serde(default)]
	pub client: ClientConfig,

	#[serde(default)]
	pub security: SecurityConfig,

	#[serde(default)]
	pub collections: CollectionsConfig,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct ClientConfig {
	#[serde_inline_default(format!("fedwalk/{}", crate::VERSION))]
	pub user_agent: String,

	#[serde_inline_default(30u64)]
	pub timeout_seconds: u64,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct SecurityConfig {
	#[serde_inline_default(apg::document::DEFAULT_UNWRAP_DEPTH)]
	pub max_unwrap_depth: usize,

	#[serde_inline_default(8)]
	pub max_reply_depth: u32,

	#[serde_inline_default(2)]
	pub max_id_redirects: u32,

	// 0 disables the limit, only cycle detection will stop a walk then
	#[serde_inline_default(1000)]
	pub max_pages: u32,
}

#[serde_inline_default::serde_inline_default]
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, serde_default::DefaultFromSerde)]
pub struct CollectionsConfig {
	#[serde_inline_default(60)]
	pub full_collection: usize,

	#[serde_inline_default(20)]
	pub page_size: usize,
}

impl Config {
	pub fn load(path: Option<&std::path::PathBuf>) -> Self {
		let Some(cfg_path) = path else { return Config::default() };
		match std::fs::read_to_string(cfg_path) {
			Ok(x) => match toml::from_str(&x) {
				Ok(cfg) => return cfg,
				Err(e) => tracing::error!("failed parsing config file: {e}"),
			},
			Err(e) => tracing::error!("failed reading config file: {e}"),
		}
		Config::default()
	}
}
