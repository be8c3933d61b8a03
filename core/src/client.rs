use std::time::Duration;

use apg::{jsonld, Client, Document, DocumentError, ObjectType};
use reqwest::{header::ACCEPT, StatusCode};

use crate::Config;

/// Plain unsigned ActivityPub GETs
#[derive(Debug, Clone)]
pub struct HttpClient {
	http: reqwest::Client,
	max_id_redirects: u32,
}

impl HttpClient {
	pub fn new(cfg: &Config) -> reqwest::Result<Self> {
		let http = reqwest::Client::builder()
			.user_agent(cfg.client.user_agent.clone())
			.timeout(Duration::from_secs(cfg.client.timeout_seconds))
			.build()?;
		Ok(HttpClient { http, max_id_redirects: cfg.security.max_id_redirects })
	}

	async fn request(&self, uri: &str) -> Result<serde_json::Value, DocumentError> {
		let response = self.http
			.get(uri)
			.header(ACCEPT, format!("{}, {}", jsonld::CONTENT_TYPE_LD_JSON_ACTIVITYPUB, jsonld::CONTENT_TYPE_ACTIVITY_JSON))
			.send()
			.await
			.map_err(|e| DocumentError::Transport(format!("{uri}: {e}")))?;

		match response.status() {
			StatusCode::NOT_FOUND | StatusCode::GONE => return Err(DocumentError::NotFound(uri.to_string())),
			status if !status.is_success() => return Err(DocumentError::Transport(format!("{uri} answered {status}"))),
			_ => {},
		}

		response
			.json::<serde_json::Value>()
			.await
			.map_err(|e| DocumentError::Malformed(format!("{uri}: {e}")))
	}
}

#[async_trait::async_trait]
impl Client for HttpClient {
	async fn load(&self, uri: &str) -> Result<Document, DocumentError> {
		let mut target = uri.to_string();
		for _ in 0..=self.max_id_redirects {
			tracing::debug!("fetching {target}");
			let document = Document::new(self.request(&target).await?);

			if document.object_type() == Some(ObjectType::Tombstone) {
				return Err(DocumentError::NotFound(uri.to_string()));
			}

			// only the origin of an id is trusted to tell what it contains
			let id = document.id().to_string();
			if id.is_empty() || id == target {
				return Ok(document.with_metadata("fetched", target));
			}
			tracing::debug!("{target} answered with foreign document {id}");
			target = id;
		}

		Err(DocumentError::Transport(format!("too many id redirects while resolving {uri}")))
	}
}
