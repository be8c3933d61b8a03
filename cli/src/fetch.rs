use fedwalk::apg::DocumentError;

pub async fn fetch(ctx: fedwalk::Context, uri: String) -> Result<(), DocumentError> {
	let doc = ctx.document(uri).load().await?;
	print(&doc)
}

pub async fn unwrap(ctx: fedwalk::Context, uri: String) -> Result<(), DocumentError> {
	let activity = ctx.document(uri);
	let content = ctx.unwrap_activity(&activity).await?;
	match content.object_type() {
		Some(t) => tracing::info!("'{}' carries a {}", activity.id(), t.as_ref()),
		None => tracing::warn!("'{}' carries an object with unknown type", activity.id()),
	}
	print(&content)
}

fn print(doc: &fedwalk::apg::Document) -> Result<(), DocumentError> {
	let pretty = serde_json::to_string_pretty(doc)
		.map_err(|e| DocumentError::Internal(format!("could not serialize document: {e}")))?;
	println!("{pretty}");
	Ok(())
}
