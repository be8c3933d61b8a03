use futures::StreamExt;
use fedwalk::{apg::{Document, DocumentError}, Collector, Direction, Walk};

pub async fn walk(ctx: fedwalk::Context, uri: String, reverse: bool, pages: bool, limit: Option<usize>) -> Result<(), DocumentError> {
	let collection = ctx.document(uri);
	let mut stream = match (pages, reverse) {
		(true, false) => ctx.pages(&collection, Direction::Forward),
		(true, true) => ctx.pages(&collection, Direction::Backward),
		(false, false) => ctx.items(&collection),
		(false, true) => ctx.items_reverse(&collection),
	};

	let ids = take_ids(&mut stream, limit).await;
	for id in &ids {
		println!("{id}");
	}

	tracing::info!("listed {} entries of '{}'", ids.len(), collection.id());
	stream.finish().await
}

// the limit is checked before pulling, so no fetch happens past it
async fn take_ids(stream: &mut Walk<Document>, limit: Option<usize>) -> Vec<String> {
	let mut ids = Vec::new();
	while !limit.is_some_and(|l| ids.len() >= l) {
		let Some(entry) = stream.next().await else { break };
		ids.push(entry.id().to_string());
	}
	ids
}

pub async fn count(ctx: fedwalk::Context, uri: String) {
	let collection = ctx.document(uri);
	println!("{}", ctx.count_items(&collection).await);
}

#[cfg(test)]
mod test {
	use fedwalk::Collector;

	#[tokio::test]
	async fn limit_is_honored_before_pulling() {
		let ctx = fedwalk::Context::default();
		let collection = ctx.document(serde_json::json!({ "orderedItems": ["a", "b", "c"] }));

		assert!(super::take_ids(&mut ctx.items(&collection), Some(0)).await.is_empty());
		assert_eq!(super::take_ids(&mut ctx.items(&collection), Some(2)).await, vec!["a", "b"]);
		assert_eq!(super::take_ids(&mut ctx.items(&collection), None).await.len(), 3);
	}
}
