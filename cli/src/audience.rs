use futures::StreamExt;
use fedwalk::{apg::DocumentError, Addresser};

pub async fn audience(ctx: fedwalk::Context, uri: String, verbose: bool) -> Result<(), DocumentError> {
	let activity = ctx.document(uri).load().await?;

	if verbose {
		for addr in ctx.addressees(&activity).await {
			println!("direct {addr}");
		}
		let mut thread = ctx.in_reply_to_addressees(&activity);
		while let Some(addr) = thread.next().await {
			println!("thread {addr}");
		}
		return thread.finish().await;
	}

	let mut recipients = ctx.recipients(&activity);
	while let Some(addr) = recipients.next().await {
		println!("{addr}");
	}
	recipients.finish().await
}
