use apg::{target::Addressed, Document, Uniquer};
use futures::StreamExt;

use crate::{ext::ReportedError, walk::{Walk, Yielder}, Context};

/// Fan-out of an activity to everyone it should reach
///
/// Only ids come out of here, resolving them into inboxes is up to the delivery layer.
#[allow(async_fn_in_trait)]
pub trait Addresser {
	/// actor, to, cc, bto, bcc and every mentioned actor, in this order and with repetitions
	async fn addressees(&self, activity: &Document) -> Vec<String>;

	/// audience of the thread this activity replies to, walking up its `inReplyTo` chain
	fn in_reply_to_addressees(&self, activity: &Document) -> Walk<String>;

	/// every distinct recipient, never empty ids nor the public collection
	fn recipients(&self, activity: &Document) -> Walk<String>;
}

impl Addresser for Context {
	async fn addressees(&self, activity: &Document) -> Vec<String> {
		let Some(activity) = activity.load().await.or_report(self, activity.id()) else { return Vec::new() };

		// plain objects (a parent Note) have an author rather than an actor
		let mut actor = activity.property("actor");
		if actor.is_nil() {
			actor = activity.property("attributedTo");
		}

		let mut out = actor.all_ids();
		out.append(&mut activity.addressed());

		for tag in activity.property("tag").iter() {
			let Some(tag) = tag.load().await.or_report(self, tag.id()) else { continue };
			if tag.types().any(|t| t == "Mention" || t == "as:Mention") {
				out.append(&mut tag.property("href").all_ids());
			}
		}

		out
	}

	fn in_reply_to_addressees(&self, activity: &Document) -> Walk<String> {
		let ctx = self.clone();
		let activity = activity.clone();
		Walk::spawn(self.stop().clone(), move |out| async move {
			let Some(activity) = fetch(&ctx, &out, &activity).await else { return };

			let mut seen = Uniquer::new();
			if !activity.id().is_empty() {
				seen.is_unique(activity.id().to_string());
			}

			let mut parent = reply_target(&ctx, &out, &activity, &mut seen).await;

			for _ in 0..ctx.cfg().security.max_reply_depth {
				if parent.is_nil() {
					return;
				}
				if !parent.id().is_empty() && seen.is_duplicate(parent.id().to_string()) {
					tracing::debug!("reply chain loops back on {}", parent.id());
					return;
				}
				let Some(loaded) = fetch(&ctx, &out, &parent).await else { return };
				let Some(addressees) = out.guard(ctx.addressees(&loaded)).await else { return };
				for addr in addressees {
					if !out.emit(addr).await {
						return;
					}
				}
				parent = reply_target(&ctx, &out, &loaded, &mut seen).await;
			}

			if !parent.is_nil() {
				tracing::debug!("reply chain of '{}' is deeper than configured, truncating", activity.id());
			}
		})
	}

	fn recipients(&self, activity: &Document) -> Walk<String> {
		let ctx = self.clone();
		let activity = activity.clone();
		Walk::spawn(self.stop().clone(), move |out| async move {
			let Some(activity) = fetch(&ctx, &out, &activity).await else { return };
			let mut unique = Uniquer::new();

			let Some(direct) = out.guard(ctx.addressees(&activity)).await else { return };
			for addr in direct {
				if wanted(&addr) && unique.is_unique(addr.clone()) && !out.emit(addr).await {
					return;
				}
			}

			let mut thread = ctx.in_reply_to_addressees(&activity);
			while let Some(addr) = thread.next().await {
				if wanted(&addr) && unique.is_unique(addr.clone()) && !out.emit(addr).await {
					return;
				}
			}
			if let Err(e) = thread.finish().await {
				ctx.report(activity.id(), &e);
			}
		})
	}
}

fn wanted(addr: &str) -> bool {
	!addr.is_empty() && !apg::target::is_public(addr)
}

async fn fetch(ctx: &Context, out: &Yielder<String>, doc: &Document) -> Option<Document> {
	out.guard(doc.load()).await?
		.or_report(ctx, doc.id())
		.filter(|loaded| !loaded.is_nil())
}

// Create(Note) carries the reply target on its object
async fn reply_target(ctx: &Context, out: &Yielder<String>, doc: &Document, seen: &mut Uniquer<String>) -> Document {
	let parent = doc.property("inReplyTo");
	if !parent.is_nil() || !doc.is_activity() {
		return parent;
	}
	let Some(object) = fetch(ctx, out, &doc.property("object")).await else { return Document::nil() };
	if !object.id().is_empty() {
		seen.is_unique(object.id().to_string());
	}
	object.property("inReplyTo")
}
