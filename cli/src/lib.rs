mod fetch;
pub use fetch::*;

mod walk;
pub use walk::*;

mod audience;
pub use audience::*;

#[derive(Debug, Clone, clap::Subcommand)]
pub enum CliCommand {
	/// fetch a single AP object and print it
	Fetch {
		/// object id, or uri, to fetch
		uri: String,
	},

	/// list items of a remote collection, one id per line
	Walk {
		/// collection id to walk
		uri: String,

		#[arg(long, default_value_t = false)]
		/// start from last page and go backwards
		reverse: bool,

		#[arg(long, default_value_t = false)]
		/// list page ids rather than their items
		pages: bool,

		#[arg(long)]
		/// stop after this many entries
		limit: Option<usize>,
	},

	/// count items of a remote collection, trusting totalItems when present
	Count {
		/// collection id to count
		uri: String,
	},

	/// list everyone an activity would be delivered to
	Audience {
		/// activity or object id
		uri: String,

		#[arg(long, default_value_t = false)]
		/// also list duplicates and public addressing, split by source
		verbose: bool,
	},

	/// peel nested activities off until reaching the content they carry
	Unwrap {
		/// activity id
		uri: String,
	},
}

pub async fn run(ctx: fedwalk::Context, command: CliCommand) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!("running cli task: {command:?}");
	match command {
		CliCommand::Fetch { uri } =>
			Ok(fetch(ctx, uri).await?),
		CliCommand::Walk { uri, reverse, pages, limit } =>
			Ok(walk(ctx, uri, reverse, pages, limit).await?),
		CliCommand::Count { uri } =>
			Ok(count(ctx, uri).await),
		CliCommand::Audience { uri, verbose } =>
			Ok(audience(ctx, uri, verbose).await?),
		CliCommand::Unwrap { uri } =>
			Ok(unwrap(ctx, uri).await?),
	}
}
