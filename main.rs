use std::{path::PathBuf, sync::Arc};
use clap::{Parser, Subcommand};
use signal_hook::consts::signal::*;
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;

use fedwalk::ext::LoggableError;
#[cfg(feature = "cli")]
use fedwalk_cli as cli;


#[derive(Parser)]
/// walk the fediverse without getting lost
struct Args {
	#[clap(subcommand)]
	/// command to run
	command: Mode,

	/// path to config file, leave empty to not use any
	#[arg(short, long)]
	config: Option<PathBuf>,

	#[arg(long, default_value_t=false)]
	/// run with debug level tracing
	debug: bool,

	#[arg(long)]
	/// force set number of worker threads for async runtime, defaults to number of cores
	threads: Option<usize>,
}

#[derive(Clone, Subcommand)]
enum Mode {
	/// print current or default configuration
	Config,

	#[cfg(feature = "cli")]
	#[command(flatten)]
	Cli(cli::CliCommand),
}

fn main() {
	let args = Args::parse();

	tracing_subscriber::fmt()
		.compact()
		.with_max_level(if args.debug { tracing::Level::DEBUG } else { tracing::Level::INFO })
		.init();

	let config = fedwalk::Config::load(args.config.as_ref());

	if matches!(args.command, Mode::Config) {
		println!("{}", toml::to_string_pretty(&config).expect("failed serializing config"));
		return;
	}

	let mut runtime = tokio::runtime::Builder::new_multi_thread();

	if let Some(threads) = args.threads {
		runtime.worker_threads(threads);
	}

	runtime
		.enable_io()
		.enable_time()
		.thread_name("fedwalk-async-worker")
		.build()
		.expect("failed creating tokio async runtime")
		.block_on(async { init(args, config).await })
}

async fn init(args: Args, config: fedwalk::Config) {
	let client = fedwalk::HttpClient::new(&config)
		.expect("failed building http client");

	let (signal, stop) = fedwalk::StopToken::new();
	let signals = Signals::new([SIGTERM, SIGINT]).expect("failed registering signal handler");
	let handle = signals.handle();
	let signals_task = tokio::spawn(handle_signals(signals, signal));

	let ctx = fedwalk::Context::new(config, Arc::new(client))
		.with_stop(stop);

	match args.command {
		#[cfg(feature = "cli")]
		Mode::Cli(command) =>
			cli::run(ctx, command)
				.await
				.err_failed("failed running cli task"),

		Mode::Config => unreachable!(),
	}

	handle.close();
	signals_task.await.warn_failed("signal handler task did not stop cleanly");
}

async fn handle_signals(
	mut signals: signal_hook_tokio::Signals,
	stop: fedwalk::StopSignal,
) {
	while let Some(signal) = signals.next().await {
		match signal {
			SIGTERM | SIGINT => {
				tracing::info!("received stop signal, closing tasks");
				stop.stop();
			},
			_ => unreachable!(),
		}
	}
}
