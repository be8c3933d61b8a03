use apg::DocumentError;

use crate::Context;

/// For results nobody is waiting on, which should only leave a trace in the logs
pub trait LoggableError {
	fn warn_failed(self, msg: &str);
	fn err_failed(self, msg: &str);
}

impl<T, E: std::fmt::Display> LoggableError for Result<T, E> {
	fn warn_failed(self, msg: &str) {
		if let Err(e) = self {
			tracing::warn!("{msg}: {e}");
		}
	}

	fn err_failed(self, msg: &str) {
		if let Err(e) = self {
			tracing::error!("{msg}: {e}");
		}
	}
}

/// Hands failed lookups to the context sink, for best-effort operations which carry on without them
pub trait ReportedError<T> {
	fn or_report(self, ctx: &Context, uri: &str) -> Option<T>;
}

impl<T> ReportedError<T> for Result<T, DocumentError> {
	fn or_report(self, ctx: &Context, uri: &str) -> Option<T> {
		match self {
			Ok(x) => Some(x),
			Err(e) => {
				ctx.report(uri, &e);
				None
			},
		}
	}
}
