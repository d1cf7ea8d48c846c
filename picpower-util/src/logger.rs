//! Logger
//!
//! Logs to stderr (filtered by `RUST_LOG`, `info` by default) and,
//! optionally, to a file (filtered by `RUST_LOG_FILE`, `debug` by default).

// Imports
use {
	std::{fs, io, path::Path, sync::Mutex},
	tracing::level_filters::LevelFilter,
	tracing_subscriber::{fmt, prelude::*, EnvFilter},
};

/// Initializes the logger.
///
/// Any messages logged through [`pre_init`] are replayed afterwards.
pub fn init(log_file: Option<&Path>, log_file_append: bool) {
	let term_layer = fmt::layer()
		.with_writer(io::stderr)
		.with_filter(self::env_filter("RUST_LOG", LevelFilter::INFO));

	let file_layer = log_file.and_then(|log_file| {
		let file = fs::OpenOptions::new()
			.create(true)
			.write(true)
			.append(log_file_append)
			.truncate(!log_file_append)
			.open(log_file);

		match file {
			Ok(file) => Some(
				fmt::layer()
					.with_ansi(false)
					.with_writer(Mutex::new(file))
					.with_filter(self::env_filter("RUST_LOG_FILE", LevelFilter::DEBUG)),
			),
			Err(err) => {
				// Note: Logging isn't up yet, so this is the only place to report it
				eprintln!("Unable to open log file {log_file:?}: {err}");
				None
			},
		}
	});

	if let Err(err) = tracing_subscriber::registry()
		.with(term_layer)
		.with(file_layer)
		.try_init()
	{
		eprintln!("Unable to initialize logger: {err}");
	}

	for message in pre_init::take() {
		tracing::debug!("{message}");
	}
}

/// Builds an env filter from `var`, defaulting to `default`
fn env_filter(var: &str, default: LevelFilter) -> EnvFilter {
	EnvFilter::builder()
		.with_default_directive(default.into())
		.with_env_var(var)
		.from_env_lossy()
}

/// Logging before the logger is initialized.
///
/// Messages are buffered and emitted once [`init`](super::init) runs.
pub mod pre_init {
	// Imports
	use std::sync::Mutex;

	/// Buffered messages
	static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

	/// Buffers a debug message
	pub fn debug(message: impl Into<String>) {
		// Note: A poisoned buffer only loses pre-init messages
		if let Ok(mut messages) = MESSAGES.lock() {
			messages.push(message.into());
		}
	}

	/// Takes all buffered messages
	pub(super) fn take() -> Vec<String> {
		MESSAGES
			.lock()
			.map(|mut messages| std::mem::take(&mut *messages))
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pre_init_buffers_until_taken() {
		pre_init::debug("Args: []");
		pre_init::debug(String::from("Reading config"));

		assert_eq!(pre_init::take(), ["Args: []", "Reading config"]);
		assert!(pre_init::take().is_empty());
	}
}
