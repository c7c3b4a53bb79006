use std::path::PathBuf;

use directories::ProjectDirs;
use lazy_static::lazy_static;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

lazy_static! {
	pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
	pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
	pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Platform data directory, or `./.data` when the platform has none.
pub fn get_data_dir() -> PathBuf {
	ProjectDirs::from("", "", env!("CARGO_PKG_NAME"))
		.map_or_else(|| PathBuf::from(".").join(".data"), |dirs| dirs.data_local_dir().to_path_buf())
}

/// Level filter: `POSTIE_LOGLEVEL`, then `RUST_LOG`, then `info`.
fn env_filter() -> EnvFilter {
	std::env::var(LOG_ENV.as_str())
		.or_else(|_| std::env::var(EnvFilter::DEFAULT_ENV))
		.ok()
		.and_then(|directives| EnvFilter::try_new(directives).ok())
		.unwrap_or_else(|| EnvFilter::new("info"))
}

/// Logs go to a file; the terminal belongs to the UI.
pub fn initialize_logging() -> anyhow::Result<PathBuf> {
	let directory = get_data_dir();
	std::fs::create_dir_all(&directory)?;
	let log_path = directory.join(LOG_FILE.as_str());
	let log_file = std::fs::File::create(&log_path)?;

	let file_subscriber = tracing_subscriber::fmt::layer()
		.with_file(true)
		.with_line_number(true)
		.with_writer(log_file)
		.with_target(false)
		.with_ansi(false)
		.with_filter(env_filter());
	tracing_subscriber::registry().with(file_subscriber).with(ErrorLayer::default()).try_init()?;
	Ok(log_path)
}

#[macro_export]
macro_rules! trace_dbg {
	(target: $target:expr, level: $level:expr, $ex:expr) => {{
		match $ex {
			value => {
				tracing::event!(target: $target, $level, ?value, stringify!($ex));
				value
			}
		}
	}};
	(level: $level:expr, $ex:expr) => {
		trace_dbg!(target: module_path!(), level: $level, $ex)
	};
	(target: $target:expr, $ex:expr) => {
		trace_dbg!(target: $target, level: tracing::Level::DEBUG, $ex)
	};
	($ex:expr) => {
		trace_dbg!(level: tracing::Level::DEBUG, $ex)
	};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_env_names_follow_crate_name() {
		assert_eq!(PROJECT_NAME.as_str(), "POSTIE");
		assert_eq!(LOG_ENV.as_str(), "POSTIE_LOGLEVEL");
		assert_eq!(LOG_FILE.as_str(), "postie.log");
	}

	#[test]
	fn test_data_dir_ends_with_project_name() {
		let directory = get_data_dir();

		assert!(directory.to_string_lossy().contains("postie") || directory.ends_with(".data"));
	}
}
