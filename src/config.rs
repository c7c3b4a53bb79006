use std::collections::HashMap;
use std::time::Duration;

use clap::Parser;

use crate::keymap::Keymap;
use crate::layout::{Chrome, Margins};
use crate::request::HttpMethod;

#[derive(Debug, Parser)]
#[command(name = "postie", version, about = "Compose and send HTTP requests from the terminal")]
pub struct Cli {
	/// URL to prefill in the url bar
	#[arg(long)]
	pub url: Option<String>,

	/// HTTP method selected at startup
	#[arg(short = 'X', long, value_enum, ignore_case = true, default_value_t = HttpMethod::Get)]
	pub method: HttpMethod,

	/// Request body to prefill in the body editor
	#[arg(short = 'd', long)]
	pub body: Option<String>,

	/// Extra request header, `key: value`; repeatable
	#[arg(short = 'H', long = "header", value_parser = parse_header)]
	pub headers: Vec<(String, String)>,

	/// Cookie sent to the prefilled url's host, `name=value`; repeatable
	#[arg(short = 'b', long = "cookie")]
	pub cookies: Vec<String>,

	/// Request timeout in seconds
	#[arg(long, default_value_t = 30)]
	pub timeout: u64,

	/// Responses larger than this many bytes are cut and marked truncated
	#[arg(long, default_value_t = 1024 * 1024)]
	pub max_body_bytes: usize,

	/// Interval between ticks in milliseconds, drives cursor blink
	#[arg(long, default_value_t = 500)]
	pub tick_rate: u64,
}

fn parse_header(input: &str) -> Result<(String, String), String> {
	let (key, value) = input.split_once(':').ok_or_else(|| format!("Invalid header format: {input}"))?;
	let key = key.trim();
	if key.is_empty() {
		return Err(format!("Invalid header format: {input}"));
	}
	Ok((key.to_string(), value.trim().to_string()))
}

/// Everything the controller and layout need that does not change while running.
#[derive(Debug, Clone)]
pub struct Config {
	pub chrome: Chrome,
	pub keymap: Keymap,
	pub timeout: Duration,
	pub max_body_bytes: usize,
	pub tick_rate: Duration,
	pub user_agent: String,
	pub initial_method: HttpMethod,
	pub initial_url: String,
	pub initial_body: String,
	pub headers: HashMap<String, String>,
	pub cookies: Vec<String>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			chrome: Chrome { margins: Margins { top: 1, right: 2, bottom: 1, left: 2 }, help_height: 2 },
			keymap: Keymap::default(),
			timeout: Duration::from_secs(30),
			max_body_bytes: 1024 * 1024,
			tick_rate: Duration::from_millis(500),
			user_agent: format!("{} HTTP Client/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
			initial_method: HttpMethod::Get,
			initial_url: String::new(),
			initial_body: String::new(),
			headers: HashMap::new(),
			cookies: Vec::new(),
		}
	}
}

impl From<Cli> for Config {
	fn from(cli: Cli) -> Self {
		Self {
			timeout: Duration::from_secs(cli.timeout.max(1)),
			max_body_bytes: cli.max_body_bytes,
			tick_rate: Duration::from_millis(cli.tick_rate.max(10)),
			initial_method: cli.method,
			initial_url: cli.url.unwrap_or_default(),
			initial_body: cli.body.unwrap_or_default(),
			headers: cli.headers.into_iter().collect(),
			cookies: cli.cookies,
			..Self::default()
		}
	}
}
