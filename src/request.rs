use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	#[default]
	Get,
	Post,
	Put,
	Patch,
	Delete,
	Options,
	Head,
}

impl HttpMethod {
	/// Order shown by the method selector.
	pub const ALL: [Self; 7] =
		[Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete, Self::Options, Self::Head];

	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
			Self::Options => "OPTIONS",
			Self::Head => "HEAD",
		}
	}

	pub const fn index(&self) -> usize {
		match self {
			Self::Get => 0,
			Self::Post => 1,
			Self::Put => 2,
			Self::Patch => 3,
			Self::Delete => 4,
			Self::Options => 5,
			Self::Head => 6,
		}
	}

	pub const fn from_index(index: usize) -> Self {
		Self::ALL[index % Self::ALL.len()]
	}

	pub const fn color(&self) -> ratatui::style::Color {
		use ratatui::style::Color;

		match self {
			Self::Get => Color::Green,
			Self::Post => Color::Yellow,
			Self::Put => Color::Blue,
			Self::Patch => Color::Cyan,
			Self::Delete => Color::Red,
			Self::Options | Self::Head => Color::Magenta,
		}
	}

	pub const fn allows_body(&self) -> bool {
		!matches!(self, Self::Get | Self::Head)
	}
}

impl std::fmt::Display for HttpMethod {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpRequest {
	pub id: String,
	pub method: HttpMethod,
	pub url: String,
	pub headers: HashMap<String, String>,
	pub body: String,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

impl HttpRequest {
	pub fn new() -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			method: HttpMethod::Get,
			url: String::new(),
			headers: HashMap::new(),
			body: String::new(),
			created_at: chrono::Utc::now(),
		}
	}

	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = url.into();
		self
	}

	pub const fn with_method(mut self, method: HttpMethod) -> Self {
		self.method = method;
		self
	}

	pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
		self.headers.extend(headers);
		self
	}

	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();
		self
	}

	pub fn has_body(&self) -> bool {
		self.method.allows_body() && !self.body.trim().is_empty()
	}
}

impl Default for HttpRequest {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_methods_keep_selector_order() {
		let names: Vec<&str> = HttpMethod::ALL.iter().map(HttpMethod::as_str).collect();
		assert_eq!(names, ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "HEAD"]);

		for (index, method) in HttpMethod::ALL.iter().enumerate() {
			assert_eq!(method.index(), index);
			assert_eq!(HttpMethod::from_index(index), *method);
		}
	}

	#[test]
	fn test_body_only_sent_for_methods_that_carry_one() {
		let get = HttpRequest::new().with_body("{}");
		assert!(!get.has_body());

		let post = HttpRequest::new().with_method(HttpMethod::Post).with_body("{}");
		assert!(post.has_body());

		let empty = HttpRequest::new().with_method(HttpMethod::Post).with_body("  \n");
		assert!(!empty.has_body());
	}
}
