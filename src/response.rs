use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::utils::format_key_values::format_key_values;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
	pub id: String,
	pub request_id: String,
	pub status_code: u16,
	pub status_text: String,
	pub headers: HashMap<String, String>,
	pub body: String,
	pub response_time: u64, // milliseconds
	pub size: usize,        // bytes received, before truncation
	pub truncated: bool,
	pub created_at: chrono::DateTime<chrono::Utc>,
}

impl HttpResponse {
	pub fn new(
		request_id: String,
		status_code: u16,
		status_text: String,
		headers: HashMap<String, String>,
		body: String,
		response_time: Duration,
	) -> Self {
		let size = body.len();

		Self {
			id: uuid::Uuid::new_v4().to_string(),
			request_id,
			status_code,
			status_text,
			headers,
			body,
			response_time: response_time.as_millis() as u64,
			size,
			truncated: false,
			created_at: chrono::Utc::now(),
		}
	}

	/// Caps the body at `max_bytes`, cutting on a char boundary.
	#[must_use]
	pub fn truncated_to(mut self, max_bytes: usize) -> Self {
		if self.body.len() <= max_bytes {
			return self;
		}

		let mut cut = max_bytes;
		while !self.body.is_char_boundary(cut) {
			cut -= 1;
		}
		self.body.truncate(cut);
		self.truncated = true;
		self
	}

	pub fn content_type(&self) -> Option<&String> {
		self.headers.get("content-type").or_else(|| self.headers.get("Content-Type"))
	}

	pub fn is_json(&self) -> bool {
		self.content_type().is_some_and(|ct| ct.contains("application/json"))
	}

	pub fn formatted_headers(&self) -> String {
		format_key_values(&self.headers)
	}

	pub fn pretty_json(&self) -> Result<String, serde_json::Error> {
		if self.is_json() {
			let json_value: serde_json::Value = serde_json::from_str(&self.body)?;
			serde_json::to_string_pretty(&json_value)
		} else {
			Ok(self.body.clone())
		}
	}

	/// Body as shown in the response pane.
	pub fn display_body(&self) -> String {
		let mut body = if self.truncated {
			self.body.clone()
		} else {
			self.pretty_json().unwrap_or_else(|_| self.body.clone())
		};

		if self.truncated {
			body.push_str("\n… (truncated)");
		}
		body
	}

	pub fn formatted_size(&self) -> String {
		if self.size < 1024 {
			format!("{} B", self.size)
		} else if self.size < 1024 * 1024 {
			format!("{:.1} KB", self.size as f64 / 1024.0)
		} else {
			format!("{:.1} MB", self.size as f64 / (1024.0 * 1024.0))
		}
	}

	pub fn status_line(&self) -> String {
		format!(
			"{} {} | {} | {}ms | {}",
			self.status_code,
			self.status_text,
			self.formatted_size(),
			self.response_time,
			self.created_at.format("%H:%M:%S")
		)
	}

	pub const fn status_color(&self) -> Color {
		match self.status_code {
			200..=299 => Color::Green,
			300..=399 => Color::Yellow,
			400..=499 => Color::Red,
			500..=599 => Color::Magenta,
			_ => Color::White,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn response(body: &str, content_type: Option<&str>) -> HttpResponse {
		let headers = content_type
			.map(|value| HashMap::from([(String::from("content-type"), value.to_string())]))
			.unwrap_or_default();

		HttpResponse::new(
			String::from("request"),
			200,
			String::from("OK"),
			headers,
			body.to_string(),
			Duration::from_millis(12),
		)
	}

	#[test]
	fn test_json_body_is_pretty_printed() {
		let response = response(r#"{"name":"test"}"#, Some("application/json; charset=utf-8"));

		assert_eq!(response.display_body(), "{\n  \"name\": \"test\"\n}");
	}

	#[test]
	fn test_invalid_json_falls_back_to_raw_body() {
		let response = response("{not json", Some("application/json"));

		assert_eq!(response.display_body(), "{not json");
	}

	#[test]
	fn test_truncation_marks_response_and_respects_char_boundaries() {
		let response = response("héllo world", None).truncated_to(2);

		assert!(response.truncated);
		assert_eq!(response.body, "h");
		assert_eq!(response.size, "héllo world".len());
		assert!(response.display_body().ends_with("(truncated)"));
	}

	#[test]
	fn test_small_body_is_not_truncated() {
		let response = response("ok", None).truncated_to(1024);

		assert!(!response.truncated);
		assert_eq!(response.display_body(), "ok");
	}

	#[test]
	fn test_formatted_size() {
		let mut response = response("", None);
		assert_eq!(response.formatted_size(), "0 B");

		response.size = 2048;
		assert_eq!(response.formatted_size(), "2.0 KB");

		response.size = 3 * 1024 * 1024;
		assert_eq!(response.formatted_size(), "3.0 MB");
	}
}
