use crossterm::event::{KeyCode, MouseEventKind};
use ratatui::{
	buffer::Buffer,
	layout::{Alignment, Rect},
	style::{Style, Stylize},
	text::Line,
	widgets::{Paragraph, Widget},
};

use super::{GRAY, RED, WHITE, YELLOW, pane_block};
use crate::dispatch::{DispatchError, DispatchOutcome};
use crate::event::AppEvent;
use crate::response::HttpResponse;
use crate::widget::{Effect, Focusable, WidgetId};

const WHEEL_STEP: u16 = 3;

#[derive(Debug, Clone)]
pub enum ResponseState {
	Message(String),
	Loading,
	Ready(Box<HttpResponse>),
	Failed(DispatchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseTab {
	Body,
	Headers,
}

/// Read-only, scrollable view of the last response.
pub struct ResponseViewer {
	state: ResponseState,
	tab: ResponseTab,
	content: String,
	scroll: u16,
	focused: bool,
	width: u16,
	height: u16,
}

impl ResponseViewer {
	pub fn new() -> Self {
		let mut viewer = Self {
			state: ResponseState::Loading,
			tab: ResponseTab::Body,
			content: String::new(),
			scroll: 0,
			focused: false,
			width: 0,
			height: 0,
		};
		viewer.set_value("No response yet\nSend a request to see the response here");
		viewer
	}

	/// Whether a request result (success or failure) is on screen.
	pub const fn is_ready(&self) -> bool {
		matches!(self.state, ResponseState::Ready(_) | ResponseState::Failed(_))
	}

	pub fn set_loading(&mut self) {
		self.set_state(ResponseState::Loading);
	}

	pub fn apply(&mut self, outcome: DispatchOutcome) {
		match outcome {
			Ok(response) => self.set_state(ResponseState::Ready(Box::new(response))),
			Err(error) => self.set_state(ResponseState::Failed(error)),
		}
	}

	fn set_state(&mut self, state: ResponseState) {
		self.state = state;
		self.tab = ResponseTab::Body;
		self.scroll = 0;
		self.refresh_content();
	}

	fn refresh_content(&mut self) {
		self.content = match (&self.state, self.tab) {
			(ResponseState::Message(message), _) => message.clone(),
			(ResponseState::Loading, _) => String::from("loading..."),
			(ResponseState::Ready(response), ResponseTab::Body) => response.display_body(),
			(ResponseState::Ready(response), ResponseTab::Headers) => response.formatted_headers(),
			(ResponseState::Failed(error), _) => format!("Error: {error}"),
		};
	}

	fn max_scroll(&self) -> u16 {
		let lines = u16::try_from(self.content.lines().count()).unwrap_or(u16::MAX);
		let visible = self.height.saturating_sub(2);
		lines.saturating_sub(visible)
	}

	fn scroll_by(&mut self, delta: i32) -> Effect {
		let target = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll()));
		let target = u16::try_from(target).unwrap_or(0);

		if target == self.scroll {
			return Effect::None;
		}
		self.scroll = target;
		Effect::Redraw
	}

	fn toggle_tab(&mut self) -> Effect {
		if !matches!(self.state, ResponseState::Ready(_)) {
			return Effect::None;
		}

		self.tab = match self.tab {
			ResponseTab::Body => ResponseTab::Headers,
			ResponseTab::Headers => ResponseTab::Body,
		};
		self.scroll = 0;
		self.refresh_content();
		Effect::Redraw
	}

	fn title(&self) -> String {
		let tab = match self.tab {
			ResponseTab::Body => "Response",
			ResponseTab::Headers => "Response headers",
		};
		if self.focused && matches!(self.state, ResponseState::Ready(_)) {
			format!("{tab} ( h to toggle headers )")
		} else {
			tab.to_string()
		}
	}
}

impl Default for ResponseViewer {
	fn default() -> Self {
		Self::new()
	}
}

impl Focusable for ResponseViewer {
	fn id(&self) -> WidgetId {
		WidgetId::Response
	}

	fn focus(&mut self) -> Effect {
		self.focused = true;
		Effect::Redraw
	}

	fn blur(&mut self) {
		self.focused = false;
	}

	fn is_focused(&self) -> bool {
		self.focused
	}

	fn set_width(&mut self, width: u16) {
		self.width = width;
	}

	fn set_height(&mut self, height: u16) {
		self.height = height;
		self.scroll = self.scroll.min(self.max_scroll());
	}

	fn size(&self) -> (u16, u16) {
		(self.width, self.height)
	}

	fn handle_event(&mut self, event: &AppEvent) -> Effect {
		let page = i32::from(self.height.saturating_sub(2).max(1));

		match event {
			AppEvent::Mouse(mouse) => match mouse.kind {
				MouseEventKind::ScrollDown => self.scroll_by(i32::from(WHEEL_STEP)),
				MouseEventKind::ScrollUp => self.scroll_by(-i32::from(WHEEL_STEP)),
				_ => Effect::None,
			},
			AppEvent::Key(key) if self.focused => match key.code {
				KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
				KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
				KeyCode::PageDown => self.scroll_by(page),
				KeyCode::PageUp => self.scroll_by(-page),
				KeyCode::Home | KeyCode::Char('g') => self.scroll_by(-i32::from(self.scroll)),
				KeyCode::End | KeyCode::Char('G') => self.scroll_by(i32::from(self.max_scroll())),
				KeyCode::Char('h') => self.toggle_tab(),
				_ => Effect::None,
			},
			_ => Effect::None,
		}
	}

	fn render(&self, area: Rect, buf: &mut Buffer) {
		let mut block = pane_block(self.title(), self.focused);

		let (style, alignment) = match &self.state {
			ResponseState::Message(_) => (Style::default().fg(GRAY), Alignment::Center),
			ResponseState::Loading => (Style::default().fg(YELLOW), Alignment::Center),
			ResponseState::Ready(response) => {
				block = block.title(Line::from(response.status_line()).fg(response.status_color()).right_aligned());
				(Style::default().fg(WHITE), Alignment::Left)
			},
			ResponseState::Failed(_) => (Style::default().fg(RED), Alignment::Left),
		};

		Paragraph::new(self.content.as_str())
			.style(style)
			.alignment(alignment)
			.scroll((self.scroll, 0))
			.block(block)
			.render(area, buf);
	}

	fn value(&self) -> String {
		self.content.clone()
	}

	fn set_value(&mut self, value: &str) {
		self.set_state(ResponseState::Message(value.to_string()));
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;
	use std::time::Duration;

	use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};

	use super::*;

	fn response(body: &str) -> HttpResponse {
		HttpResponse::new(
			String::new(),
			200,
			String::from("OK"),
			HashMap::from([(String::from("server"), String::from("test"))]),
			body.to_string(),
			Duration::from_millis(3),
		)
	}

	fn key(code: KeyCode) -> AppEvent {
		AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
	}

	fn wheel(kind: MouseEventKind) -> AppEvent {
		AppEvent::Mouse(MouseEvent { kind, column: 0, row: 0, modifiers: KeyModifiers::NONE })
	}

	fn tall_viewer() -> ResponseViewer {
		let mut viewer = ResponseViewer::new();
		viewer.set_width(40);
		viewer.set_height(6);
		let body = (1..=20).map(|line| line.to_string()).collect::<Vec<_>>().join("\n");
		viewer.apply(Ok(response(&body)));
		viewer
	}

	#[test]
	fn test_failure_is_rendered_as_error_text() {
		let mut viewer = ResponseViewer::new();
		viewer.apply(Err(DispatchError::Transport(String::from("connection refused"))));

		assert!(viewer.is_ready());
		assert_eq!(viewer.value(), "Error: Request failed: connection refused");
	}

	#[test]
	fn test_not_ready_until_a_result_arrives() {
		let mut viewer = ResponseViewer::new();
		assert!(!viewer.is_ready());

		viewer.set_loading();
		assert!(!viewer.is_ready());
		assert_eq!(viewer.value(), "loading...");
	}

	#[test]
	fn test_mouse_wheel_scrolls_without_focus() {
		let mut viewer = tall_viewer();

		assert_eq!(viewer.handle_event(&wheel(MouseEventKind::ScrollDown)), Effect::Redraw);
		assert_eq!(viewer.scroll, 3);

		let _ = viewer.handle_event(&wheel(MouseEventKind::ScrollUp));
		assert_eq!(viewer.scroll, 0);
	}

	#[test]
	fn test_keys_scroll_only_when_focused() {
		let mut viewer = tall_viewer();

		assert_eq!(viewer.handle_event(&key(KeyCode::Down)), Effect::None);

		let _ = viewer.focus();
		let _ = viewer.handle_event(&key(KeyCode::Down));
		assert_eq!(viewer.scroll, 1);

		let _ = viewer.handle_event(&key(KeyCode::End));
		assert_eq!(viewer.scroll, 16);

		assert_eq!(viewer.handle_event(&key(KeyCode::PageDown)), Effect::None);
		assert_eq!(viewer.scroll, 16);

		let _ = viewer.handle_event(&key(KeyCode::Home));
		assert_eq!(viewer.scroll, 0);
	}

	#[test]
	fn test_shrinking_clamps_scroll() {
		let mut viewer = tall_viewer();
		let _ = viewer.focus();
		let _ = viewer.handle_event(&key(KeyCode::End));

		viewer.set_height(12);
		assert_eq!(viewer.scroll, 10);
	}

	#[test]
	fn test_headers_tab_toggle() {
		let mut viewer = tall_viewer();
		let _ = viewer.focus();

		let _ = viewer.handle_event(&key(KeyCode::Char('h')));
		assert_eq!(viewer.value(), "server : test");

		let _ = viewer.handle_event(&key(KeyCode::Char('h')));
		assert!(viewer.value().starts_with("1\n2"));
	}

	#[test]
	fn test_new_result_resets_scroll_and_tab() {
		let mut viewer = tall_viewer();
		let _ = viewer.focus();
		let _ = viewer.handle_event(&key(KeyCode::Char('h')));
		let _ = viewer.handle_event(&wheel(MouseEventKind::ScrollDown));

		viewer.apply(Ok(response("fresh")));

		assert_eq!(viewer.scroll, 0);
		assert_eq!(viewer.value(), "fresh");
	}

	#[test]
	fn test_snapshot_shows_status_line() {
		let mut viewer = ResponseViewer::new();
		viewer.set_width(60);
		viewer.set_height(4);
		viewer.apply(Ok(response("hello")));

		let snapshot = viewer.snapshot();
		assert!(snapshot.contains("Response"));
		assert!(snapshot.contains("200 OK"));
		assert!(snapshot.contains("hello"));
		assert_eq!(snapshot, viewer.snapshot());
	}
}
