use ratatui::{
	buffer::Buffer,
	layout::Rect,
	style::{Modifier, Style},
	widgets::Widget,
};
use tui_textarea::{Input, Key, TextArea};

use super::{CYAN, WHITE, pane_block};
use crate::event::AppEvent;
use crate::widget::{Blink, Effect, Focusable, WidgetId};

/// Bordered single line, so its height never changes.
const HEIGHT: u16 = 3;

pub struct UrlBar {
	textarea: TextArea<'static>,
	focused: bool,
	blink: Blink,
	width: u16,
}

impl UrlBar {
	pub fn new() -> Self {
		let mut url_bar = Self { textarea: TextArea::default(), focused: false, blink: Blink::new(), width: 0 };
		url_bar.set_value("");
		url_bar
	}

	fn restyle(&mut self) {
		let cursor = if self.focused && self.blink.visible() {
			Style::default().fg(WHITE).add_modifier(Modifier::REVERSED)
		} else {
			Style::default()
		};

		self.textarea.set_block(pane_block("URL", self.focused));
		self.textarea.set_cursor_style(cursor);
	}

	const fn is_line_break(input: &Input) -> bool {
		matches!(input.key, Key::Enter) || (input.ctrl && matches!(input.key, Key::Char('m' | 'j')))
	}
}

impl Default for UrlBar {
	fn default() -> Self {
		Self::new()
	}
}

impl Focusable for UrlBar {
	fn id(&self) -> WidgetId {
		WidgetId::Url
	}

	fn focus(&mut self) -> Effect {
		self.focused = true;
		self.blink.reset();
		self.restyle();
		Effect::Redraw
	}

	fn blur(&mut self) {
		self.focused = false;
		self.restyle();
	}

	fn is_focused(&self) -> bool {
		self.focused
	}

	fn set_width(&mut self, width: u16) {
		self.width = width;
	}

	fn set_height(&mut self, _height: u16) {}

	fn size(&self) -> (u16, u16) {
		(self.width, HEIGHT)
	}

	fn handle_event(&mut self, event: &AppEvent) -> Effect {
		match event {
			AppEvent::Tick => {
				self.blink.toggle();
				self.restyle();
				if self.focused { Effect::Redraw } else { Effect::None }
			},
			AppEvent::Key(key) if self.focused => {
				let input = Input::from(*key);
				if Self::is_line_break(&input) {
					return Effect::None;
				}
				self.textarea.input(input);
				self.blink.reset();
				self.restyle();
				Effect::Redraw
			},
			AppEvent::Paste(text) if self.focused => {
				let single_line: String = text.lines().map(str::trim).collect();
				self.textarea.insert_str(single_line);
				Effect::Redraw
			},
			_ => Effect::None,
		}
	}

	fn render(&self, area: Rect, buf: &mut Buffer) {
		Widget::render(&self.textarea, area, buf);
	}

	fn value(&self) -> String {
		self.textarea.lines().join("").trim().to_string()
	}

	fn set_value(&mut self, value: &str) {
		let mut textarea = TextArea::from([value.replace(['\r', '\n'], "")]);
		textarea.set_placeholder_text("https://api.something.com/v1/users");
		textarea.set_placeholder_style(Style::default().fg(CYAN));
		textarea.set_cursor_line_style(Style::default());
		textarea.move_cursor(tui_textarea::CursorMove::End);
		self.textarea = textarea;
		self.restyle();
	}
}
