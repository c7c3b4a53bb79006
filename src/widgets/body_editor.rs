use ratatui::{
	buffer::Buffer,
	layout::Rect,
	style::{Modifier, Style},
	widgets::Widget,
};
use tui_textarea::{Input, TextArea};

use super::{CYAN, GRAY, WHITE, pane_block};
use crate::event::AppEvent;
use crate::widget::{Blink, Effect, Focusable, WidgetId};

pub struct BodyEditor {
	textarea: TextArea<'static>,
	focused: bool,
	blink: Blink,
	width: u16,
	height: u16,
}

impl BodyEditor {
	pub fn new() -> Self {
		let mut editor =
			Self { textarea: TextArea::default(), focused: false, blink: Blink::new(), width: 0, height: 0 };
		editor.set_value("");
		editor
	}

	fn restyle(&mut self) {
		let (cursor, cursor_line) = if self.focused {
			let cursor = if self.blink.visible() {
				Style::default().fg(WHITE).add_modifier(Modifier::REVERSED)
			} else {
				Style::default()
			};
			(cursor, Style::default().fg(CYAN))
		} else {
			(Style::default(), Style::default())
		};

		self.textarea.set_block(pane_block("Body", self.focused));
		self.textarea.set_cursor_style(cursor);
		self.textarea.set_cursor_line_style(cursor_line);
	}
}

impl Default for BodyEditor {
	fn default() -> Self {
		Self::new()
	}
}

impl Focusable for BodyEditor {
	fn id(&self) -> WidgetId {
		WidgetId::Body
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

	fn set_height(&mut self, height: u16) {
		self.height = height;
	}

	fn size(&self) -> (u16, u16) {
		(self.width, self.height)
	}

	fn handle_event(&mut self, event: &AppEvent) -> Effect {
		match event {
			AppEvent::Tick => {
				self.blink.toggle();
				self.restyle();
				if self.focused { Effect::Redraw } else { Effect::None }
			},
			AppEvent::Key(key) if self.focused => {
				self.textarea.input(Input::from(*key));
				self.blink.reset();
				self.restyle();
				Effect::Redraw
			},
			AppEvent::Paste(text) if self.focused => {
				self.textarea.insert_str(text.replace("\r\n", "\n"));
				Effect::Redraw
			},
			_ => Effect::None,
		}
	}

	fn render(&self, area: Rect, buf: &mut Buffer) {
		Widget::render(&self.textarea, area, buf);
	}

	fn value(&self) -> String {
		self.textarea.lines().join("\n")
	}

	fn set_value(&mut self, value: &str) {
		let mut textarea = TextArea::from(value.lines());
		textarea.set_placeholder_text("Type something");
		textarea.set_placeholder_style(Style::default().fg(CYAN));
		textarea.set_line_number_style(Style::default().fg(GRAY));
		self.textarea = textarea;
		self.restyle();
	}
}
