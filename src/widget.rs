use ratatui::{buffer::Buffer, layout::Rect};

use crate::event::AppEvent;
use crate::utils::buffer_text::buffer_to_string;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetId {
	Url,
	Body,
	Response,
}

/// What a widget asks of the controller after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub enum Effect {
	#[default]
	None,
	Redraw,
}

impl Effect {
	pub const fn or(self, other: Self) -> Self {
		match (self, other) {
			(Self::None, Self::None) => Self::None,
			_ => Self::Redraw,
		}
	}
}

/// A pane the controller can focus, size, feed events to and draw.
///
/// `handle_event` is called for every event whether or not the widget is focused; widgets
/// only act on key input while focused. Focus itself is arbitrated by the controller.
pub trait Focusable {
	fn id(&self) -> WidgetId;

	fn focus(&mut self) -> Effect;

	fn blur(&mut self);

	fn is_focused(&self) -> bool;

	fn set_width(&mut self, width: u16);

	/// No-op for widgets with a fixed height.
	fn set_height(&mut self, height: u16);

	/// Current outer size, borders included.
	fn size(&self) -> (u16, u16);

	fn handle_event(&mut self, event: &AppEvent) -> Effect;

	/// Draws into `area`. Drawing never changes widget state.
	fn render(&self, area: Rect, buf: &mut Buffer);

	fn value(&self) -> String;

	fn set_value(&mut self, value: &str);

	/// The widget drawn at its own size, as text.
	fn snapshot(&self) -> String {
		let (width, height) = self.size();
		let area = Rect::new(0, 0, width, height);
		let mut buffer = Buffer::empty(area);
		self.render(area, &mut buffer);
		buffer_to_string(&buffer)
	}
}

/// Cursor blink driven by ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
	visible: bool,
}

impl Blink {
	pub const fn new() -> Self {
		Self { visible: true }
	}

	pub const fn visible(self) -> bool {
		self.visible
	}

	pub const fn toggle(&mut self) {
		self.visible = !self.visible;
	}

	pub const fn reset(&mut self) {
		self.visible = true;
	}
}

impl Default for Blink {
	fn default() -> Self {
		Self::new()
	}
}
