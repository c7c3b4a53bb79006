use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
	buffer::Buffer,
	layout::Rect,
	style::{Modifier, Style},
	widgets::{Clear, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::request::HttpMethod;
use crate::widgets::{WHITE, pane_block};

/// Where the picker is drawn, relative to the top-left corner of the document.
pub const ANCHOR: (u16, u16) = (10, 10);

const WIDTH: u16 = 14;
const HEIGHT: u16 = HttpMethod::ALL.len() as u16 + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayOutcome {
	/// Key had no meaning for the picker.
	Ignored,
	Moved,
	Selected(HttpMethod),
	Closed,
}

/// Modal method picker. While open it takes all key input.
#[derive(Debug, Clone, Default)]
pub struct MethodOverlay {
	open: bool,
	highlighted: usize,
}

impl MethodOverlay {
	pub const fn is_open(&self) -> bool {
		self.open
	}

	pub const fn highlighted(&self) -> HttpMethod {
		HttpMethod::from_index(self.highlighted)
	}

	/// Flips visibility. Opening highlights `current`.
	pub const fn toggle(&mut self, current: HttpMethod) {
		if self.open {
			self.open = false;
		} else {
			self.open = true;
			self.highlighted = current.index();
		}
	}

	pub const fn close(&mut self) {
		self.open = false;
	}

	/// Handles a key while open. The toggle key is the caller's business, since it is
	/// configurable.
	pub fn handle_key(&mut self, key: &KeyEvent) -> OverlayOutcome {
		if !self.open {
			return OverlayOutcome::Ignored;
		}

		let count = HttpMethod::ALL.len();

		match key.code {
			KeyCode::Down | KeyCode::Char('j') => {
				self.highlighted = (self.highlighted + 1) % count;
				OverlayOutcome::Moved
			},
			KeyCode::Up | KeyCode::Char('k') => {
				self.highlighted = (self.highlighted + count - 1) % count;
				OverlayOutcome::Moved
			},
			KeyCode::Enter => {
				self.open = false;
				OverlayOutcome::Selected(self.highlighted())
			},
			KeyCode::Esc => {
				self.open = false;
				OverlayOutcome::Closed
			},
			_ => OverlayOutcome::Ignored,
		}
	}

	/// The picker's rectangle for a document starting at `origin`, clipped to `bounds`.
	pub fn area(origin: (u16, u16), bounds: Rect) -> Rect {
		let x = origin.0.saturating_add(ANCHOR.0);
		let y = origin.1.saturating_add(ANCHOR.1);
		Rect::new(x, y, WIDTH, HEIGHT).intersection(bounds)
	}

	pub fn render(&self, area: Rect, buf: &mut Buffer) {
		if !self.open || area.is_empty() {
			return;
		}

		let items: Vec<ListItem> = HttpMethod::ALL
			.iter()
			.map(|method| ListItem::new(method.as_str()).style(Style::default().fg(method.color())))
			.collect();

		let list = List::new(items)
			.block(pane_block("Method", true))
			.highlight_symbol("> ")
			.highlight_style(Style::default().fg(WHITE).add_modifier(Modifier::BOLD | Modifier::REVERSED));

		let mut state = ListState::default().with_selected(Some(self.highlighted));

		Clear.render(area, buf);
		StatefulWidget::render(list, area, buf, &mut state);
	}
}

#[cfg(test)]
mod tests {
	use crossterm::event::KeyModifiers;

	use super::*;
	use crate::utils::buffer_text::buffer_to_string;

	fn key(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	#[test]
	fn test_toggle_twice_closes_without_selection() {
		let mut overlay = MethodOverlay::default();

		overlay.toggle(HttpMethod::Put);
		assert!(overlay.is_open());
		assert_eq!(overlay.highlighted(), HttpMethod::Put);

		overlay.toggle(HttpMethod::Put);
		assert!(!overlay.is_open());
	}

	#[test]
	fn test_navigation_wraps() {
		let mut overlay = MethodOverlay::default();
		overlay.toggle(HttpMethod::Get);

		assert_eq!(overlay.handle_key(&key(KeyCode::Up)), OverlayOutcome::Moved);
		assert_eq!(overlay.highlighted(), HttpMethod::Head);

		assert_eq!(overlay.handle_key(&key(KeyCode::Char('j'))), OverlayOutcome::Moved);
		assert_eq!(overlay.highlighted(), HttpMethod::Get);
	}

	#[test]
	fn test_enter_selects_and_closes() {
		let mut overlay = MethodOverlay::default();
		overlay.toggle(HttpMethod::Get);
		let _ = overlay.handle_key(&key(KeyCode::Down));
		let _ = overlay.handle_key(&key(KeyCode::Down));

		assert_eq!(overlay.handle_key(&key(KeyCode::Enter)), OverlayOutcome::Selected(HttpMethod::Put));
		assert!(!overlay.is_open());
	}

	#[test]
	fn test_escape_closes() {
		let mut overlay = MethodOverlay::default();
		overlay.toggle(HttpMethod::Get);

		assert_eq!(overlay.handle_key(&key(KeyCode::Esc)), OverlayOutcome::Closed);
		assert!(!overlay.is_open());
	}

	#[test]
	fn test_closed_overlay_ignores_keys() {
		let mut overlay = MethodOverlay::default();

		assert_eq!(overlay.handle_key(&key(KeyCode::Enter)), OverlayOutcome::Ignored);
		assert!(!overlay.is_open());
	}

	#[test]
	fn test_area_is_anchored_and_clipped() {
		let bounds = Rect::new(0, 0, 80, 24);

		assert_eq!(MethodOverlay::area((2, 1), bounds), Rect::new(12, 11, WIDTH, HEIGHT));
		assert_eq!(MethodOverlay::area((2, 1), Rect::new(0, 0, 20, 15)), Rect::new(12, 11, 8, 4));
	}

	#[test]
	fn test_render_lists_methods_with_highlight() {
		let mut overlay = MethodOverlay::default();
		overlay.toggle(HttpMethod::Post);

		let area = Rect::new(0, 0, WIDTH, HEIGHT);
		let mut buffer = Buffer::empty(area);
		overlay.render(area, &mut buffer);
		let text = buffer_to_string(&buffer);

		assert!(text.contains("Method"));
		assert!(text.contains("> POST"));
		assert!(text.contains("OPTIONS"));
	}
}
