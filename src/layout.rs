//! Pane sizing.
//!
//! Everything here is recomputed from scratch on every resize: the same viewport always yields
//! the same sizes, and nothing carries over from a previous computation.

use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
	pub width: u16,
	pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margins {
	pub top: u16,
	pub right: u16,
	pub bottom: u16,
	pub left: u16,
}

/// Fixed screen furniture around the panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chrome {
	pub margins: Margins,
	pub help_height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
	pub width: u16,
	pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneSizes {
	pub available_width: u16,
	pub available_height: u16,
	/// Method badge and url field row.
	pub bar: Size,
	pub body: Size,
	pub response: Size,
	/// Rows lost to the 2/3 : 1/3 split, left blank under the response pane.
	pub slack: u16,
}

/// Sizes every pane for `viewport`.
///
/// `bar_height` is the measured height of the method/url row. Widths follow one convention for
/// every pane: the outer width, borders included.
pub const fn compute(viewport: Viewport, chrome: &Chrome, bar_height: u16) -> PaneSizes {
	let margins = chrome.margins;

	let available_height = viewport
		.height
		.saturating_sub(margins.top)
		.saturating_sub(margins.bottom)
		.saturating_sub(chrome.help_height);
	let available_width = viewport.width.saturating_sub(margins.left).saturating_sub(margins.right);

	let bar_height = if bar_height < available_height { bar_height } else { available_height };
	let split = available_height - bar_height;

	let third = split / 3;
	let body_height = 2 * third;
	let response_height = third;

	PaneSizes {
		available_width,
		available_height,
		bar: Size { width: available_width, height: bar_height },
		body: Size { width: available_width, height: body_height },
		response: Size { width: available_width, height: response_height },
		slack: split - body_height - response_height,
	}
}

/// Screen rectangles derived from [`PaneSizes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
	pub badge: Rect,
	pub url: Rect,
	pub body: Rect,
	pub response: Rect,
	pub help: Rect,
}

/// Stacks the panes top to bottom inside the margins: bar, body, response, then the help bar
/// right after the slack rows.
pub fn place(sizes: &PaneSizes, chrome: &Chrome, badge_width: u16) -> Placement {
	let margins = chrome.margins;
	let x = margins.left;
	let mut y = margins.top;

	let badge_width = badge_width.min(sizes.bar.width);
	let badge = Rect::new(x, y, badge_width, sizes.bar.height);
	let url = Rect::new(x + badge_width, y, sizes.bar.width - badge_width, sizes.bar.height);
	y += sizes.bar.height;

	let body = Rect::new(x, y, sizes.body.width, sizes.body.height);
	y += sizes.body.height;

	let response = Rect::new(x, y, sizes.response.width, sizes.response.height);
	y += sizes.response.height + sizes.slack;

	let help = Rect::new(x, y, sizes.available_width, chrome.help_height);

	Placement { badge, url, body, response, help }
}
