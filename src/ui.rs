use ratatui::{
	Frame,
	buffer::Buffer,
	layout::{Alignment, Constraint, Direction, Layout, Rect},
	style::{Color, Modifier, Style},
	widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
	app::App,
	overlay::MethodOverlay,
	utils::buffer_text::buffer_to_string,
	widget::WidgetId,
	widgets::{BLUE, GRAY},
};

pub fn draw(frame: &mut Frame, app: &App) {
	let area = frame.area();
	render(app, area, frame.buffer_mut());
}

/// Draws the whole screen into `buf`. Panes are placed where the last resize put them; before
/// the first resize nothing is drawn.
pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
	let Some(placement) = app.placement() else {
		return;
	};

	draw_method_badge(app, placement.badge.intersection(area), buf);

	for (id, pane) in [
		(WidgetId::Url, placement.url),
		(WidgetId::Body, placement.body),
		(WidgetId::Response, placement.response),
	] {
		let pane = pane.intersection(area);
		if pane.is_empty() {
			continue;
		}
		if let Some(widget) = app.widget(id) {
			widget.render(pane, buf);
		}
	}

	draw_footer(app, placement.help.intersection(area), buf);

	if app.overlay.is_open() {
		let overlay_area = MethodOverlay::area(app.origin(), area);
		app.overlay.render(overlay_area, buf);
	}
}

fn draw_method_badge(app: &App, area: Rect, buf: &mut Buffer) {
	if area.is_empty() {
		return;
	}

	let color = app.method.color();
	let border_color = if app.overlay.is_open() { BLUE } else { color };

	Paragraph::new(app.method.as_str())
		.style(Style::default().fg(color).add_modifier(Modifier::BOLD))
		.alignment(Alignment::Center)
		.block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(border_color)))
		.render(area, buf);
}

fn draw_footer(app: &App, area: Rect, buf: &mut Buffer) {
	if area.is_empty() {
		return;
	}

	let info_text = format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
	let info_text_width = u16::try_from(info_text.chars().count()).unwrap_or(u16::MAX);

	let layout = Layout::default()
		.direction(Direction::Horizontal)
		.constraints([Constraint::Min(0), Constraint::Length(info_text_width)])
		.split(area);

	Paragraph::new(app.help_line())
		.style(Style::default().fg(GRAY))
		.wrap(Wrap { trim: true })
		.render(layout[0], buf);
	Paragraph::new(info_text).style(Style::default().fg(Color::Magenta)).render(layout[1], buf);
}

/// Renders the screen at `width` x `height` and returns it as text, one line per row.
pub fn render_to_string(app: &App, width: u16, height: u16) -> String {
	let area = Rect::new(0, 0, width, height);
	let mut buffer = Buffer::empty(area);
	render(app, area, &mut buffer);
	buffer_to_string(&buffer)
}
