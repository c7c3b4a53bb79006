use ratatui::{
	style::{Color, Style},
	text::Line,
	widgets::{Block, BorderType, Borders},
};

pub mod body_editor;
pub mod response_viewer;
pub mod url_bar;

pub use body_editor::BodyEditor;
pub use response_viewer::ResponseViewer;
pub use url_bar::UrlBar;

pub const BLUE: Color = Color::Rgb(0x83, 0xa5, 0x98);
pub const CYAN: Color = Color::Rgb(0x8e, 0xc0, 0x7c);
pub const WHITE: Color = Color::Rgb(0xeb, 0xdb, 0xb2);
pub const GRAY: Color = Color::Rgb(0x92, 0x83, 0x74);
pub const RED: Color = Color::Rgb(0xfb, 0x49, 0x34);
pub const YELLOW: Color = Color::Rgb(0xfa, 0xbd, 0x2f);

/// Rounded frame shared by every pane; the focused one is drawn in the accent color.
pub fn pane_block<'a>(title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
	let border = if focused { Style::default().fg(BLUE) } else { Style::default().fg(GRAY) };

	Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).border_style(border).title(title)
}
