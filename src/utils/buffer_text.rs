use ratatui::buffer::Buffer;

/// Plain text of a rendered buffer, one line per row with trailing blanks trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
	let area = buffer.area;
	let mut lines = Vec::with_capacity(usize::from(area.height));

	for y in area.top()..area.bottom() {
		let mut line = String::new();
		for x in area.left()..area.right() {
			line.push_str(buffer[(x, y)].symbol());
		}
		lines.push(line.trim_end().to_string());
	}

	lines.join("\n")
}

#[cfg(test)]
mod tests {
	use ratatui::{layout::Rect, widgets::Widget};

	use super::*;

	#[test]
	fn test_rows_are_joined_and_trimmed() {
		let mut buffer = Buffer::empty(Rect::new(0, 0, 6, 2));
		ratatui::text::Line::from("GET").render(Rect::new(0, 0, 6, 1), &mut buffer);
		ratatui::text::Line::from("x").render(Rect::new(2, 1, 4, 1), &mut buffer);

		assert_eq!(buffer_to_string(&buffer), "GET\n  x");
	}
}
