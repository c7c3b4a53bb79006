use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	FocusBody,
	FocusUrl,
	FocusResponse,
	ToggleMethod,
	Send,
	Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
	pub code: KeyCode,
	pub modifiers: KeyModifiers,
}

impl KeyChord {
	pub const fn plain(code: KeyCode) -> Self {
		Self { code, modifiers: KeyModifiers::NONE }
	}

	pub const fn ctrl(c: char) -> Self {
		Self { code: KeyCode::Char(c), modifiers: KeyModifiers::CONTROL }
	}

	pub fn matches(&self, key: &KeyEvent) -> bool {
		// Shift is folded into the char itself for printable keys.
		let modifiers = key.modifiers.difference(KeyModifiers::SHIFT);
		self.code == key.code && self.modifiers == modifiers
	}
}

#[derive(Debug, Clone)]
pub struct Binding {
	pub action: Action,
	pub keys: Vec<KeyChord>,
	pub help_key: &'static str,
	pub help: &'static str,
}

impl Binding {
	pub fn matches(&self, key: &KeyEvent) -> bool {
		self.keys.iter().any(|chord| chord.matches(key))
	}
}

#[derive(Debug, Clone)]
pub struct Keymap {
	pub bindings: Vec<Binding>,
}

impl Keymap {
	pub fn action_for(&self, key: &KeyEvent) -> Option<Action> {
		if key.kind == KeyEventKind::Release {
			return None;
		}
		self.bindings.iter().find(|binding| binding.matches(key)).map(|binding| binding.action)
	}

	pub fn binding(&self, action: Action) -> Option<&Binding> {
		self.bindings.iter().find(|binding| binding.action == action)
	}

	/// Short help for the main screen, in the order the bindings are declared.
	pub fn help_line(&self) -> String {
		self.bindings
			.iter()
			.map(|binding| format!("{} {}", binding.help_key, binding.help))
			.collect::<Vec<_>>()
			.join(" • ")
	}

	pub fn overlay_help_line(&self) -> String {
		let toggle = self.binding(Action::ToggleMethod).map_or("", |binding| binding.help_key);
		format!("↑/k ↓/j move • enter select • {toggle}/esc close")
	}
}

impl Default for Keymap {
	fn default() -> Self {
		Self {
			bindings: vec![
				Binding {
					action: Action::FocusBody,
					keys: vec![KeyChord::plain(KeyCode::Tab)],
					help_key: "tab",
					help: "body",
				},
				Binding {
					action: Action::FocusUrl,
					keys: vec![KeyChord::ctrl('l')],
					help_key: "ctrl+l",
					help: "url",
				},
				Binding {
					action: Action::ToggleMethod,
					keys: vec![KeyChord::ctrl('u')],
					help_key: "ctrl+u",
					help: "method",
				},
				Binding {
					action: Action::FocusResponse,
					keys: vec![KeyChord::ctrl('r')],
					help_key: "ctrl+r",
					help: "response",
				},
				Binding {
					action: Action::Send,
					keys: vec![KeyChord::ctrl('s')],
					help_key: "ctrl+s",
					help: "send",
				},
				Binding {
					action: Action::Quit,
					keys: vec![KeyChord::plain(KeyCode::Esc), KeyChord::ctrl('c')],
					help_key: "esc",
					help: "quit",
				},
			],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_bindings_resolve() {
		let keymap = Keymap::default();

		let cases = [
			(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), Action::FocusBody),
			(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL), Action::FocusUrl),
			(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL), Action::ToggleMethod),
			(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL), Action::FocusResponse),
			(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL), Action::Send),
			(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), Action::Quit),
			(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit),
		];

		for (key, action) in cases {
			assert_eq!(keymap.action_for(&key), Some(action), "{key:?}");
		}
	}

	#[test]
	fn test_plain_typing_is_not_bound() {
		let keymap = Keymap::default();

		assert_eq!(keymap.action_for(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)), None);
		assert_eq!(keymap.action_for(&KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT)), None);
		assert_eq!(keymap.action_for(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)), None);
	}

	#[test]
	fn test_key_release_is_ignored() {
		let keymap = Keymap::default();
		let mut key = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
		key.kind = KeyEventKind::Release;

		assert_eq!(keymap.action_for(&key), None);
	}

	#[test]
	fn test_help_line_lists_bindings() {
		let help = Keymap::default().help_line();

		assert!(help.starts_with("tab body • ctrl+l url • ctrl+u method"));
		assert!(help.ends_with("esc quit"));
	}
}
