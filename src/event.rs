use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::dispatch::{DispatchOutcome, RequestId};
use crate::keymap::Action;

/// Everything the controller reacts to, terminal input and request completions alike.
#[derive(Debug, Clone)]
pub enum AppEvent {
	Key(KeyEvent),
	Mouse(MouseEvent),
	Resize(u16, u16),
	Paste(String),
	Tick,
	/// A bound key, already translated by the keymap.
	Command(Action),
	Response { id: RequestId, outcome: DispatchOutcome },
}

pub fn channel() -> (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) {
	unbounded_channel()
}

/// Reads terminal input on a dedicated thread and forwards it, plus a tick every `tick_rate`.
///
/// The thread stops once the receiving side is dropped.
pub fn spawn_terminal_reader(tx: UnboundedSender<AppEvent>, tick_rate: Duration) {
	thread::spawn(move || {
		let mut last_tick = Instant::now();

		loop {
			let timeout = tick_rate.saturating_sub(last_tick.elapsed());

			match event::poll(timeout) {
				Ok(true) => match event::read() {
					Ok(event) => {
						if let Some(event) = translate(event) {
							if tx.send(event).is_err() {
								break;
							}
						}
					},
					Err(error) => tracing::warn!("failed to read terminal event: {error}"),
				},
				Ok(false) => {},
				Err(error) => {
					tracing::error!("terminal polling failed: {error}");
					break;
				},
			}

			if last_tick.elapsed() >= tick_rate {
				if tx.send(AppEvent::Tick).is_err() {
					break;
				}
				last_tick = Instant::now();
			}
		}

		tracing::debug!("terminal reader stopped");
	});
}

fn translate(event: Event) -> Option<AppEvent> {
	match event {
		Event::Key(key) if key.kind != KeyEventKind::Release => Some(AppEvent::Key(key)),
		Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
		Event::Resize(width, height) => Some(AppEvent::Resize(width, height)),
		Event::Paste(text) => Some(AppEvent::Paste(text)),
		_ => None,
	}
}
