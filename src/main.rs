use anyhow::Result;
use clap::Parser;
use crossterm::{
	event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
	execute,
	terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

mod app;
mod config;
mod dispatch;
mod event;
mod http_client;
mod keymap;
mod layout;
mod logger;
mod overlay;
mod request;
mod response;
mod ui;
mod utils;
mod widget;
mod widgets;

use app::App;
use config::{Cli, Config};
use event::AppEvent;
use http_client::HttpClient;
use widget::Effect;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
	let config = Config::from(Cli::parse());
	let log_path = logger::initialize_logging()?;
	trace_dbg!(level: tracing::Level::INFO, log_path);

	let transport = Arc::new(HttpClient::new(&config));

	install_panic_hook();
	let mut terminal = setup_terminal()?;

	let (tx, rx) = event::channel();
	event::spawn_terminal_reader(tx.clone(), config.tick_rate);

	// crossterm only reports size changes, so the first layout pass is ours to trigger.
	let (width, height) = terminal::size()?;
	let _ = tx.send(AppEvent::Resize(width, height));

	let mut app = App::new(config, transport, tx);
	let res = run_app(&mut terminal, &mut app, rx).await;

	restore_terminal()?;
	terminal.show_cursor()?;

	if let Err(error) = res {
		tracing::error!("{error:?}");
		println!("Error: {error}");
	}

	Ok(())
}

async fn run_app(terminal: &mut Tui, app: &mut App, mut rx: UnboundedReceiver<AppEvent>) -> Result<()> {
	terminal.draw(|frame| ui::draw(frame, app))?;

	while let Some(event) = rx.recv().await {
		let effect = app.handle_event(event);

		if app.should_quit {
			break;
		}

		if effect == Effect::Redraw {
			terminal.draw(|frame| ui::draw(frame, app))?;
		}
	}

	tracing::info!("shutting down");
	Ok(())
}

fn setup_terminal() -> Result<Tui> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
	let backend = CrosstermBackend::new(stdout);
	Ok(Terminal::new(backend)?)
}

fn restore_terminal() -> Result<()> {
	disable_raw_mode()?;
	execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, DisableBracketedPaste)?;
	Ok(())
}

fn install_panic_hook() {
	let hook = std::panic::take_hook();
	std::panic::set_hook(Box::new(move |info| {
		let _ = restore_terminal();
		tracing::error!("{info}");
		hook(info);
	}));
}
