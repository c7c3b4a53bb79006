use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::Config;
use crate::dispatch::{DispatchError, DispatchOutcome, Dispatcher, RequestId, Transport};
use crate::event::AppEvent;
use crate::keymap::Action;
use crate::layout::{self, PaneSizes, Placement, Viewport};
use crate::overlay::{MethodOverlay, OverlayOutcome};
use crate::request::{HttpMethod, HttpRequest};
use crate::widget::{Effect, Focusable, WidgetId};
use crate::widgets::{BodyEditor, ResponseViewer, UrlBar};

/// Width of the method badge: the longest method name plus borders and padding.
pub const BADGE_WIDTH: u16 = 11;
const BADGE_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
	Url,
	Method,
	Body,
	Response,
	None,
}

impl FocusTarget {
	const fn widget(self) -> Option<WidgetId> {
		match self {
			Self::Url => Some(WidgetId::Url),
			Self::Body => Some(WidgetId::Body),
			Self::Response => Some(WidgetId::Response),
			Self::Method | Self::None => None,
		}
	}
}

pub struct App {
	pub config: Config,
	pub method: HttpMethod,
	pub focus: FocusTarget,
	pub overlay: MethodOverlay,
	pub viewport: Option<Viewport>,
	pub should_quit: bool,

	inputs: Vec<Box<dyn Focusable>>,
	response: Option<ResponseViewer>,
	pending_response: Option<DispatchOutcome>,
	/// Focus to return to when the method picker closes.
	focus_before_overlay: FocusTarget,
	dispatcher: Dispatcher,
}

impl App {
	pub fn new(config: Config, transport: Arc<dyn Transport>, events: UnboundedSender<AppEvent>) -> Self {
		let mut url_bar = UrlBar::new();
		url_bar.set_value(&config.initial_url);

		let mut body_editor = BodyEditor::new();
		body_editor.set_value(&config.initial_body);

		let dispatcher = Dispatcher::new(transport, events, config.timeout);

		let mut app = Self {
			method: config.initial_method,
			focus: FocusTarget::None,
			overlay: MethodOverlay::default(),
			viewport: None,
			should_quit: false,
			inputs: vec![Box::new(url_bar), Box::new(body_editor)],
			response: None,
			pending_response: None,
			focus_before_overlay: FocusTarget::Body,
			dispatcher,
			config,
		};

		// The body editor starts out focused.
		let _ = app.set_focus(FocusTarget::Body);
		app
	}

	/// Processes one event completely. Returns whether the screen needs redrawing.
	pub fn handle_event(&mut self, event: AppEvent) -> Effect {
		match event {
			AppEvent::Key(key) => self.handle_key(key),
			AppEvent::Resize(width, height) => self.handle_resize(width, height),
			AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
			AppEvent::Response { id, outcome } => self.handle_response(id, outcome),
			AppEvent::Tick | AppEvent::Paste(_) | AppEvent::Command(_) => self.update_widgets(&event),
		}
	}

	fn handle_key(&mut self, key: KeyEvent) -> Effect {
		if self.overlay.is_open() {
			let effect = self.update_widgets(&AppEvent::Key(key));
			return effect.or(self.handle_overlay_key(key));
		}

		match self.config.keymap.action_for(&key) {
			Some(action) => {
				let effect = self.update_widgets(&AppEvent::Command(action));
				effect.or(self.perform(action))
			},
			None => self.update_widgets(&AppEvent::Key(key)),
		}
	}

	/// Keys while the method picker is open. Nothing else sees them, except ctrl+c which still quits.
	fn handle_overlay_key(&mut self, key: KeyEvent) -> Effect {
		if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
			return self.perform(Action::Quit);
		}

		if self.config.keymap.action_for(&key) == Some(Action::ToggleMethod) {
			return self.perform(Action::ToggleMethod);
		}

		match self.overlay.handle_key(&key) {
			OverlayOutcome::Ignored => Effect::None,
			OverlayOutcome::Moved => Effect::Redraw,
			OverlayOutcome::Selected(method) => {
				tracing::debug!(%method, "method selected");
				self.method = method;
				self.restore_focus_after_overlay()
			},
			OverlayOutcome::Closed => self.restore_focus_after_overlay(),
		}
	}

	fn perform(&mut self, action: Action) -> Effect {
		match action {
			Action::FocusBody => self.set_focus(FocusTarget::Body),
			Action::FocusUrl => self.set_focus(FocusTarget::Url),
			Action::FocusResponse => self.set_focus(FocusTarget::Response),
			Action::ToggleMethod => self.toggle_method_overlay(),
			Action::Send => self.send_request(),
			Action::Quit => {
				self.dispatcher.cancel();
				self.should_quit = true;
				Effect::Redraw
			},
		}
	}

	fn toggle_method_overlay(&mut self) -> Effect {
		if self.overlay.is_open() {
			return self.restore_focus_after_overlay();
		}

		self.focus_before_overlay = self.focus;
		self.overlay.toggle(self.method);
		self.set_focus(FocusTarget::Method)
	}

	fn restore_focus_after_overlay(&mut self) -> Effect {
		self.overlay.close();
		let target = match self.focus_before_overlay {
			FocusTarget::Method => FocusTarget::None,
			target => target,
		};
		self.set_focus(target)
	}

	/// Focuses `target` and blurs every other widget.
	pub fn set_focus(&mut self, target: FocusTarget) -> Effect {
		let wanted = target.widget();

		for widget in self.widgets_mut() {
			if Some(widget.id()) == wanted {
				if !widget.is_focused() {
					let _ = widget.focus();
				}
			} else if widget.is_focused() {
				widget.blur();
			}
		}

		// The response pane may not exist yet; then nothing ends up focused.
		self.focus = if wanted.is_some() && self.focused_widget().is_none() { FocusTarget::None } else { target };
		tracing::trace!(focus = ?self.focus, "focus changed");

		debug_assert!(self.focused_count() <= 1, "more than one widget focused");
		Effect::Redraw
	}

	fn send_request(&mut self) -> Effect {
		let _ = self.set_focus(FocusTarget::None);

		let url = self.url();
		if url.is_empty() {
			// A send always supersedes the request in flight, even one that never leaves.
			self.dispatcher.cancel();
			return self.show_outcome(Err(DispatchError::InvalidUrl(url)));
		}

		let request = HttpRequest::new()
			.with_method(self.method)
			.with_url(url)
			.with_headers(self.config.headers.clone())
			.with_body(self.body());

		self.dispatcher.send(request);

		if let Some(response) = &mut self.response {
			response.set_loading();
		}
		Effect::Redraw
	}

	fn handle_response(&mut self, id: RequestId, outcome: DispatchOutcome) -> Effect {
		if !self.dispatcher.accept(id) {
			tracing::debug!(request = ?id, "dropping stale response");
			return Effect::None;
		}
		self.show_outcome(outcome)
	}

	fn show_outcome(&mut self, outcome: DispatchOutcome) -> Effect {
		match &mut self.response {
			Some(response) => response.apply(outcome),
			None => self.pending_response = Some(outcome),
		}
		Effect::Redraw
	}

	fn handle_resize(&mut self, width: u16, height: u16) -> Effect {
		let _ = self.update_widgets(&AppEvent::Resize(width, height));

		self.viewport = Some(Viewport { width, height });

		if self.response.is_none() {
			let mut response = ResponseViewer::new();
			if let Some(outcome) = self.pending_response.take() {
				response.apply(outcome);
			}
			self.response = Some(response);
		}

		self.size_widgets();
		Effect::Redraw
	}

	fn handle_mouse(&mut self, mouse: MouseEvent) -> Effect {
		let position = Position::new(mouse.column, mouse.row);
		let placement = self.placement();

		// The wheel only scrolls the response pane while the pointer is over it.
		let forward = match mouse.kind {
			MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
				!self.overlay.is_open() && placement.is_some_and(|placement| placement.response.contains(position))
			},
			_ => true,
		};
		let effect = if forward { self.update_widgets(&AppEvent::Mouse(mouse)) } else { Effect::None };

		if self.overlay.is_open() || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
			return effect;
		}

		let Some(placement) = placement else {
			return effect;
		};

		let panes = [
			(placement.url, FocusTarget::Url),
			(placement.body, FocusTarget::Body),
			(placement.response, FocusTarget::Response),
		];
		let target = panes.into_iter().find(|(area, _)| area.contains(position)).map(|(_, target)| target);

		match target {
			Some(target) if target != self.focus => effect.or(self.set_focus(target)),
			_ => effect,
		}
	}

	/// Passive pass: every widget sees every event, focused or not.
	fn update_widgets(&mut self, event: &AppEvent) -> Effect {
		self.widgets_mut().fold(Effect::None, |effect, widget| effect.or(widget.handle_event(event)))
	}

	fn widgets_mut(&mut self) -> impl Iterator<Item = &mut (dyn Focusable + 'static)> {
		self.inputs
			.iter_mut()
			.map(|widget| widget.as_mut())
			.chain(self.response.iter_mut().map(|widget| widget as &mut (dyn Focusable + 'static)))
	}

	pub fn widgets(&self) -> impl Iterator<Item = &(dyn Focusable + 'static)> {
		self.inputs
			.iter()
			.map(|widget| widget.as_ref())
			.chain(self.response.iter().map(|widget| widget as &(dyn Focusable + 'static)))
	}

	pub fn widget(&self, id: WidgetId) -> Option<&dyn Focusable> {
		self.widgets().find(|widget| widget.id() == id)
	}

	pub const fn response(&self) -> Option<&ResponseViewer> {
		self.response.as_ref()
	}

	fn focused_widget(&self) -> Option<&dyn Focusable> {
		self.widgets().find(|widget| widget.is_focused())
	}

	pub fn focused_count(&self) -> usize {
		self.widgets().filter(|widget| widget.is_focused()).count()
	}

	pub fn url(&self) -> String {
		self.widget(WidgetId::Url).map(Focusable::value).unwrap_or_default()
	}

	pub fn body(&self) -> String {
		self.widget(WidgetId::Body).map(Focusable::value).unwrap_or_default()
	}

	/// Measured height of the method/url row.
	fn bar_height(&self) -> u16 {
		let url_height = self.widget(WidgetId::Url).map_or(0, |widget| widget.size().1);
		url_height.max(BADGE_HEIGHT)
	}

	pub fn pane_sizes(&self) -> Option<PaneSizes> {
		self.viewport.map(|viewport| layout::compute(viewport, &self.config.chrome, self.bar_height()))
	}

	pub fn placement(&self) -> Option<Placement> {
		self.pane_sizes().map(|sizes| layout::place(&sizes, &self.config.chrome, BADGE_WIDTH))
	}

	fn size_widgets(&mut self) {
		let Some(sizes) = self.pane_sizes() else {
			return;
		};
		let url_width = sizes.bar.width.saturating_sub(BADGE_WIDTH);

		for widget in self.widgets_mut() {
			let (width, height) = match widget.id() {
				WidgetId::Url => (url_width, sizes.bar.height),
				WidgetId::Body => (sizes.body.width, sizes.body.height),
				WidgetId::Response => (sizes.response.width, sizes.response.height),
			};
			widget.set_width(width);
			widget.set_height(height);
		}

		tracing::debug!(?sizes, "panes resized");
	}

	/// Document origin, i.e. the inside of the margins.
	pub const fn origin(&self) -> (u16, u16) {
		(self.config.chrome.margins.left, self.config.chrome.margins.top)
	}

	pub fn help_line(&self) -> String {
		if self.overlay.is_open() { self.config.keymap.overlay_help_line() } else { self.config.keymap.help_line() }
	}
}
