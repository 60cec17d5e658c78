use crate::pointer::PointerHub;
use crate::runtime::command::Command;
use crate::runtime::key_bindings::KeyBindings;
use crate::terminal::{Terminal, TerminalEvent, TerminalSize};
use crate::ui::frame::RenderFrame;
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::autocomplete::Autocomplete;
use crate::widgets::traits::{Drawable, InteractionResult, Interactive, RenderContext, WidgetAction};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const DEFAULT_POLL: Duration = Duration::from_millis(120);
const HINT: &str = "Type to search, click a suggestion to pick it. Enter accepts, Esc quits.";

/// Rows above the widget: title and a spacer.
const WIDGET_ROW: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Running,
    Submitted,
    Cancelled,
}

/// Terminal-independent part of the runtime: routes events to the widget,
/// fires its timers and composes frames.
pub struct Screen {
    title: String,
    widget: Autocomplete,
    hub: PointerHub,
    key_bindings: KeyBindings,
    last_selection: Option<String>,
    outcome: Outcome,
}

impl Screen {
    pub fn new(title: impl Into<String>, widget: Autocomplete) -> Self {
        Self {
            title: title.into(),
            widget,
            hub: PointerHub::new(),
            key_bindings: KeyBindings::new(),
            last_selection: None,
            outcome: Outcome::Running,
        }
    }

    pub fn widget(&self) -> &Autocomplete {
        &self.widget
    }

    pub fn hub(&self) -> &PointerHub {
        &self.hub
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Mounts the widget. `pointer_events` is false when the terminal could
    /// not deliver mouse presses.
    pub fn mount(&mut self, pointer_events: bool) {
        let hub = pointer_events.then_some(&self.hub);
        self.widget.mount(hub);
    }

    pub fn teardown(&mut self) {
        self.widget.teardown();
    }

    /// Handles one terminal event. Returns whether a redraw is needed.
    pub fn dispatch(&mut self, event: TerminalEvent, now: Instant) -> bool {
        match event {
            TerminalEvent::Key(key) => match self.key_bindings.resolve(key) {
                Command::Exit => {
                    self.outcome = Outcome::Cancelled;
                    false
                }
                Command::Submit => {
                    self.outcome = Outcome::Submitted;
                    false
                }
                Command::InputKey(key) => {
                    let result = self.widget.on_key(key, now);
                    self.apply(result)
                }
            },
            TerminalEvent::Pointer(pointer) => {
                self.hub.dispatch(&pointer);
                let result = self.widget.on_pointer(pointer);
                self.apply(result);
                // The hub may have dismissed the dropdown even if the widget ignored the press.
                true
            }
            TerminalEvent::Resize(_) => true,
            TerminalEvent::Tick => false,
        }
    }

    /// Fires due timers. Returns whether a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let result = self.widget.on_tick(now);
        self.apply(result)
    }

    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.widget.next_deadline() {
            Some(due_at) => due_at.saturating_duration_since(now).min(DEFAULT_POLL),
            None => DEFAULT_POLL,
        }
    }

    pub fn frame(&mut self, size: TerminalSize) -> RenderFrame {
        let ctx = RenderContext {
            focused: true,
            width: size.width,
        };
        self.widget.layout(WIDGET_ROW, &ctx);

        let mut lines = vec![
            vec![Span::styled(self.title.clone(), Style::new().bold())],
            Vec::new(),
        ];
        lines.extend(self.widget.draw(&ctx).lines);
        lines.push(Vec::new());
        if let Some(selection) = &self.last_selection {
            lines.push(vec![
                Span::styled("Selected: ", Style::new().color(Color::Green)),
                Span::new(selection.clone()),
            ]);
        }
        lines.push(vec![Span::styled(HINT, Style::new().color(Color::DarkGrey))]);

        RenderFrame {
            lines,
            cursor: self.widget.cursor_pos(),
        }
    }

    fn apply(&mut self, result: InteractionResult) -> bool {
        for action in result.actions {
            match action {
                WidgetAction::Selected { id, value } => {
                    debug!(%id, %value, "selection");
                    self.last_selection = Some(value);
                }
                WidgetAction::ValueChanged { id, value } => {
                    debug!(%id, %value, "value changed");
                }
            }
        }
        result.request_render
    }
}

/// Drives a [`Screen`] on a real terminal until the user submits or quits.
pub struct Runtime {
    terminal: Terminal,
    screen: Screen,
}

impl Runtime {
    pub fn new(terminal: Terminal, screen: Screen) -> Self {
        Self { terminal, screen }
    }

    /// Runs the event loop. Returns the submitted value, or `None` when the
    /// user quit.
    pub fn run(mut self) -> io::Result<Option<String>> {
        self.terminal.enter()?;

        let pointer_events = match self.terminal.enable_pointer_capture() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "mouse capture unavailable");
                false
            }
        };
        self.screen.mount(pointer_events);

        let run_result = self.event_loop();

        self.screen.teardown();
        let exit_result = self.terminal.exit();
        run_result.and(exit_result)?;

        let value = match self.screen.outcome() {
            Outcome::Submitted => Some(self.screen.widget().value()),
            Outcome::Running | Outcome::Cancelled => None,
        };
        info!(submitted = value.is_some(), "autocomplete finished");
        Ok(value)
    }

    fn event_loop(&mut self) -> io::Result<()> {
        self.render()?;

        while self.screen.outcome() == Outcome::Running {
            if self.screen.tick(Instant::now()) {
                self.render()?;
            }

            let timeout = self.screen.poll_timeout(Instant::now());
            let event = self.terminal.poll_event(timeout)?;
            if let TerminalEvent::Resize(size) = event {
                self.terminal.set_size(size);
            }
            if self.screen.dispatch(event, Instant::now()) {
                self.render()?;
            }
        }

        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let frame = self.screen.frame(self.terminal.size());
        self.terminal.render(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, Screen, WIDGET_ROW};
    use crate::core::candidates::CandidateList;
    use crate::core::controller::FILTER_DEBOUNCE;
    use crate::pointer::PointerEvent;
    use crate::terminal::{KeyCode, KeyEvent, TerminalEvent, TerminalSize};
    use crate::ui::span::line_text;
    use crate::widgets::autocomplete::Autocomplete;
    use std::time::{Duration, Instant};

    const SIZE: TerminalSize = TerminalSize {
        width: 80,
        height: 24,
    };

    fn screen(items: &[&str]) -> Screen {
        let widget = Autocomplete::new("country", "Country", CandidateList::from(items));
        let mut screen = Screen::new("Countries", widget);
        screen.mount(true);
        screen.frame(SIZE);
        screen
    }

    fn type_text(screen: &mut Screen, text: &str, now: Instant) {
        for ch in text.chars() {
            screen.dispatch(TerminalEvent::Key(KeyEvent::plain(KeyCode::Char(ch))), now);
        }
    }

    fn texts(screen: &mut Screen) -> Vec<String> {
        screen.frame(SIZE).lines.iter().map(line_text).collect()
    }

    #[test]
    fn poll_timeout_shrinks_to_pending_deadline() {
        let mut screen = screen(&["Canada"]);
        let start = Instant::now();
        assert_eq!(screen.poll_timeout(start), Duration::from_millis(120));

        type_text(&mut screen, "c", start);
        assert_eq!(screen.poll_timeout(start + Duration::from_millis(450)), Duration::from_millis(50));
    }

    #[test]
    fn select_by_click_then_submit() {
        let mut screen = screen(&["Canada", "Cuba"]);
        let start = Instant::now();

        type_text(&mut screen, "c", start);
        assert!(screen.tick(start + FILTER_DEBOUNCE));
        let lines = texts(&mut screen);
        let row = WIDGET_ROW as usize;
        assert_eq!(lines[row + 1], "  Canada");
        assert_eq!(lines[row + 2], "  Cuba");

        screen.dispatch(TerminalEvent::Pointer(PointerEvent::left(4, WIDGET_ROW + 2)), start);
        assert_eq!(screen.widget().value(), "Cuba");
        assert!(texts(&mut screen).iter().any(|line| line == "Selected: Cuba"));

        screen.dispatch(TerminalEvent::Key(KeyEvent::plain(KeyCode::Enter)), start);
        assert_eq!(screen.outcome(), Outcome::Submitted);
    }

    #[test]
    fn press_elsewhere_on_screen_dismisses_dropdown() {
        let mut screen = screen(&["Canada", "Cuba"]);
        let start = Instant::now();

        type_text(&mut screen, "cu", start);
        screen.tick(start + FILTER_DEBOUNCE);
        screen.frame(SIZE);
        assert!(screen.widget().controller().shows_dropdown());

        screen.dispatch(TerminalEvent::Pointer(PointerEvent::left(70, 20)), start);
        assert!(!screen.widget().controller().shows_dropdown());
        assert!(screen.widget().controller().results().is_empty());
    }

    #[test]
    fn escape_cancels_and_teardown_releases_listener() {
        let mut screen = screen(&["Canada"]);
        assert_eq!(screen.hub().listener_count(), 1);

        screen.dispatch(TerminalEvent::Key(KeyEvent::plain(KeyCode::Esc)), Instant::now());
        assert_eq!(screen.outcome(), Outcome::Cancelled);

        screen.teardown();
        assert_eq!(screen.hub().listener_count(), 0);
    }

    #[test]
    fn without_pointer_events_no_listener_is_installed() {
        let widget = Autocomplete::new("country", "Country", CandidateList::from(&["Canada"][..]));
        let mut screen = Screen::new("Countries", widget);
        screen.mount(false);
        assert_eq!(screen.hub().listener_count(), 0);

        type_text(&mut screen, "ca", Instant::now());
        let lines = texts(&mut screen);
        assert_eq!(lines[WIDGET_ROW as usize], "> Country: ca");
        assert_eq!(lines[WIDGET_ROW as usize + 1], "");
    }
}
