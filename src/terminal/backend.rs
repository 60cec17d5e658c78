use crate::pointer::{PointerButton, PointerEvent};
use crate::terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers, TerminalEvent, TerminalSize};
use crate::ui::frame::RenderFrame;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::event::{MouseButton, MouseEventKind};
use crossterm::style::{self as ct, Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tracing::trace;
use unicode_width::UnicodeWidthChar;

/// Crossterm backend running the prompt on the alternate screen.
///
/// The last rendered frame is replayed onto the main screen on exit so the
/// final answer stays visible in the scrollback.
pub struct Terminal {
    out: Stdout,
    size: TerminalSize,
    mouse: bool,
    replay: Vec<SpanLine>,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            out: io::stdout(),
            size: TerminalSize { width, height },
            mouse: false,
            replay: Vec::new(),
        })
    }

    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            terminal::DisableLineWrap,
            Hide
        )
    }

    /// Starts reporting mouse presses. The caller decides what to do when the
    /// terminal refuses.
    pub fn enable_pointer_capture(&mut self) -> io::Result<()> {
        execute!(self.out, EnableMouseCapture)?;
        self.mouse = true;
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        if std::mem::take(&mut self.mouse) {
            execute!(self.out, DisableMouseCapture)?;
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            terminal::EnableLineWrap,
            Show
        )?;

        let width = self.size.width;
        for line in std::mem::take(&mut self.replay) {
            self.print_line(&line, width)?;
            self.out.write_all(b"\r\n")?;
        }
        self.out.flush()
    }

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    pub fn set_size(&mut self, size: TerminalSize) {
        self.size = size;
    }

    /// Waits up to `timeout` for input. A quiet period comes back as
    /// [`TerminalEvent::Tick`], as do events the prompt does not consume.
    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<TerminalEvent> {
        if !event::poll(timeout)? {
            return Ok(TerminalEvent::Tick);
        }
        let translated = match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => TerminalEvent::Key(key.into()),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(button) => TerminalEvent::Pointer(PointerEvent::new(
                    mouse.column,
                    mouse.row,
                    pointer_button(button),
                )),
                _ => TerminalEvent::Tick,
            },
            Event::Resize(width, height) => TerminalEvent::Resize(TerminalSize { width, height }),
            other => {
                trace!(?other, "terminal event ignored");
                TerminalEvent::Tick
            }
        };
        Ok(translated)
    }

    pub fn render(&mut self, frame: &RenderFrame) -> io::Result<()> {
        let TerminalSize { width, height } = self.size;
        if width == 0 || height == 0 {
            return Ok(());
        }

        queue!(
            self.out,
            terminal::BeginSynchronizedUpdate,
            MoveTo(0, 0),
            Clear(ClearType::All)
        )?;
        for (row, line) in (0..height).zip(&frame.lines) {
            queue!(self.out, MoveTo(0, row))?;
            self.print_line(line, width)?;
        }

        match frame.cursor {
            Some(CursorPos { col, row }) if row < height => {
                queue!(self.out, MoveTo(col.min(width - 1), row), Show)?;
            }
            _ => queue!(self.out, Hide)?,
        }
        queue!(self.out, terminal::EndSynchronizedUpdate)?;
        self.replay.clone_from(&frame.lines);

        self.out.flush()
    }

    /// Prints `line` clipped to one column short of `width`, so the cursor
    /// never wraps onto the next row.
    fn print_line(&mut self, line: &SpanLine, width: u16) -> io::Result<()> {
        let mut budget = usize::from(width.saturating_sub(1).max(1));
        for span in line {
            if budget == 0 {
                break;
            }
            let (visible, used) = fit(span, budget);
            if visible.is_empty() {
                continue;
            }
            self.apply_style(span.style)?;
            queue!(self.out, Print(visible), ct::ResetColor)?;
            if span.style.bold {
                queue!(self.out, SetAttribute(Attribute::NormalIntensity))?;
            }
            budget -= used;
        }
        Ok(())
    }

    fn apply_style(&mut self, style: Style) -> io::Result<()> {
        if let Some(color) = style.color {
            queue!(self.out, ct::SetForegroundColor(color.into()))?;
        }
        if let Some(color) = style.background {
            queue!(self.out, ct::SetBackgroundColor(color.into()))?;
        }
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        Ok(())
    }
}

/// Longest prefix of the span's text that fits in `budget` columns, without
/// line breaks, and the columns it takes.
fn fit(span: &Span, budget: usize) -> (String, usize) {
    let mut used = 0;
    let mut visible = String::new();
    for ch in span.text.chars().filter(|ch| *ch != '\n' && *ch != '\r') {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        visible.push(ch);
    }
    (visible, used)
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Left,
        MouseButton::Right => PointerButton::Right,
        MouseButton::Middle => PointerButton::Middle,
    }
}

impl From<Color> for ct::Color {
    fn from(color: Color) -> Self {
        match color {
            Color::DarkGrey => ct::Color::DarkGrey,
            Color::Green => ct::Color::Green,
            Color::Cyan => ct::Color::DarkCyan,
        }
    }
}

impl From<event::KeyCode> for KeyCode {
    fn from(code: event::KeyCode) -> Self {
        use event::KeyCode as Raw;
        match code {
            Raw::Char(ch) => Self::Char(ch),
            Raw::Enter => Self::Enter,
            Raw::Esc => Self::Esc,
            Raw::Backspace => Self::Backspace,
            Raw::Delete => Self::Delete,
            Raw::Home => Self::Home,
            Raw::End => Self::End,
            Raw::Left => Self::Left,
            Raw::Right => Self::Right,
            _ => Self::Other,
        }
    }
}

impl From<event::KeyModifiers> for KeyModifiers {
    fn from(raw: event::KeyModifiers) -> Self {
        [
            (event::KeyModifiers::SHIFT, KeyModifiers::SHIFT),
            (event::KeyModifiers::CONTROL, KeyModifiers::CONTROL),
            (event::KeyModifiers::ALT, KeyModifiers::ALT),
        ]
        .into_iter()
        .filter(|(flag, _)| raw.contains(*flag))
        .fold(KeyModifiers::NONE, |acc, (_, ours)| acc.union(ours))
    }
}

impl From<event::KeyEvent> for KeyEvent {
    fn from(key: event::KeyEvent) -> Self {
        Self {
            code: key.code.into(),
            modifiers: key.modifiers.into(),
        }
    }
}
