use crate::pointer::PointerEvent;
use crate::terminal::{CursorPos, KeyEvent};
use crate::ui::span::SpanLine;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub focused: bool,
    pub width: u16,
}

#[derive(Debug, Clone, Default)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
}

pub trait Drawable {
    fn id(&self) -> &str;
    fn draw(&self, ctx: &RenderContext) -> DrawOutput;
}

/// Actions emitted by widgets in [`InteractionResult`]; they flow upward to
/// the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    ValueChanged { id: String, value: String },
    Selected { id: String, value: String },
}

#[derive(Debug, Clone, Default)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
    pub actions: Vec<WidgetAction>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(action: WidgetAction) -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: vec![action],
        }
    }
}

pub trait Interactive {
    fn on_key(&mut self, key: KeyEvent, now: Instant) -> InteractionResult;

    fn on_pointer(&mut self, _event: PointerEvent) -> InteractionResult {
        InteractionResult::ignored()
    }

    fn on_tick(&mut self, _now: Instant) -> InteractionResult {
        InteractionResult::ignored()
    }

    /// Earliest instant at which `on_tick` has work to do.
    fn next_deadline(&self) -> Option<Instant> {
        None
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        None
    }
}
