use crate::terminal::CursorPos;
use crate::ui::span::SpanLine;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    pub cursor: Option<CursorPos>,
}
