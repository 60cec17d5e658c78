use crate::ui::span::Span;
use crate::ui::style::{Color, Style};

const BRAILLE: &[char] = &['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

/// Frame counter for the loading row. Advanced by the runtime tick.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % BRAILLE.len();
    }

    pub fn glyph(&self) -> char {
        BRAILLE[self.frame % BRAILLE.len()]
    }

    pub fn span(&self) -> Span {
        Span::styled(self.glyph().to_string(), Style::new().color(Color::Cyan))
    }
}
