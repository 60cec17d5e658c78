#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    DarkGrey,
    Green,
    Cyan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub color: Option<Color>,
    pub background: Option<Color>,
    pub bold: bool,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Overlays `other` on top of `self`; set fields in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            color: other.color.or(self.color),
            background: other.background.or(self.background),
            bold: self.bold || other.bold,
        }
    }
}
