pub mod frame;
pub mod highlight;
pub mod span;
pub mod spinner;
pub mod style;

pub use frame::RenderFrame;
pub use span::{Span, SpanLine};
pub use style::{Color, Style};
