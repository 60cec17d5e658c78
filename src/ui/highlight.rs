use crate::core::matcher::Highlight;
use crate::ui::span::Span;
use crate::ui::style::Style;

/// Turns a highlighted candidate into spans, skipping empty parts.
pub fn highlight_spans(parts: &Highlight<'_>, base_style: Style, match_style: Style) -> Vec<Span> {
    let mut spans = Vec::with_capacity(3);
    if !parts.prefix.is_empty() {
        spans.push(Span::styled(parts.prefix, base_style));
    }
    if parts.has_match() {
        spans.push(Span::styled(parts.matched, base_style.merge(match_style)));
    }
    if !parts.suffix.is_empty() {
        spans.push(Span::styled(parts.suffix, base_style));
    }
    if spans.is_empty() {
        spans.push(Span::styled(String::new(), base_style));
    }
    spans
}
