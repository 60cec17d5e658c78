use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};

pub const NO_MATCHES: &str = "No matches";

/// Borrowed list view over the current suggestions.
///
/// Rows alternate between the plain style and a shaded one. The caller
/// decides what a row looks like through the `render_item` callback and
/// learns about clicks through `click`.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionList<'a> {
    items: &'a [String],
    max_visible: usize,
}

impl<'a> SuggestionList<'a> {
    pub fn new(items: &'a [String]) -> Self {
        Self {
            items,
            max_visible: usize::MAX,
        }
    }

    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible.max(1);
        self
    }

    pub fn visible_items(&self) -> &'a [String] {
        let len = self.items.len().min(self.max_visible);
        &self.items[..len]
    }

    /// Number of lines `draw` produces.
    pub fn height(&self) -> usize {
        self.visible_items().len().max(1)
    }

    pub fn row_style(index: usize) -> Style {
        if index % 2 == 0 {
            Style::default()
        } else {
            Style::new().background(Color::DarkGrey)
        }
    }

    pub fn draw<R>(&self, mut render_item: R) -> Vec<SpanLine>
    where
        R: FnMut(&str, Style) -> Vec<Span>,
    {
        let visible = self.visible_items();
        if visible.is_empty() {
            return vec![vec![Span::styled(
                format!("  {NO_MATCHES}"),
                Style::new().color(Color::DarkGrey),
            )]];
        }

        visible
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let style = Self::row_style(index);
                let mut line = vec![Span::styled("  ", style)];
                line.extend(render_item(item.as_str(), style));
                line
            })
            .collect()
    }

    /// Dispatches a click on list row `row` (0 = first drawn line). Returns
    /// whether an item was hit.
    pub fn click<F>(&self, row: usize, on_item_click: F) -> bool
    where
        F: FnOnce(&'a str),
    {
        match self.visible_items().get(row) {
            Some(item) => {
                on_item_click(item.as_str());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NO_MATCHES, SuggestionList};
    use crate::ui::span::{Span, line_text};
    use crate::ui::style::Color;

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_list_renders_no_matches_message() {
        let list = SuggestionList::new(&[]);
        let lines = list.draw(|item, style| vec![Span::styled(item, style)]);
        assert_eq!(lines.len(), 1);
        assert!(line_text(&lines[0]).contains(NO_MATCHES));
        assert_eq!(list.height(), 1);
    }

    #[test]
    fn rows_alternate_background() {
        let values = items(&["Canada", "Cuba", "Chile"]);
        let lines = SuggestionList::new(&values).draw(|item, style| vec![Span::styled(item, style)]);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0][1].style.background, None);
        assert_eq!(lines[1][1].style.background, Some(Color::DarkGrey));
        assert_eq!(lines[2][1].style.background, None);
        assert_eq!(line_text(&lines[1]), "  Cuba");
    }

    #[test]
    fn max_visible_limits_rows_and_clicks() {
        let values = items(&["a", "b", "c", "d"]);
        let list = SuggestionList::new(&values).with_max_visible(2);
        assert_eq!(list.height(), 2);

        let mut clicked = None;
        assert!(list.click(1, |item| clicked = Some(item.to_string())));
        assert_eq!(clicked.as_deref(), Some("b"));
        assert!(!list.click(2, |_| unreachable!()));
    }
}
