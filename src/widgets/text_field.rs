use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::text_edit;
use unicode_width::UnicodeWidthChar;

/// Controlled single-line text input.
///
/// The field does not own the text: every call receives the current value,
/// and edits are reported through `on_change` as the new full string. Only
/// the cursor position lives here.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    cursor: usize,
    placeholder: String,
}

impl TextField {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            cursor: 0,
            placeholder: placeholder.into(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_to_end(&mut self, value: &str) {
        self.cursor = text_edit::char_count(value);
    }

    /// Applies `key` to `value`. Returns whether the key was handled; edits
    /// that change the text also invoke `on_change` with the new text.
    pub fn on_key<F>(&mut self, value: &str, key: KeyEvent, mut on_change: F) -> bool
    where
        F: FnMut(&str),
    {
        let mut next = value.to_string();
        let mut cursor = text_edit::clamp_cursor(self.cursor, value);

        let edited = match key.code {
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                text_edit::delete_word_left(&mut next, &mut cursor)
            }
            KeyCode::Char(ch)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                text_edit::insert_char(&mut next, &mut cursor, ch);
                true
            }
            KeyCode::Backspace if key.modifiers.contains(KeyModifiers::CONTROL) => {
                text_edit::delete_word_left(&mut next, &mut cursor)
            }
            KeyCode::Backspace => text_edit::backspace_char(&mut next, &mut cursor),
            KeyCode::Delete => text_edit::delete_char(&mut next, &mut cursor),
            KeyCode::Left => {
                let moved = text_edit::move_left(&mut cursor, value);
                self.cursor = cursor;
                return moved;
            }
            KeyCode::Right => {
                let moved = text_edit::move_right(&mut cursor, value);
                self.cursor = cursor;
                return moved;
            }
            KeyCode::Home => {
                self.cursor = 0;
                return true;
            }
            KeyCode::End => {
                self.move_to_end(value);
                return true;
            }
            _ => return false,
        };

        self.cursor = cursor;
        if edited {
            on_change(&next);
        }
        edited
    }

    pub fn spans(&self, value: &str) -> Vec<Span> {
        if value.is_empty() {
            return vec![Span::styled(
                self.placeholder.clone(),
                Style::new().color(Color::DarkGrey),
            )];
        }
        vec![Span::new(value)]
    }

    /// Display columns between the start of the value and the cursor.
    pub fn cursor_offset(&self, value: &str) -> usize {
        value
            .chars()
            .take(text_edit::clamp_cursor(self.cursor, value))
            .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::TextField;
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
    use crate::ui::style::Color;

    fn type_text(field: &mut TextField, value: &mut String, text: &str) -> Vec<String> {
        let mut reported = Vec::new();
        for ch in text.chars() {
            let current = value.clone();
            field.on_key(&current, KeyEvent::plain(KeyCode::Char(ch)), |next| {
                reported.push(next.to_string());
                *value = next.to_string();
            });
        }
        reported
    }

    #[test]
    fn reports_full_value_on_every_keystroke() {
        let mut field = TextField::new("Search");
        let mut value = String::new();
        let reported = type_text(&mut field, &mut value, "cub");
        assert_eq!(reported, vec!["c", "cu", "cub"]);
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn cursor_moves_without_reporting_changes() {
        let mut field = TextField::new("");
        let mut changes = 0;
        field.move_to_end("Cuba");
        assert!(field.on_key("Cuba", KeyEvent::plain(KeyCode::Left), |_| changes += 1));
        assert!(field.on_key("Cuba", KeyEvent::plain(KeyCode::Home), |_| changes += 1));
        assert!(!field.on_key("Cuba", KeyEvent::plain(KeyCode::Left), |_| changes += 1));
        assert_eq!(changes, 0);
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn backspace_on_empty_value_is_not_a_change() {
        let mut field = TextField::new("");
        let mut changes = 0;
        assert!(!field.on_key("", KeyEvent::plain(KeyCode::Backspace), |_| changes += 1));
        assert_eq!(changes, 0);
    }

    #[test]
    fn control_chars_are_not_inserted() {
        let mut field = TextField::new("");
        let mut seen = Vec::new();
        let ctrl_c = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        };
        assert!(!field.on_key("ab", ctrl_c, |next| seen.push(next.to_string())));

        field.move_to_end("ab cd");
        let ctrl_w = KeyEvent {
            code: KeyCode::Char('w'),
            modifiers: KeyModifiers::CONTROL,
        };
        assert!(field.on_key("ab cd", ctrl_w, |next| seen.push(next.to_string())));
        assert_eq!(seen, vec!["ab "]);
    }

    #[test]
    fn empty_value_shows_placeholder() {
        let field = TextField::new("Type to search...");
        let spans = field.spans("");
        assert_eq!(spans[0].text, "Type to search...");
        assert_eq!(spans[0].style.color, Some(Color::DarkGrey));
        assert_eq!(field.spans("Cu")[0].text, "Cu");
    }

    #[test]
    fn cursor_offset_uses_display_width() {
        let mut field = TextField::new("");
        field.move_to_end("日本");
        assert_eq!(field.cursor_offset("日本"), 4);
    }
}
