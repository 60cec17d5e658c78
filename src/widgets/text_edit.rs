pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

pub fn clamp_cursor(cursor: usize, value: &str) -> usize {
    cursor.min(char_count(value))
}

pub fn insert_char(value: &mut String, cursor: &mut usize, ch: char) {
    let pos = clamp_cursor(*cursor, value);
    let byte_pos = byte_index_at_char(value, pos);
    value.insert(byte_pos, ch);
    *cursor = pos + 1;
}

pub fn backspace_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos - 1);
    value.remove(byte_pos);
    *cursor = pos - 1;
    true
}

pub fn delete_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos);
    value.remove(byte_pos);
    *cursor = pos;
    true
}

pub fn move_left(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    *cursor = pos - 1;
    true
}

pub fn move_right(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        return false;
    }
    *cursor = pos + 1;
    true
}

pub fn delete_word_left(value: &mut String, cursor: &mut usize) -> bool {
    let mut chars: Vec<char> = value.chars().collect();
    let pos = (*cursor).min(chars.len());
    if pos == 0 {
        *cursor = 0;
        return false;
    }

    let mut start = pos;
    while start > 0 && chars[start - 1].is_whitespace() {
        start -= 1;
    }
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }

    chars.drain(start..pos);
    *value = chars.into_iter().collect();
    *cursor = start;
    true
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}
