use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Exact comparison of a keystroke against the expected character.
pub fn judge(expected: char, typed: char) -> Outcome {
    if typed == expected {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    }
}

/// The character a key event types, if any.
///
/// Modifier keys, backspace, navigation and function keys as well as chords
/// with Control or Alt never reach the judge.
pub fn typed_char(key: &KeyEvent) -> Option<char> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }

    match key.code {
        KeyCode::Char(c) if !c.is_control() => Some(c),
        KeyCode::Enter => Some('\n'),
        KeyCode::Tab => Some('\t'),
        _ => None,
    }
}
