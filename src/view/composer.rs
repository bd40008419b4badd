//! Key handling for the message composer.

/// A key press relevant to composing a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Enter, optionally with shift held.
    Enter {
        /// Whether shift was held.
        shift: bool,
    },
}

/// What the front-end should do after a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposerAction {
    /// The input changed (or not); keep composing.
    Edited,
    /// Plain Enter: submit the input.
    Submit,
}

/// Apply `key` to `input`.
///
/// Plain Enter requests submission without touching the input;
/// Shift+Enter inserts a newline.
pub fn handle_key(input: &mut String, key: Key) -> ComposerAction {
    match key {
        Key::Char(c) => input.push(c),
        Key::Enter { shift: true } => input.push('\n'),
        Key::Enter { shift: false } => return ComposerAction::Submit,
    }
    ComposerAction::Edited
}

/// Translate one line of terminal input into key presses.
///
/// A trailing `\` continues the message on the next line (Shift+Enter).
#[must_use]
pub fn keys_for_line(line: &str) -> Vec<Key> {
    let (body, shift) = line
        .strip_suffix('\\')
        .map_or((line, false), |rest| (rest, true));

    let mut keys: Vec<Key> = body.chars().map(Key::Char).collect();
    keys.push(Key::Enter { shift });
    keys
}
