//! Keyboard and mouse mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use pathviz_search::AlgorithmId;

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start, resume or pause depending on the replay state.
    ToggleRun,
    Step,
    FastForward,
    JumpToEnd,
    Reset,
    Clear,
    GenerateWalls,
    Select(AlgorithmId),
    Faster,
    Slower,
    DenserWalls,
    SparserWalls,
    /// Move the edit cursor by (rows, cols).
    Cursor(i32, i32),
    ToggleWall,
    PlaceStart,
    PlaceEnd,
    Quit,
}

/// Map a key event to an action. Releases and unbound keys map to `None`.
pub fn action_for(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Char(' ') => Action::ToggleRun,
        KeyCode::Char('n') => Action::Step,
        KeyCode::Char('f') => Action::FastForward,
        KeyCode::Char('e') => Action::JumpToEnd,
        KeyCode::Char('r') => Action::Reset,
        KeyCode::Char('c') => Action::Clear,
        KeyCode::Char('g') => Action::GenerateWalls,
        KeyCode::Char(d @ '1'..='6') => {
            let i = d as usize - '1' as usize;
            Action::Select(AlgorithmId::ALL[i])
        }
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Faster,
        KeyCode::Char('-') => Action::Slower,
        KeyCode::Char(']') => Action::DenserWalls,
        KeyCode::Char('[') => Action::SparserWalls,
        KeyCode::Up | KeyCode::Char('k') => Action::Cursor(-1, 0),
        KeyCode::Down | KeyCode::Char('j') => Action::Cursor(1, 0),
        KeyCode::Left | KeyCode::Char('h') => Action::Cursor(0, -1),
        KeyCode::Right | KeyCode::Char('l') => Action::Cursor(0, 1),
        KeyCode::Char('w') | KeyCode::Enter => Action::ToggleWall,
        KeyCode::Char('s') => Action::PlaceStart,
        KeyCode::Char('t') => Action::PlaceEnd,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Mouse gestures on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Press,
    Drag,
    Release,
}

/// Map a mouse event kind to a gesture. Only the left button edits.
pub fn gesture_for(kind: MouseEventKind) -> Option<Gesture> {
    match kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Gesture::Press),
        MouseEventKind::Drag(MouseButton::Left) => Some(Gesture::Drag),
        MouseEventKind::Up(MouseButton::Left) => Some(Gesture::Release),
        _ => None,
    }
}

/// One-line reminder of the bindings.
pub const HELP: &str = "space run/pause  n step  f fast  e end  r reset  c clear  g walls  \
                        1-6 algorithm  +/- speed  [/] density  arrows+w/s/t edit  q quit";
