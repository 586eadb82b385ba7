//! Key bindings. The same key can mean different things depending on the
//! phase, so the lookup takes both.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::{Command, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave immediately, whatever the phase (Ctrl-C).
    Quit,
    Command(Command),
}

pub fn map_key(key: KeyEvent, phase: Phase) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };

    let command = match (phase, code) {
        (Phase::StartMenu, KeyCode::Enter | KeyCode::Char(' ')) => Command::Start,

        (Phase::Running, KeyCode::Char('w' | ' ') | KeyCode::Up) => Command::Flap,
        (Phase::Running, KeyCode::Esc | KeyCode::Char('p')) => Command::Pause,

        (Phase::Paused, KeyCode::Esc | KeyCode::Char('p') | KeyCode::Enter) => Command::Resume,
        (Phase::Paused, KeyCode::Char('r')) => Command::Restart,
        (Phase::Paused, KeyCode::Char('q' | 'x')) => Command::Exit,

        (Phase::GameOver { .. }, KeyCode::Char('y') | KeyCode::Enter) => Command::Yes,
        (Phase::GameOver { .. }, KeyCode::Char('n' | 'q') | KeyCode::Esc) => Command::No,

        _ => return None,
    };
    Some(Action::Command(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    const OVER: Phase = Phase::GameOver {
        score: 1,
        high_score: 2,
    };

    fn cmd(c: Command) -> Option<Action> {
        Some(Action::Command(c))
    }

    #[test]
    fn flap_keys_only_while_running() {
        assert_eq!(map_key(press(KeyCode::Char('w')), Phase::Running), cmd(Command::Flap));
        assert_eq!(map_key(press(KeyCode::Char('W')), Phase::Running), cmd(Command::Flap));
        assert_eq!(map_key(press(KeyCode::Up), Phase::Running), cmd(Command::Flap));
        assert_eq!(map_key(press(KeyCode::Char('w')), Phase::Paused), None);
        assert_eq!(map_key(press(KeyCode::Char('w')), OVER), None);
    }

    #[test]
    fn escape_toggles_pause() {
        assert_eq!(map_key(press(KeyCode::Esc), Phase::Running), cmd(Command::Pause));
        assert_eq!(map_key(press(KeyCode::Esc), Phase::Paused), cmd(Command::Resume));
    }

    #[test]
    fn space_starts_from_menu() {
        assert_eq!(map_key(press(KeyCode::Char(' ')), Phase::StartMenu), cmd(Command::Start));
        assert_eq!(map_key(press(KeyCode::Esc), Phase::StartMenu), None);
    }

    #[test]
    fn pause_menu_buttons() {
        assert_eq!(map_key(press(KeyCode::Char('r')), Phase::Paused), cmd(Command::Restart));
        assert_eq!(map_key(press(KeyCode::Char('q')), Phase::Paused), cmd(Command::Exit));
        assert_eq!(map_key(press(KeyCode::Char('q')), Phase::Running), None);
    }

    #[test]
    fn play_again_prompt() {
        assert_eq!(map_key(press(KeyCode::Char('y')), OVER), cmd(Command::Yes));
        assert_eq!(map_key(press(KeyCode::Enter), OVER), cmd(Command::Yes));
        assert_eq!(map_key(press(KeyCode::Char('n')), OVER), cmd(Command::No));
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for phase in [Phase::StartMenu, Phase::Running, Phase::Paused, OVER] {
            assert_eq!(map_key(ctrl_c, phase), Some(Action::Quit));
        }
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = press(KeyCode::Char('w'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key, Phase::Running), None);
    }
}
