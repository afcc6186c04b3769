//! Keyboard mapping and scripted input.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tuner_core::RemoteKey;

/// What the playground should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Remote(RemoteKey),
    /// Let time pass without input.
    Wait(Duration),
    Quit,
}

/// Map a terminal key press onto a remote key.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    let remote = match key.code {
        KeyCode::Up => RemoteKey::Up,
        KeyCode::Down => RemoteKey::Down,
        KeyCode::Left => RemoteKey::Left,
        KeyCode::Right => RemoteKey::Right,
        KeyCode::PageUp | KeyCode::Char('+') => RemoteKey::ChannelUp,
        KeyCode::PageDown | KeyCode::Char('-') => RemoteKey::ChannelDown,
        KeyCode::Enter => RemoteKey::Select,
        KeyCode::Esc | KeyCode::Backspace => RemoteKey::Back,
        KeyCode::Char('q') => return Some(Action::Quit),
        _ => return None,
    };
    Some(Action::Remote(remote))
}

/// Parse a line-oriented script:
///   up|down|left|right|ch+|ch-|select|back|wait:<ms>|quit
/// Lines beginning with # are ignored. Blank lines are skipped.
pub fn parse_script(contents: &str) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    for (idx, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let action = match line {
            "up" => Action::Remote(RemoteKey::Up),
            "down" => Action::Remote(RemoteKey::Down),
            "left" => Action::Remote(RemoteKey::Left),
            "right" => Action::Remote(RemoteKey::Right),
            "ch+" | "chup" => Action::Remote(RemoteKey::ChannelUp),
            "ch-" | "chdown" => Action::Remote(RemoteKey::ChannelDown),
            "select" | "enter" => Action::Remote(RemoteKey::Select),
            "back" | "esc" => Action::Remote(RemoteKey::Back),
            "q" | "quit" => Action::Quit,
            _ => {
                let Some(ms) = line.strip_prefix("wait:") else {
                    return Err(anyhow!(
                        "unrecognized script token at line {}: {}",
                        idx + 1,
                        line
                    ));
                };
                let ms: u64 = ms.trim().parse().with_context(|| {
                    format!("invalid wait duration at line {}", idx + 1)
                })?;
                Action::Wait(Duration::from_millis(ms))
            }
        };
        actions.push(action);
    }
    Ok(actions)
}

/// Parse a key script, one action per line.
pub fn load_script(path: &Path) -> Result<Vec<Action>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read playground script {}", path.display()))?;
    parse_script(&contents)
}
