use std::io;
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error};

use crate::error::Error;
use crate::snake::Direction::{self, *};

/// Out-of-band events for the driver loop.
#[derive(Debug)]
pub enum Signal {
    Interrupt,
    InputFailed(Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Turn(Direction),
    Interrupt,
}

pub fn decode_key(ev: &KeyEvent) -> Option<Key> {
    if is_ctrl_c(ev) {
        return Some(Key::Interrupt);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Key::Turn(North)),
        KeyCode::Char('a') | KeyCode::Left => Some(Key::Turn(West)),
        KeyCode::Char('s') | KeyCode::Down => Some(Key::Turn(South)),
        KeyCode::Char('d') | KeyCode::Right => Some(Key::Turn(East)),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(
        ev,
        KeyEvent { code: KeyCode::Char('c'), modifiers, .. }
            if modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// Blocks on the keyboard for the rest of the process. Headings overwrite
/// the single slot in `heading`; Ctrl+C and read failures go to `signals`.
/// The thread is never joined.
pub fn spawn_listener(
    heading: watch::Sender<Option<Direction>>,
    signals: mpsc::UnboundedSender<Signal>,
) -> io::Result<()> {
    thread::Builder::new().name("input".into()).spawn(move || loop {
        let ev = match event::read() {
            Ok(ev) => ev,
            Err(e) => {
                error!("reading input failed: {}", e);
                let _ = signals.send(Signal::InputFailed(Error::Input(e)));
                return;
            }
        };

        let Event::Key(key) = ev else { continue };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        match decode_key(&key) {
            Some(Key::Turn(dir)) => {
                debug!("key press: {:?}", dir);
                if heading.send(Some(dir)).is_err() {
                    return;
                }
            }
            Some(Key::Interrupt) => {
                if signals.send(Signal::Interrupt).is_err() {
                    return;
                }
            }
            None => {}
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn arrows_and_wasd_map_to_headings() {
        let cases = [
            (KeyCode::Up, North),
            (KeyCode::Down, South),
            (KeyCode::Left, West),
            (KeyCode::Right, East),
            (KeyCode::Char('w'), North),
            (KeyCode::Char('s'), South),
            (KeyCode::Char('a'), West),
            (KeyCode::Char('d'), East),
        ];

        for (code, dir) in cases {
            assert_eq!(decode_key(&key(code, KeyModifiers::NONE)), Some(Key::Turn(dir)));
        }
    }

    #[test]
    fn ctrl_c_interrupts() {
        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(decode_key(&ctrl_c), Some(Key::Interrupt));
        assert_eq!(decode_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(decode_key(&key(KeyCode::Esc, KeyModifiers::NONE)), None);
    }
}
