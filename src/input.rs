//! Input handling.
//!
//! Terminal events are read on a dedicated thread and reduced to
//! [`Intent`]s, which are sent to the loop driver over a channel. The input
//! thread never touches game state.

use crate::core::constants::INPUT_POLL_MS;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Space, Up, or any mouse button press.
    Jump,
    /// Esc, q or Ctrl+C. Stops the loop driver.
    Quit,
}

/// Map a key press to an intent.
pub fn map_key(key: KeyEvent) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Up => Some(Intent::Jump),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Intent::Quit),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Intent::Quit),
        _ => None,
    }
}

/// Map any terminal event to an intent. Mouse presses stand in for
/// pointer and touch input.
pub fn map_event(event: &Event) -> Option<Intent> {
    match event {
        Event::Key(key) => map_key(*key),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(_),
            ..
        }) => Some(Intent::Jump),
        _ => None,
    }
}

/// Reads crossterm's global event queue, waiting at most `timeout`.
pub fn read_terminal_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Background thread turning events into intents until stopped.
pub struct InputHandler {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputHandler {
    /// Listen to the terminal.
    pub fn spawn(sender: Sender<Intent>, stop: Arc<AtomicBool>) -> Self {
        Self::spawn_with(read_terminal_event, sender, stop)
    }

    /// Listen to an arbitrary event source. `source` is polled with a short
    /// timeout so the stop flag is checked regularly.
    pub fn spawn_with<F>(mut source: F, sender: Sender<Intent>, stop: Arc<AtomicBool>) -> Self
    where
        F: FnMut(Duration) -> io::Result<Option<Event>> + Send + 'static,
    {
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let timeout = Duration::from_millis(INPUT_POLL_MS);
            while !thread_stop.load(Ordering::SeqCst) {
                match source(timeout) {
                    Ok(Some(event)) => {
                        let Some(intent) = map_event(&event) else {
                            continue;
                        };
                        if sender.send(intent).is_err() {
                            // Loop driver is gone
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::warn!("input thread stopping: {}", e);
                        break;
                    }
                }
            }
            log::debug!("input thread exited");
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop listening and wait for the thread to finish.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("input thread panicked");
            }
        }
    }
}

impl Drop for InputHandler {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton};
    use std::collections::VecDeque;
    use std::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_jump_keys() {
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(Intent::Jump));
        assert_eq!(map_key(key(KeyCode::Up)), Some(Intent::Jump));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Intent::Quit));
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(Intent::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Intent::Quit)
        );
        assert_eq!(map_key(key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(map_key(key(KeyCode::Enter)), None);
        assert_eq!(map_key(key(KeyCode::Down)), None);
        assert_eq!(map_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), None);
    }

    #[test]
    fn test_mouse_press_is_jump() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(Intent::Jump)
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Right))),
            Some(Intent::Jump)
        );
        assert_eq!(map_event(&mouse(MouseEventKind::Up(MouseButton::Left))), None);
        assert_eq!(map_event(&mouse(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_resize_ignored() {
        assert_eq!(map_event(&Event::Resize(80, 24)), None);
    }

    #[test]
    fn test_handler_forwards_intents_in_order() {
        let mut script: VecDeque<Event> = VecDeque::from(vec![
            Event::Key(key(KeyCode::Char(' '))),
            Event::Key(key(KeyCode::Char('x'))),
            mouse(MouseEventKind::Down(MouseButton::Left)),
            Event::Key(key(KeyCode::Esc)),
        ]);
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let handler = InputHandler::spawn_with(
            move |_| Ok(script.pop_front()),
            tx,
            Arc::clone(&stop),
        );

        let received: Vec<Intent> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(2)).unwrap())
            .collect();
        handler.shutdown();

        assert_eq!(received, vec![Intent::Jump, Intent::Jump, Intent::Quit]);
        assert!(stop.load(Ordering::SeqCst));
    }

    #[test]
    fn test_handler_stops_on_source_error() {
        let (tx, rx) = mpsc::channel::<Intent>();
        let stop = Arc::new(AtomicBool::new(false));
        let handler = InputHandler::spawn_with(
            |_| Err(io::Error::new(io::ErrorKind::Other, "tty gone")),
            tx,
            stop,
        );
        // Sender dropped with the thread: channel disconnects
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_err());
        drop(handler);
    }
}
