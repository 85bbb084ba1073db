use super::crossterm_io::key_to_u8;

use chip_8_vm::emulator::input::{Keypad, NUM_KEYS};
use crossterm::event::{poll, read, Event, KeyCode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Terminals report key presses but not releases. A key counts as held
/// until this long after its last press, auto-repeat included.
const HOLD_TIMEOUT: Duration = Duration::from_millis(250);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A struct for managing keypresses that will automatically
/// start a thread that feeds terminal key events to the keypad.
pub struct KeyManager {
    quit: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    event_listener: Option<JoinHandle<()>>,
}

impl KeyManager {
    // Start event listener thread
    pub fn new(keypad: Arc<Keypad>) -> KeyManager {
        let quit = Arc::new(AtomicBool::new(false));
        let stop = Arc::new(AtomicBool::new(false));
        let event_listener = event_listener(keypad, quit.clone(), stop.clone());
        KeyManager {
            quit,
            stop,
            event_listener: Some(event_listener),
        }
    }

    /// Whether the user asked to quit, or input can no longer be read.
    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        // Tell the event listener to stop, it notices within one poll interval
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.event_listener.take() {
            let _ = handle.join();
        }
    }
}

/// Starts a thread that listens for key events and presses and releases keypad keys.
fn event_listener(
    keypad: Arc<Keypad>,
    quit: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut held: [Option<Instant>; NUM_KEYS] = [None; NUM_KEYS];

        while !stop.load(Ordering::Acquire) {
            let event = match poll(POLL_INTERVAL) {
                Ok(true) => read().map(Some),
                Ok(false) => Ok(None),
                Err(error) => Err(error),
            };

            match event {
                Ok(Some(Event::Key(key_event))) => {
                    log::debug!("Got event {:?}", key_event);
                    if key_event.code == KeyCode::Esc {
                        quit.store(true, Ordering::Release);
                    } else if let Some(key) = key_to_u8(key_event.code) {
                        keypad.press(key);
                        held[key as usize] = Some(Instant::now());
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    log::error!("Could not read terminal events: {}", error);
                    quit.store(true, Ordering::Release);
                    break;
                }
            }

            for (key, pressed_at) in held.iter_mut().enumerate() {
                if pressed_at.map_or(false, |at| at.elapsed() >= HOLD_TIMEOUT) {
                    keypad.release(key as u8);
                    *pressed_at = None;
                }
            }
        }
    })
}
