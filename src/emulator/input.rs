use std::sync::{Arc, Condvar, Mutex, MutexGuard};

pub const NUM_KEYS: usize = 16;

/// Represents an input device that is capable of providing keys in the range 0..0xF.
pub trait EmulatorInput {
    /// Whether `key` is currently held down.
    fn is_pressed(&self, key: u8) -> bool;

    /// Block until a key is pressed, then return it.
    fn wait_for_key(&self) -> u8;
}

/// An input device that never provides any input
pub struct DummyInput;

impl EmulatorInput for DummyInput {
    fn is_pressed(&self, _: u8) -> bool {
        false
    }
    fn wait_for_key(&self) -> u8 {
        0
    }
}

#[derive(Default)]
struct KeyState {
    pressed: [bool; NUM_KEYS],
    // Counts key down transitions, so a waiter can tell a new press
    // from one that happened before it started waiting.
    presses: u64,
    last_pressed: u8,
    waiting: usize,
}

/// The 16-key keypad, shared between a frontend feeding it key events
/// and the emulator reading it.
///
/// Waiting for a key parks the calling thread on a condition variable
/// until `press` reports a new key down, so nothing spins while a
/// program waits for input.
#[derive(Default)]
pub struct Keypad {
    state: Mutex<KeyState>,
    condvar: Condvar,
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    fn lock(&self) -> MutexGuard<'_, KeyState> {
        // The state is plain data that stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark `key` as held down. Only the transition from released to
    /// pressed wakes up a waiting emulator.
    pub fn press(&self, key: u8) {
        let key = key & 0x0F;
        let mut state = self.lock();
        if !state.pressed[key as usize] {
            state.pressed[key as usize] = true;
            state.presses += 1;
            state.last_pressed = key;
            log::debug!("Key {:X} pressed", key);
            self.condvar.notify_all();
        }
    }

    pub fn release(&self, key: u8) {
        let key = key & 0x0F;
        self.lock().pressed[key as usize] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.lock().pressed[(key & 0x0F) as usize]
    }

    /// Whether some thread is blocked in `wait_for_key`.
    pub fn is_waiting(&self) -> bool {
        self.lock().waiting > 0
    }

    /// Block until a key is pressed after this call started, and return it.
    pub fn wait_for_key(&self) -> u8 {
        let mut state = self.lock();
        let seen = state.presses;
        state.waiting += 1;
        while state.presses == seen {
            state = self
                .condvar
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        state.waiting -= 1;
        state.last_pressed
    }
}

impl EmulatorInput for Arc<Keypad> {
    fn is_pressed(&self, key: u8) -> bool {
        Keypad::is_pressed(self, key)
    }
    fn wait_for_key(&self) -> u8 {
        Keypad::wait_for_key(self)
    }
}
