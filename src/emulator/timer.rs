//! The delay and sound timers, and the 60Hz clock counting them down.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const TIMER_HZ: u32 = 60;

/// The two countdown registers.
///
/// They are shared between the emulator, which reads and sets them, and the
/// timer clock, which counts them down. Each is a single byte, so atomics
/// are all the synchronization they need.
#[derive(Debug, Default)]
pub struct Timers {
    delay: AtomicU8,
    sound: AtomicU8,
}

impl Timers {
    pub fn new() -> Timers {
        Timers::default()
    }

    pub fn delay(&self) -> u8 {
        self.delay.load(Ordering::Acquire)
    }

    pub fn set_delay(&self, value: u8) {
        self.delay.store(value, Ordering::Release);
    }

    pub fn sound(&self) -> u8 {
        self.sound.load(Ordering::Acquire)
    }

    pub fn set_sound(&self, value: u8) {
        self.sound.store(value, Ordering::Release);
    }

    /// Whether the buzzer should be sounding.
    pub fn sound_active(&self) -> bool {
        self.sound() > 0
    }

    /// Count both timers down by one, stopping at zero.
    pub fn tick(&self) {
        decrement(&self.delay);
        decrement(&self.sound);
    }
}

fn decrement(timer: &AtomicU8) {
    // Err only means the timer was already at zero.
    let _ = timer.fetch_update(Ordering::AcqRel, Ordering::Acquire, |value| value.checked_sub(1));
}

/// A thread ticking a set of `Timers` at 60Hz until it is dropped.
pub struct TimerClock {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TimerClock {
    pub fn start(timers: Arc<Timers>) -> TimerClock {
        TimerClock::with_period(timers, Duration::from_secs(1) / TIMER_HZ)
    }

    /// Tick at a custom period. Ticks are scheduled against fixed deadlines,
    /// so a late wakeup shortens the next sleep instead of shifting every
    /// later tick. After a stall longer than a period the schedule restarts
    /// from the current time rather than replaying the missed ticks.
    pub fn with_period(timers: Arc<Timers>, period: Duration) -> TimerClock {
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let stop = stop.clone();
            thread::spawn(move || {
                log::debug!("Timer clock started with period {:?}", period);
                let mut deadline = Instant::now() + period;
                while !stop.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if deadline > now {
                        thread::sleep(deadline - now);
                    }
                    timers.tick();
                    deadline = next_deadline(deadline, Instant::now(), period);
                }
                log::debug!("Timer clock stopped");
            })
        };

        TimerClock {
            stop,
            handle: Some(handle),
        }
    }
}

fn next_deadline(deadline: Instant, now: Instant, period: Duration) -> Instant {
    let next = deadline + period;
    if now > next {
        now + period
    } else {
        next
    }
}

impl Drop for TimerClock {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Timer clock thread panicked");
            }
        }
    }
}
