use super::framebuffer::Framebuffer;
use std::sync::{Arc, Mutex, MutexGuard};

/// Represents a screen the emulator can show frames on.
///
/// The emulator calls `present` after every draw or clear with the frame as
/// it now looks. Implementations get a reference to an immutable frame and
/// copy whatever they need out of it.
pub trait EmulatorOutput {
    fn present(&mut self, frame: &Framebuffer);
}

/// A simple output device that remembers the last frame it was given.
#[derive(Default)]
pub struct DummyOutput {
    last_frame: Framebuffer,
    frames: usize,
}

impl DummyOutput {
    pub fn new() -> DummyOutput {
        DummyOutput::default()
    }

    pub fn last_frame(&self) -> &Framebuffer {
        &self.last_frame
    }

    /// How many frames have been presented.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl EmulatorOutput for DummyOutput {
    fn present(&mut self, frame: &Framebuffer) {
        self.last_frame = *frame;
        self.frames += 1;
    }
}

#[derive(Default)]
struct Published {
    frame: Framebuffer,
    generation: u64,
}

fn lock(slot: &Mutex<Published>) -> MutexGuard<'_, Published> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Create a connected publisher and subscriber for handing frames
/// from the emulator thread to a presentation thread.
///
/// Only the latest frame is kept. Publishing overwrites it and never waits
/// for the subscriber, and the subscriber picks up at most one frame per
/// poll, so a slow screen simply skips frames.
pub fn frame_channel() -> (FramePublisher, FrameSubscriber) {
    let slot = Arc::new(Mutex::new(Published::default()));
    (
        FramePublisher { slot: slot.clone() },
        FrameSubscriber { slot, seen: 0 },
    )
}

/// The emulator side of `frame_channel`.
pub struct FramePublisher {
    slot: Arc<Mutex<Published>>,
}

impl EmulatorOutput for FramePublisher {
    fn present(&mut self, frame: &Framebuffer) {
        let mut published = lock(&self.slot);
        published.frame = *frame;
        published.generation += 1;
    }
}

/// The presentation side of `frame_channel`.
pub struct FrameSubscriber {
    slot: Arc<Mutex<Published>>,
    seen: u64,
}

impl FrameSubscriber {
    /// The newest frame, if one has been published since the last call.
    pub fn latest(&mut self) -> Option<Framebuffer> {
        let published = lock(&self.slot);
        if published.generation == self.seen {
            return None;
        }
        self.seen = published.generation;
        Some(published.frame)
    }

    /// The newest frame, whether or not it has been seen before.
    pub fn current(&self) -> Framebuffer {
        lock(&self.slot).frame
    }
}
