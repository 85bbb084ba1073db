/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

The machine runs as three independent activities: the emulator executing
instructions, a [`TimerClock`](emulator::TimerClock) counting the delay and
sound timers down at 60Hz, and whatever frontend presents the screen and
feeds it keys.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use implementation
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
The keypad is mapped onto the left side of the keyboard (`1234`, `qwer`, `asdf`, `zxcv`),
and `Esc` quits.

# Library

If you are not interested in handling input (key presses and such),
then you can use `Emulator::new()` to get an emulator to work with.

The main way of running a program is to load instructions as bytes.

```rust
use chip_8_vm::emulator::Emulator;

let mut emulator = Emulator::new();

// Load a program at address 0x200.
let clear_display = [0x00, 0xE0];
emulator.load(&clear_display)?;
emulator.step()?; // Will now clear the display
# Ok::<(), chip_8_vm::emulator::EmulatorError>(())
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip_8_vm::emulator::Emulator;
use chip_8_vm::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::new();

// Execute instructions manually
emulator.execute_single(Instruction::ClearScreen)?;

// Or many sequentially
emulator.execute_many(&[
    Instruction::Jump(Addr(0x250)),
    Instruction::SetConst(Reg(0xA), Const(35)),
    Instruction::Set(Reg(0xB), Reg(0xA)),
])?;
assert_eq!(emulator.registers().v[0xB], 35);
# Ok::<(), chip_8_vm::emulator::EmulatorError>(())
```

## Custom input and output

To get keypresses and show the screen, implement `EmulatorInput` and `EmulatorOutput`,
or use the thread-safe pieces that come with the crate: a shared
[`Keypad`](emulator::input::Keypad) for input, and
[`frame_channel`](emulator::output::frame_channel) for handing frames to a
rendering thread.

```no_run
use std::sync::Arc;
use std::time::Duration;
use chip_8_vm::emulator::{Emulator, TimerClock};
use chip_8_vm::emulator::input::Keypad;
use chip_8_vm::emulator::output::frame_channel;

let keypad = Arc::new(Keypad::new());
let (publisher, mut subscriber) = frame_channel();

let mut emulator = Emulator::with_io(keypad.clone(), publisher);
emulator.load(&std::fs::read("game.ch8").unwrap()).unwrap();
let _clock = TimerClock::start(emulator.timers());

std::thread::spawn(move || emulator.run(Duration::from_millis(2)));

loop {
    if let Some(frame) = subscriber.latest() {
        println!("{}", frame);
    }
    std::thread::sleep(Duration::from_millis(16));
}
```

You can then implement the emulator using your own custom frontend, as done with crossterm in crossterm_frontend.
*/

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod emulator;
pub mod util;
