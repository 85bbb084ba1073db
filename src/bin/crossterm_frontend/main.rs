use std::error::Error;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use structopt::StructOpt;

use chip_8_vm::emulator::input::Keypad;
use chip_8_vm::emulator::output::frame_channel;
use chip_8_vm::emulator::{Emulator, TimerClock};

mod crossterm_io;
mod key_manager;
use crossterm_io::CrosstermScreen;
use key_manager::KeyManager;

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Instructions executed per second
    #[structopt(long, default_value = "700")]
    cycle_hz: u32,

    /// Screen refreshes per second
    #[structopt(long, default_value = "60")]
    refresh_hz: u32,
}

fn period(hz: u32) -> Duration {
    Duration::from_secs(1) / hz.max(1)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let keypad = Arc::new(Keypad::new());
    let (publisher, mut subscriber) = frame_channel();

    // Load instructions into emulator memory
    let mut emulator = Emulator::with_io(keypad.clone(), publisher);
    emulator.load(&program)?;

    let timers = emulator.timers();
    let _timer_clock = TimerClock::start(timers.clone());

    // The emulator runs on its own thread, and only stops on an error
    let cycle_period = period(opt.cycle_hz);
    let (errors, failure) = mpsc::channel();
    thread::spawn(move || {
        if let Err(error) = emulator.run(cycle_period) {
            let _ = errors.send(error);
        }
    });

    let key_manager = KeyManager::new(keypad);
    let mut screen = CrosstermScreen::new()?;
    let refresh_period = period(opt.refresh_hz);

    let result = loop {
        if key_manager.quit_requested() {
            break Ok(());
        }
        if let Ok(error) = failure.try_recv() {
            break Err(error);
        }
        if let Some(frame) = subscriber.latest() {
            screen.render(&frame)?;
        }
        screen.show_sound(timers.sound_active())?;
        thread::sleep(refresh_period);
    };

    // Give the terminal back before reporting anything
    drop(screen);
    drop(key_manager);

    if let Err(error) = result {
        log::error!("Emulation stopped: {}", error);
        return Err(error.into());
    }
    Ok(())
}
