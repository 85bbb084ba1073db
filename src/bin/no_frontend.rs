use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use chip_8_vm::emulator::{Emulator, TimerClock};

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Stop after this many instructions and print the screen
    #[structopt(long)]
    steps: Option<u64>,

    /// Instructions executed per second
    #[structopt(long, default_value = "700")]
    cycle_hz: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    // Load instructions into emulator memory
    let mut emulator = Emulator::new();
    emulator.load(&program)?;
    let _timer_clock = TimerClock::start(emulator.timers());
    let cycle_period = Duration::from_secs(1) / opt.cycle_hz.max(1);

    // Start execution
    match opt.steps {
        Some(steps) => {
            for _ in 0..steps {
                emulator.step()?;
                std::thread::sleep(cycle_period);
            }
            log::info!("Stopped after {} steps with {:?}", steps, emulator.registers());
            print!("{}", emulator.framebuffer());
        }
        None => emulator.run(cycle_period)?,
    }

    Ok(())
}
