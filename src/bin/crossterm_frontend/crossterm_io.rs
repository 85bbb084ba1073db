use chip_8_vm::emulator::framebuffer::{Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

use crossterm::event::KeyCode;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Stdout, Write};

/// Terminal columns per pixel. Character cells are about twice as tall as
/// they are wide, so this makes pixels roughly square.
const ZOOM: u16 = 2;

const RIGHT: u16 = ZOOM * SCREEN_WIDTH as u16 + 1;
const BOTTOM: u16 = SCREEN_HEIGHT as u16 + 1;

/// The terminal, in raw mode on the alternate screen for as long as this lives.
pub struct CrosstermScreen {
    stdout: Stdout,
    shown: Framebuffer,
    sound_shown: bool,
}

impl CrosstermScreen {
    pub fn new() -> crossterm::Result<CrosstermScreen> {
        let mut stdout = stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;

        let horizontal = "━".repeat((RIGHT - 1) as usize);
        queue!(stdout, cursor::MoveTo(0, 0), Print(format!("┏{}┓", horizontal)))?;
        for y in 1..BOTTOM {
            queue!(
                stdout,
                cursor::MoveTo(0, y),
                Print('┃'),
                cursor::MoveTo(RIGHT, y),
                Print('┃')
            )?;
        }
        queue!(stdout, cursor::MoveTo(0, BOTTOM), Print(format!("┗{}┛", horizontal)))?;
        stdout.flush()?;

        Ok(CrosstermScreen {
            stdout,
            shown: Framebuffer::new(),
            sound_shown: false,
        })
    }

    /// Redraw the pixels that differ from what is on the terminal already.
    pub fn render(&mut self, frame: &Framebuffer) -> crossterm::Result<()> {
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                let lit = frame.pixel(x, y);
                if lit != self.shown.pixel(x, y) {
                    let cell = if lit { "█" } else { " " }.repeat(ZOOM as usize);
                    queue!(
                        self.stdout,
                        cursor::MoveTo(ZOOM * x as u16 + 1, y as u16 + 1),
                        Print(cell)
                    )?;
                }
            }
        }
        self.shown = *frame;
        self.stdout.flush()?;
        Ok(())
    }

    /// There is no audio, so the buzzer is shown under the screen instead.
    pub fn show_sound(&mut self, active: bool) -> crossterm::Result<()> {
        if active != self.sound_shown {
            let text = if active { "♪ BEEP" } else { "      " };
            queue!(self.stdout, cursor::MoveTo(1, BOTTOM + 1), Print(text))?;
            self.stdout.flush()?;
            self.sound_shown = active;
        }
        Ok(())
    }
}

impl Drop for CrosstermScreen {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// The usual layout, with the hex keypad on the left of a QWERTY keyboard:
///
/// ```text
/// 1 2 3 C      1 2 3 4
/// 4 5 6 D      q w e r
/// 7 8 9 E  <-  a s d f
/// A 0 B F      z x c v
/// ```
pub fn key_to_u8(key: KeyCode) -> Option<u8> {
    let c = match key {
        KeyCode::Char(c) => c.to_ascii_lowercase(),
        _ => return None,
    };
    let key = match c {
        '1' => 0x1,
        '2' => 0x2,
        '3' => 0x3,
        '4' => 0xC,
        'q' => 0x4,
        'w' => 0x5,
        'e' => 0x6,
        'r' => 0xD,
        'a' => 0x7,
        's' => 0x8,
        'd' => 0x9,
        'f' => 0xE,
        'z' => 0xA,
        'x' => 0x0,
        'c' => 0xB,
        'v' => 0xF,
        _ => return None,
    };
    Some(key)
}
