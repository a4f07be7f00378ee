//! Terminal helpers for the interactive menu.

use std::io::{self, Write};

const BANNER: &str = r"
  __  __  ___  ___  ___  _   ___ _  __  _    ___   _   ___  ___ ___
 |  \/  |/ _ \|   \| _ \/_\ / __| |/ / | |  / _ \ /_\ |   \| __| _ \
 | |\/| | (_) | |) |  _/ _ \ (__| ' <  | |_| (_) / _ \| |) | _||   /
 |_|  |_|\___/|___/|_|/_/ \_\___|_|\_\ |____\___/_/ \_\___/|___|_|_\
";

/// Clears the screen and moves the cursor home.
pub fn clear_screen() {
    #[cfg(windows)]
    {
        // Legacy consoles ignore ANSI sequences.
        let _ = std::process::Command::new("cmd").args(["/c", "cls"]).status();
    }
    #[cfg(not(windows))]
    {
        print!("\x1B[2J\x1B[1;1H");
        io::stdout().flush().ok();
    }
}

pub fn print_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{BANNER}")?;
    writeln!(out)
}
