//! Interactive prompts. Generic over the input and output streams so the
//! prompts can be driven from tests.

use std::io::{self, BufRead, Write};

use crate::install::PackSource;
use crate::selection::{parse_selection, Selection, SelectionParseError};

/// Reads one line and strips the trailing newline and surrounding blanks.
/// End of input reads as an empty line.
pub fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Blocks until the user presses Enter. Returns `false` at end of input so
/// callers do not spin on a closed stdin.
pub fn wait_for_enter<R: BufRead>(input: &mut R) -> io::Result<bool> {
    let mut line = String::new();
    Ok(input.read_line(&mut line)? > 0)
}

/// Shows the pack menu and returns the chosen source, or `None` when the answer
/// is not a valid item number.
pub fn choose_pack<R: BufRead, W: Write>(
    sources: &[PackSource],
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<PackSource>> {
    writeln!(out, "Choose a pack:")?;
    writeln!(out)?;
    for (i, source) in sources.iter().enumerate() {
        writeln!(out, "{}) {}", i + 1, source.label())?;
    }
    writeln!(out)?;
    write!(out, "Enter a number: ")?;
    out.flush()?;

    let answer = read_line(input)?;
    let choice = answer
        .parse::<usize>()
        .ok()
        .filter(|&n| n >= 1 && n <= sources.len())
        .map(|n| sources[n - 1].clone());
    Ok(choice)
}

/// Lists the optional groups and asks which ones to install.
///
/// Invalid tokens are reported on `out` and skipped; a read error counts as an
/// empty answer.
pub fn prompt_groups<R: BufRead, W: Write>(groups: &[String], input: &mut R, out: &mut W) -> io::Result<Selection> {
    writeln!(out)?;
    writeln!(out, "Optional groups found:")?;
    for (i, group) in groups.iter().enumerate() {
        writeln!(out, "{}) {}", i + 1, group)?;
    }
    writeln!(out, "Enter group numbers separated by commas (e.g. 1,3), 'all' for everything, or leave empty to skip:")?;
    write!(out, "Choice: ")?;
    out.flush()?;

    let answer = read_line(input).unwrap_or_default();
    let parsed = parse_selection(&answer, groups);
    for rejected in &parsed.rejected {
        match rejected {
            SelectionParseError::NotANumber(token) => writeln!(out, "Invalid number: {token}")?,
            SelectionParseError::OutOfRange(n) => writeln!(out, "Number out of range: {n}")?,
        }
    }
    Ok(parsed.selection)
}
