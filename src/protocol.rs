use std::error::Error;
use std::io::{BufRead, Write};

use fnv::FnvHashMap;
use log::error;

use crate::data::Pos;
use crate::level::Level;
use crate::moves::Plan;
use crate::parser;

/// Reads the level the server sends line by line, terminated by a blank
/// line, and parses it.
pub fn read_level<R: BufRead>(reader: &mut R) -> Result<Level, Box<dyn Error>> {
    let mut text = String::new();
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
        if read == 0 || line.is_empty() {
            break;
        }
        text.push_str(line);
        text.push('\n');
    }
    Ok(parser::parse(&text)?)
}

/// Plays a plan back against the server: one action token per line, one
/// acknowledgement line read per action. An acknowledgement containing
/// `"false"` means the server rejected the action as illegal - the action
/// and the configuration it was attempted from are logged and playback
/// stops. No retry, no replanning.
///
/// Returns how many actions the server accepted.
pub fn play<R, W>(
    level: &Level,
    plan: &Plan,
    reader: &mut R,
    writer: &mut W,
) -> Result<usize, Box<dyn Error>>
where
    R: BufRead,
    W: Write,
{
    let mut agent = level.agent;
    let mut boxes: FnvHashMap<Pos, u8> = level.boxes.iter().cloned().collect();
    let mut accepted = 0;

    for &action in plan {
        writeln!(writer, "{}", action)?;
        writer.flush()?;

        let mut response = String::new();
        reader.read_line(&mut response)?;
        if response.contains("false") {
            error!(
                "Server responded with {:?} to the inapplicable action: {}",
                response.trim_end(),
                action,
            );
            error!(
                "{} was attempted in\n{}",
                action,
                level.grid.render(agent, &boxes),
            );
            break;
        }

        match action.apply(agent, &mut boxes) {
            Some(new_agent) => agent = new_agent,
            None => {
                // a plan from the search can't contain this, but don't
                // poison the replayed configuration if it ever happens
                error!("Plan action {} does not apply, stopping playback", action);
                break;
            }
        }
        accepted += 1;
    }

    Ok(accepted)
}
