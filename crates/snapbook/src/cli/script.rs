//! Session scripts: one intent per line.
//!
//! ```text
//! # comments and blank lines are ignored
//! start
//! take
//! retake
//! take
//! save
//! label Sunset over the bay   # edits the photo open in the editor
//! done
//! select 1                    # 1-based position
//! relabel 1 Dawn
//! cancel
//! show
//! ```

use crate::app::Intent;
use crate::error::{Error, Result};

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Send an intent to the session.
    Intent(Intent),
    /// Print the current photo list.
    Show,
}

/// Parse a whole script, skipping blank lines and comments.
///
/// # Errors
///
/// Returns [`Error::ScriptParse`] for the first malformed line.
pub fn parse_script(source: &str) -> Result<Vec<Step>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, line)| parse_line(i + 1, line).transpose())
        .collect()
}

/// Parse a single line; `Ok(None)` for blank or comment lines.
///
/// # Errors
///
/// Returns [`Error::ScriptParse`] if the line is not a known command.
pub fn parse_line(number: usize, line: &str) -> Result<Option<Step>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let step = match command.to_ascii_lowercase().as_str() {
        "start" => Step::Intent(Intent::StartCamera),
        "take" => Step::Intent(Intent::TakePicture),
        "retake" => Step::Intent(Intent::RetakePicture),
        "save" => Step::Intent(Intent::SavePicture),
        "cancel" => Step::Intent(Intent::CancelCamera),
        "done" => Step::Intent(Intent::CloseEditor),
        "show" => Step::Show,
        "select" => Step::Intent(Intent::SelectPhoto(position(number, rest)?)),
        "label" => Step::Intent(Intent::EditLabel(rest.to_string())),
        "relabel" => {
            let (pos, label) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Step::Intent(Intent::RelabelPhoto {
                index: position(number, pos)?,
                label: label.trim().to_string(),
            })
        }
        other => {
            return Err(Error::script_parse(
                number,
                format!("unknown command '{other}'"),
            ))
        }
    };
    Ok(Some(step))
}

/// Convert a 1-based position argument into an index.
fn position(number: usize, arg: &str) -> Result<usize> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(Error::script_parse(
            number,
            format!("expected a photo position (1, 2, ...), got '{arg}'"),
        )),
    }
}
