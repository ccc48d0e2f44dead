//! Line-oriented control of a running chart.
//!
//! Each input line is one command:
//!
//! ```text
//! range START END   apply a year range ("-" leaves a bound open)
//! reset             clear the year range
//! click KEY         click the bar of a year
//! hover OPERATOR    point at an operator bar
//! leave             move the pointer off the bar
//! back              return to the yearly chart
//! show              print the current view state
//! quit              end the session
//! ```

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::{debug, warn};

use crate::controller::{Command, Controller, Outcome};
use crate::error::Result;
use crate::render::Surface;
use crate::view::BarKey;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// A command for the controller.
    Command(Command),
    /// Print the view state.
    Show,
    /// End the session.
    Quit,
}

/// A line that is not a session command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    /// First word is not a known command.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// Command is missing its argument.
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
///
/// # Errors
///
/// Returns a [`LineError`] for unknown commands or missing arguments.
pub fn parse_line(line: &str) -> std::result::Result<Option<SessionInput>, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let input = match word.to_ascii_lowercase().as_str() {
        "range" => {
            let mut bounds = rest.split_whitespace().map(|b| match b {
                "-" => String::new(),
                other => other.to_string(),
            });
            let start = bounds.next().unwrap_or_default();
            let end = bounds.next().unwrap_or_default();
            SessionInput::Command(Command::RangeUpdate { start, end })
        }
        "reset" => SessionInput::Command(Command::Reset),
        "click" => {
            if rest.is_empty() {
                return Err(LineError::Usage("click YEAR"));
            }
            SessionInput::Command(Command::BarClicked(BarKey::parse(rest)))
        }
        "hover" => {
            if rest.is_empty() {
                return Err(LineError::Usage("hover OPERATOR"));
            }
            SessionInput::Command(Command::BarHovered(rest.to_string()))
        }
        "leave" => SessionInput::Command(Command::HoverEnded),
        "back" => SessionInput::Command(Command::Back),
        "show" => SessionInput::Show,
        "quit" | "exit" => SessionInput::Quit,
        _ => return Err(LineError::Unknown(word.to_string())),
    };
    Ok(Some(input))
}

/// Feed `input` line by line to `controller` until EOF or `quit`.
///
/// `on_render` runs after every command that redrew the chart. Replies go
/// to `output`.
///
/// # Errors
///
/// Returns an error if reading input, writing output, or `on_render` fails.
pub fn run_session<S, R, W, F>(
    controller: &mut Controller<S>,
    input: R,
    mut output: W,
    mut on_render: F,
) -> Result<()>
where
    S: Surface,
    R: BufRead,
    W: Write,
    F: FnMut(&Controller<S>) -> Result<()>,
{
    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(SessionInput::Quit)) => break,
            Ok(Some(SessionInput::Show)) => {
                writeln!(output, "{}", describe(controller))?;
            }
            Ok(Some(SessionInput::Command(command))) => match controller.dispatch(command) {
                Outcome::Rendered => {
                    on_render(controller)?;
                    writeln!(output, "ok: {}", describe(controller))?;
                }
                Outcome::Ignored(reason) => {
                    debug!(reason, "Command ignored");
                    writeln!(output, "ignored: {reason}")?;
                }
            },
            Err(e) => {
                warn!(line = %line, "Bad session input");
                writeln!(output, "error: {e}")?;
            }
        }
        output.flush()?;
    }
    Ok(())
}

fn describe<S: Surface>(controller: &Controller<S>) -> String {
    let state = controller.state();
    let mut parts = vec![state.mode.to_string()];
    if let Some(year) = state.selected_year {
        parts.push(year.to_string());
    } else {
        let bound = |b: Option<i32>| b.map_or_else(|| "-".to_string(), |y| y.to_string());
        parts.push(format!(
            "range {}..{}",
            bound(state.year_range.start),
            bound(state.year_range.end)
        ));
    }
    if let Some(operator) = &state.hovered {
        parts.push(format!("hover {operator}"));
    }
    parts.join(" ")
}
