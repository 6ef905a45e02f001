//! Terminal command reader
//!
//! Line-oriented twin of the keypad: every line decodes into the same
//! [`Command`] set. Letters are case-insensitive.
//!
//! | input | command |
//! |---|---|
//! | empty line | confirm |
//! | `0`-`9` | select digit |
//! | `+` / `-` | next / previous channel |
//! | `N` / `M` | start / stop session |
//! | `W` `A` `S` `D` | nudge up, left, down, right |
//! | `Q` | back |
//! | `K` | quit |

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use waytv_core::{Command, Direction};

use crate::cancel::CancelFlag;
use crate::error::{InputError, LineError};

/// Decode one terminal line
pub fn parse_line(line: &str) -> Result<Command, LineError> {
    let input = line.trim();
    let command = match input.to_ascii_uppercase().as_str() {
        "" => Command::Confirm,
        "N" => Command::Start,
        "M" => Command::Stop,
        "W" => Command::Nudge(Direction::Up),
        "A" => Command::Nudge(Direction::Left),
        "S" => Command::Nudge(Direction::Down),
        "D" => Command::Nudge(Direction::Right),
        "Q" => Command::Back,
        "K" => Command::Quit,
        "+" => Command::NextChannel,
        "-" => Command::PreviousChannel,
        _ if is_number(input) => match input.parse::<u8>() {
            Ok(digit) if digit <= 9 => Command::SelectDigit(digit),
            _ => return Err(LineError::OutOfRange(input.to_string())),
        },
        _ => return Err(LineError::Unknown(input.to_string())),
    };
    Ok(command)
}

/// Unsigned decimal only; a sign makes the line unknown input
fn is_number(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

/// Read commands from `reader` until quit, cancellation or end of input
///
/// Each read waits at most `poll_timeout` before the cancel flag is checked
/// again. Quit sets the flag for the device loop; end of input only ends
/// this loop.
pub async fn run_terminal_loop<R>(
    reader: R,
    tx: mpsc::Sender<Command>,
    cancel: CancelFlag,
    poll_timeout: Duration,
) -> Result<(), InputError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        if cancel.is_cancelled() {
            debug!("Terminal loop cancelled");
            return Ok(());
        }

        let line = match tokio::time::timeout(poll_timeout, lines.next_line()).await {
            Err(_) => continue,
            Ok(Ok(Some(line))) => line,
            Ok(Ok(None)) => {
                info!("Terminal input closed");
                return Ok(());
            }
            Ok(Err(e)) => return Err(InputError::TerminalRead(e.to_string())),
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        debug!("Terminal {:?}", command);
        if tx.send(command).await.is_err() {
            info!("Command receiver gone");
            return Ok(());
        }
        if command.is_quit() {
            cancel.cancel();
            return Ok(());
        }
    }
}
