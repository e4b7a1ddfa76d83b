//! Interactive read-eval-print loop.

use super::{History, Output};
use crate::agent::Conversation;
use crate::error::Result;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::{error, warn};

/// Prompt shown before each input line.
pub const PROMPT: &str = "> ";

/// Read lines from `input` until end of input, answering each one.
///
/// A failed turn is reported and the loop carries on with the next line.
/// Only a failure to read input ends the loop with an error.
pub async fn run<R: BufRead>(
    conversation: &mut Conversation,
    history: Option<&History>,
    mut input: R,
) -> Result<()> {
    let mut stdout = io::stdout();

    loop {
        print!("{}", PROMPT);
        stdout.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }

        if let Some(history) = history {
            if let Err(e) = history.append(line) {
                warn!(err = %e, path = ?history.path(), "failed to write history");
            }
        }

        let start = Instant::now();
        match conversation.handle_turn(line).await {
            Ok(reply) => Output::reply(&reply),
            Err(e) => {
                error!(err = %e, "turn failed");
                Output::error(&e.to_string());
            }
        }
        let elapsed = start.elapsed();

        let stats = conversation.take_stats();
        Output::stats(&stats.report(elapsed));
    }

    Ok(())
}
