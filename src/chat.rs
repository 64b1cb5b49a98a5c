//! Text chat surface over the same retrieval index the voice session
//! uses. Reads questions line by line, prints the best match with its
//! score, and exits on the usual keywords or EOF.

use crate::defaults;
use crate::error::Result;
use crate::retrieval::{Retriever, best_hit};
use crate::text::normalize;
use owo_colors::OwoColorize;
use std::io::{BufRead, Write};

/// Drives the chat loop over the given reader/writer. Returns when the
/// user types an exit keyword or input reaches EOF.
pub fn chat_loop<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    retriever: &dyn Retriever,
    top_k: usize,
) -> Result<()> {
    writeln!(output, "{}", defaults::GREETING.green())?;
    writeln!(output, "Type 'exit', 'quit' or 'q' to leave.")?;

    let mut line = String::new();
    loop {
        write!(output, "\n{} ", "You:".bold())?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if defaults::CHAT_EXIT_KEYWORDS.contains(&normalize(question).as_str()) {
            writeln!(output, "{}", defaults::FAREWELL.green())?;
            break;
        }

        let hits = match retriever.search(question, top_k) {
            Ok(hits) => hits,
            Err(e) => {
                writeln!(output, "{}", format!("Retrieval failed: {e}").red())?;
                continue;
            }
        };

        match best_hit(&hits) {
            Some((score, record)) => {
                writeln!(output, "\n{}", record.format_answer())?;
                writeln!(output, "{}", format!("(score: {score:.3})").dimmed())?;

                let others: Vec<_> = hits
                    .iter()
                    .filter(|(_, r)| r != record)
                    .filter(|(_, r)| !r.title.trim().is_empty())
                    .collect();
                if !others.is_empty() {
                    writeln!(output, "{}", "Related:".dimmed())?;
                    for (score, r) in others {
                        writeln!(
                            output,
                            "{}",
                            format!("  - {} ({score:.3})", r.title.trim()).dimmed()
                        )?;
                    }
                }
            }
            None => {
                writeln!(output, "{}", defaults::NO_ANSWER)?;
            }
        }
    }

    Ok(())
}

/// Runs the chat loop on stdin/stdout.
pub fn run_chat(retriever: &dyn Retriever, top_k: usize) -> Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    chat_loop(&mut input, &mut output, retriever, top_k)
}
