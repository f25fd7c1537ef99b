//! Interactive search loop.
//!
//! Prompts for an algorithm, a start node, a resource and an optional TTL,
//! runs the search, prints the result, and asks again. Request errors are
//! printed and the loop keeps going. An empty algorithm, `quit`, `exit` or
//! end of input stops it.

use std::io::{BufRead, Write};

use color_eyre::eyre::{Context, Result};
use log::warn;

use crate::report::{format_available, render_report, OutputFormat};
use crate::search::dispatch::{PARAM_NODE, PARAM_RESOURCE, PARAM_TTL};
use crate::search::Dispatcher;
use crate::topology::Topology;

/// Write a prompt and read one trimmed line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
) -> Result<Option<String>> {
    write!(output, "{}", text)?;
    output.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read from input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run the loop until the user stops it.
///
/// # Returns
/// Number of searches that completed successfully
pub fn run_shell<R: BufRead, W: Write>(
    dispatcher: &mut Dispatcher,
    topology: &mut Topology,
    mut input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<usize> {
    let mut completed = 0;
    writeln!(output, "{}", format_available(dispatcher.registry()))?;

    loop {
        writeln!(output)?;

        let algorithm = match prompt(&mut input, output, "[ALGORITHM?] Search algorithm name: ")? {
            Some(name) if !name.is_empty() && name != "quit" && name != "exit" => name,
            _ => break,
        };
        let Some(node) = prompt(&mut input, output, "[NODE?] Start node: ")? else {
            break;
        };
        let Some(resource) = prompt(&mut input, output, "[RESOURCE?] Resource to find: ")? else {
            break;
        };
        let ttl = prompt(&mut input, output, "(OPTIONAL) Time To Live (TTL): ")?
            .unwrap_or_default();

        let params = [(PARAM_NODE, node), (PARAM_RESOURCE, resource), (PARAM_TTL, ttl)];
        match dispatcher.execute(topology, &algorithm, params) {
            Ok(report) => {
                writeln!(output, "{}", render_report(&report, format)?)?;
                completed += 1;
            }
            Err(err) => {
                warn!("Search request rejected: {}", err);
                writeln!(output, "Error: {}", err)?;
            }
        }
    }

    writeln!(output, "Bye.")?;
    Ok(completed)
}
