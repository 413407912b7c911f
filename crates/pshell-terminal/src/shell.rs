//! The read-eval-print loop.
//!
//! One iteration: print the prompt, read a line, dispatch it, render the
//! outcome. Commands are strictly serialized by the line boundary. Command
//! failures are printed and the loop carries on; only `finish`, end of input
//! or a broken input/output stream end the session.

use std::io::{BufRead, Write};

use pshell_types::config::ShellConfig;
use pshell_types::error::Result;

use crate::commands::register_builtins;
use crate::interpreter::{CommandOutput, CommandRegistry, Environment};
use crate::table::render_table;

/// An interactive shell: a command registry plus its configuration.
pub struct Shell {
    registry: CommandRegistry,
    config: ShellConfig,
}

impl Shell {
    /// A shell with all built-in commands registered.
    pub fn new(config: ShellConfig) -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        Self::with_registry(config, registry)
    }

    /// A shell over a caller-assembled registry.
    pub fn with_registry(config: ShellConfig, registry: CommandRegistry) -> Self {
        Self { registry, config }
    }

    /// Run until `finish` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &self,
        env: &mut Environment<'_>,
        mut input: R,
        mut output: W,
    ) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            write!(output, "{}", self.config.prompt)?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(output)?;
                output.flush()?;
                log::info!("end of input");
                return Ok(());
            }
            // Undecodable bytes become U+FFFD; the line still runs.
            let line = String::from_utf8_lossy(&buf);
            if !self.step(&line, env, &mut output)? {
                log::info!("finish requested");
                return Ok(());
            }
        }
    }

    /// Dispatch one line and write its outcome. Returns `false` once the
    /// session should end.
    pub fn step<W: Write>(
        &self,
        line: &str,
        env: &mut Environment<'_>,
        output: &mut W,
    ) -> Result<bool> {
        match self.registry.execute(line, env) {
            Ok(CommandOutput::Text(text)) => {
                for l in text.lines() {
                    writeln!(output, "{l}")?;
                }
            },
            Ok(CommandOutput::Table {
                headers,
                widths,
                rows,
            }) => {
                writeln!(output, "{}", render_table(&headers, &widths, &rows))?;
            },
            Ok(CommandOutput::None) => {},
            Ok(CommandOutput::Exit) => return Ok(false),
            Err(e) => {
                log::debug!("{:?} failed: {e}", line.trim_end());
                writeln!(output, "{}", e.report())?;
            },
        }
        Ok(true)
    }
}
