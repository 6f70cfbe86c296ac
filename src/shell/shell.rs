//! The Shell reads lines, hands each one to the parser and launcher, and
//! tears the resulting Job down before reading the next line.

use std::fmt;
use std::fs;
use std::path::Path;
use std::process::{self, ExitStatus};

use log::{debug, info, warn};
use nix::sys::signal::{self, SigHandler, Signal};

use super::ShellConfig;
use crate::core::parser::Command;
use crate::editor::Editor;
use crate::errors::{self, ErrorKind, Result, ResultExt};
use crate::execute_command;
use crate::util::TshExitStatusExt;

const PROMPT: &str = "(tsh) ";
const SYNTAX_ERROR_EXIT_STATUS: i32 = 2;

/// Tsh Shell
pub struct Shell {
    /// Responsible for reading lines.
    editor: Editor,
    /// Exit status of last pipeline executed.
    last_exit_status: ExitStatus,
    config: ShellConfig,
    /// Set by the quit builtin.
    exit_requested: bool,
}

impl Shell {
    /// Constructs a new Shell.
    pub fn new(config: ShellConfig) -> Result<Shell> {
        if config.ignore_interrupts {
            let result = unsafe { signal::signal(Signal::SIGINT, SigHandler::SigIgn) };
            result.chain_err(|| "failed to ignore SIGINT")?;
        }

        let shell = Shell {
            editor: Editor::with_capacity(config.command_history_capacity)?,
            last_exit_status: ExitStatus::from_success(),
            config,
            exit_requested: false,
        };

        info!("tsh started up");
        Ok(shell)
    }

    /// Exit status of the last pipeline, or of the last failed line.
    pub fn last_exit_status(&self) -> ExitStatus {
        self.last_exit_status
    }

    /// Returns `true` once the quit builtin has run.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub(crate) fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Runs one line.
    ///
    /// Recoverable errors (bad syntax, unopenable redirection files, a failed
    /// `cd`) are reported and swallowed. Any other error is returned and
    /// should end the shell.
    pub fn execute_command_string(&mut self, input: &str) -> Result<()> {
        // skip if empty
        if input.trim().is_empty() {
            return Ok(());
        }

        if self.config.enable_command_history {
            self.editor.add_history_entry(input);
        }

        match self.execute_command(input) {
            Err(ref e) if e.is_recoverable() => {
                let message = errors::display_chain(e);
                warn!("{}: {}", input.trim_end(), message);
                eprintln!("tsh: {}", message);
                let code = match *e.kind() {
                    ErrorKind::Syntax(_) => SYNTAX_ERROR_EXIT_STATUS,
                    _ => 1,
                };
                self.last_exit_status = ExitStatus::from_status(code);
                Ok(())
            }
            result => result,
        }
    }

    /// Runs a tsh script from a file, stopping early at `q`.
    pub fn execute_commands_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let buffer = fs::read_to_string(path)
            .chain_err(|| format!("failed to read {}", path.display()))?;

        for line in buffer.lines() {
            self.execute_command_string(line)?;
            if self.exit_requested {
                break;
            }
        }

        Ok(())
    }

    /// Runs lines from stdin until `q` or EOF is received.
    pub fn execute_from_stdin(&mut self) -> Result<()> {
        if self.config.display_messages {
            println!("tsh {}", env!("CARGO_PKG_VERSION"));
            println!("Pipelines of programs joined by '|', with '<' and '>' at the ends.");
            println!("Type 'q' to quit.");
        }

        let prompt = if self.config.display_messages { PROMPT } else { "" };
        while !self.exit_requested {
            let input = match self.editor.readline(prompt)? {
                Some(line) => line,
                None => break,
            };

            self.execute_command_string(&input)?;
        }

        Ok(())
    }

    /// Parses and runs one line. The Job, and every descriptor it still
    /// owns, is released when this returns, whether or not it ran.
    fn execute_command(&mut self, input: &str) -> Result<()> {
        match Command::parse(input)? {
            Command::Builtin(builtin) => builtin.run(self),
            Command::Job(mut job) => {
                self.last_exit_status = execute_command::launch_job(&mut job, false)?;
                debug!("'{}' exited with {}", job.input(), self.last_exit_status);
                Ok(())
            }
        }
    }

    /// Exit the shell with a status of 0.
    pub fn exit(&mut self) -> ! {
        if self.config.display_messages {
            println!("exit");
        }

        info!("tsh has shut down");
        process::exit(0);
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Shell {{ last_exit_status: {}, exit_requested: {}, {:?} }}",
            self.last_exit_status, self.exit_requested, self.editor
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempdir::TempDir;

    use super::*;

    fn shell() -> Shell {
        Shell::new(ShellConfig::noninteractive()).unwrap()
    }

    #[test]
    fn test_runs_pipeline() {
        let dir = TempDir::new("tsh_shell").unwrap();
        let out = dir.path().join("out");
        let mut shell = shell();

        shell
            .execute_command_string(&format!("echo a b | wc -w > {}", out.display()))
            .unwrap();
        assert!(shell.last_exit_status().success());
        assert_eq!(fs::read_to_string(&out).unwrap().trim(), "2");
    }

    #[test]
    fn test_syntax_error_is_reported_and_swallowed() {
        let mut shell = shell();
        shell.execute_command_string("cmd1 | | cmd2").unwrap();
        assert_eq!(
            shell.last_exit_status().code(),
            Some(SYNTAX_ERROR_EXIT_STATUS)
        );
        assert!(!shell.exit_requested());
    }

    #[test]
    fn test_missing_redirect_file_is_swallowed() {
        let mut shell = shell();
        shell
            .execute_command_string("cat < /nonexistent/tsh/input")
            .unwrap();
        assert_eq!(shell.last_exit_status().code(), Some(1));
    }

    #[test]
    fn test_blank_line_is_skipped() {
        let mut shell = shell();
        shell.execute_command_string("   ").unwrap();
        assert!(shell.last_exit_status().success());
    }

    #[test]
    fn test_quit() {
        let mut shell = shell();
        shell.execute_command_string("q").unwrap();
        assert!(shell.exit_requested());
    }

    #[test]
    fn test_last_exit_status() {
        let mut shell = shell();
        shell.execute_command_string("false").unwrap();
        assert_eq!(shell.last_exit_status().code(), Some(1));
        shell.execute_command_string("true").unwrap();
        assert!(shell.last_exit_status().success());
    }

    #[test]
    fn test_script_stops_at_quit() {
        let dir = TempDir::new("tsh_shell").unwrap();
        let script = dir.path().join("script.tsh");
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        let mut file = fs::File::create(&script).unwrap();
        writeln!(file, "echo one > {}", first.display()).unwrap();
        writeln!(file, "q").unwrap();
        writeln!(file, "echo two > {}", second.display()).unwrap();

        let mut shell = shell();
        shell.execute_commands_from_file(&script).unwrap();
        assert!(shell.exit_requested());
        assert_eq!(fs::read_to_string(&first).unwrap(), "one\n");
        assert!(!second.exists());
    }
}
