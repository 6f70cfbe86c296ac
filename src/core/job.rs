//! A Job is one parsed command line: a pipeline of Processes plus the
//! descriptors the pipeline reads from and writes to.

use std::fmt;
use std::fs::File;
use std::os::unix::io::{AsRawFd, RawFd};

use log::debug;
use nix::libc;

/// Initial capacity of a Process's argument list.
pub const INITIAL_ARGV_CAPACITY: usize = 8;

/// Where a pipeline stage reads its standard input from.
#[derive(Debug)]
pub enum Stdin {
    Inherit,
    File(File),
    Pipe(File),
}

/// Where a pipeline stage writes its standard output to.
#[derive(Debug)]
pub enum Output {
    Inherit,
    File(File),
    Pipe(File),
}

impl Default for Stdin {
    fn default() -> Self {
        Stdin::Inherit
    }
}

impl Default for Output {
    fn default() -> Self {
        Output::Inherit
    }
}

impl From<File> for Stdin {
    fn from(file: File) -> Self {
        Stdin::File(file)
    }
}

impl From<File> for Output {
    fn from(file: File) -> Self {
        Output::File(file)
    }
}

impl AsRawFd for Stdin {
    fn as_raw_fd(&self) -> RawFd {
        match self {
            Stdin::Inherit => libc::STDIN_FILENO,
            Stdin::File(f) | Stdin::Pipe(f) => f.as_raw_fd(),
        }
    }
}

impl AsRawFd for Output {
    fn as_raw_fd(&self) -> RawFd {
        match self {
            Output::Inherit => libc::STDOUT_FILENO,
            Output::File(f) | Output::Pipe(f) => f.as_raw_fd(),
        }
    }
}

impl Stdin {
    pub fn is_inherit(&self) -> bool {
        match self {
            Stdin::Inherit => true,
            _ => false,
        }
    }
}

impl Output {
    pub fn is_inherit(&self) -> bool {
        match self {
            Output::Inherit => true,
            _ => false,
        }
    }
}

/// One pipeline stage. `argv[0]` is the program name.
#[derive(Clone, Debug, PartialEq)]
pub struct Process {
    argv: Vec<String>,
}

impl Process {
    /// Splits `segment` on whitespace. Returns `None` if there are no tokens.
    pub fn from_segment(segment: &str) -> Option<Self> {
        let mut argv = Vec::with_capacity(INITIAL_ARGV_CAPACITY);
        argv.extend(
            segment
                .split(|c: char| c.is_ascii_whitespace())
                .filter(|token| !token.is_empty())
                .map(String::from),
        );

        if argv.is_empty() {
            None
        } else {
            Some(Self { argv })
        }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// A pipeline of one or more processes.
///
/// Dropping a Job releases everything it still owns, including any
/// redirection file that was never handed to a child.
#[derive(Debug)]
pub struct Job {
    /// Command line, used for messages
    input: String,
    processes: Vec<Process>,
    pub(crate) stdin: Stdin,
    pub(crate) stdout: Output,
}

impl Job {
    pub(crate) fn new(input: &str, processes: Vec<Process>, stdin: Stdin, stdout: Output) -> Self {
        debug_assert!(!processes.is_empty());
        Self {
            input: input.to_owned(),
            processes,
            stdin,
            stdout,
        }
    }

    /// The line this job was parsed from.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn stdin(&self) -> &Stdin {
        &self.stdin
    }

    pub fn stdout(&self) -> &Output {
        &self.stdout
    }
}

impl Drop for Job {
    fn drop(&mut self) {
        debug!(
            "tearing down job '{}' ({} processes, stdin: {}, stdout: {})",
            self.input.trim_end(),
            self.processes.len(),
            if self.stdin.is_inherit() { "inherit" } else { "owned" },
            if self.stdout.is_inherit() { "inherit" } else { "owned" },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_from_segment() {
        let process = Process::from_segment("  grep  -v\tfoo \n").unwrap();
        assert_eq!(process.argv(), &["grep", "-v", "foo"]);
        assert_eq!(process.program(), "grep");
        assert_eq!(process.to_string(), "grep -v foo");
    }

    #[test]
    fn test_process_from_empty_segment() {
        assert!(Process::from_segment("").is_none());
        assert!(Process::from_segment(" \t \n").is_none());
    }

    #[test]
    fn test_process_many_arguments() {
        let segment = (0..20).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let process = Process::from_segment(&segment).unwrap();
        assert_eq!(process.argv().len(), 20);
        assert_eq!(process.argv()[19], "19");
    }

    #[test]
    fn test_default_descriptors() {
        let job = Job::new(
            "true",
            vec![Process::from_segment("true").unwrap()],
            Stdin::default(),
            Output::default(),
        );
        assert_eq!(job.stdin().as_raw_fd(), libc::STDIN_FILENO);
        assert_eq!(job.stdout().as_raw_fd(), libc::STDOUT_FILENO);
        assert_eq!(job.processes().len(), 1);
    }
}
