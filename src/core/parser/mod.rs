//! Tsh Parser
//!
//! Turns one input line into either a builtin or a [`Job`]. Redirections are
//! only honored at the edges of the pipeline: `<` before the first `|` and
//! `>` after the last `|`. Honored redirections are erased from the line
//! before it is split on `|`.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;

use log::debug;

use crate::builtins::Builtin;
use crate::core::job::{Job, Output, Process, Stdin};
use crate::errors::{self, ErrorKind, Result, ResultExt};

const PIPE: char = '|';
const REDIRECT_IN: char = '<';
const REDIRECT_OUT: char = '>';

/// rw-rw----
const OUTPUT_FILE_MODE: u32 = 0o660;

/// A parsed line.
#[derive(Debug)]
pub enum Command {
    Builtin(Builtin),
    Job(Job),
}

impl Command {
    /// Parse `input`. Builtins are recognized before anything else.
    pub fn parse(input: &str) -> Result<Self> {
        if let Some(builtin) = Builtin::detect(input) {
            debug!("builtin: {:?}", builtin);
            return Ok(Command::Builtin(builtin));
        }

        Job::parse(input).map(Command::Job)
    }
}

impl Job {
    /// Parse `input` into a pipeline, opening any redirection files.
    ///
    /// On error nothing survives: files opened so far are closed when the
    /// partially built descriptors are dropped.
    pub fn parse(input: &str) -> Result<Self> {
        debug!("original cmd: {}", input.trim_end());
        let mut text = input.to_owned();

        let stdin = match find_input_redirect(&text) {
            Some(pos) => {
                let filename = take_redirect(&mut text, pos)?;
                debug!("input file: {}", filename);
                Stdin::File(open_input(&filename)?)
            }
            None => Stdin::Inherit,
        };

        let stdout = match find_output_redirect(&text) {
            Some(pos) => {
                let filename = take_redirect(&mut text, pos)?;
                debug!("output file: {}", filename);
                Output::File(open_output(&filename)?)
            }
            None => Output::Inherit,
        };

        debug!("erased I/O redirect: {}", text.trim_end());
        let processes = split_pipeline(&text)?;
        for process in &processes {
            debug!("process: {:?}", process.argv());
        }

        Ok(Job::new(input, processes, stdin, stdout))
    }
}

fn is_whitespace(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// The first `<`, if it comes before the first `|`.
fn find_input_redirect(text: &str) -> Option<usize> {
    let pos = text.find(REDIRECT_IN)?;
    match text.find(PIPE) {
        Some(pipe) if pipe < pos => None,
        _ => Some(pos),
    }
}

/// The last `>`, if it comes after the last `|`.
fn find_output_redirect(text: &str) -> Option<usize> {
    let pos = text.rfind(REDIRECT_OUT)?;
    match text.rfind(PIPE) {
        Some(pipe) if pipe > pos => None,
        _ => Some(pos),
    }
}

/// Extracts the filename following the operator at `pos` and blanks out the
/// operator and filename in `text`.
fn take_redirect(text: &mut String, pos: usize) -> Result<String> {
    let operator = &text[pos..=pos];
    let rest = &text[pos + 1..];
    let start = pos + 1 + (rest.len() - rest.trim_start_matches(is_whitespace).len());
    let end = text[start..]
        .find(is_whitespace)
        .map_or(text.len(), |len| start + len);
    if start == end {
        return Err(errors::syntax(format!(
            "missing filename after '{}'",
            operator
        )));
    }

    let filename = text[start..end].to_owned();
    text.replace_range(pos..end, &" ".repeat(end - pos));
    Ok(filename)
}

fn open_input(filename: &str) -> Result<File> {
    File::open(filename).chain_err(|| ErrorKind::Redirect(filename.to_owned()))
}

fn open_output(filename: &str) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(OUTPUT_FILE_MODE)
        .open(filename)
        .chain_err(|| ErrorKind::Redirect(filename.to_owned()))
}

/// Every `|` ends a stage, and whatever follows the last one is the final
/// stage. A stage without tokens invalidates the whole pipeline.
fn split_pipeline(text: &str) -> Result<Vec<Process>> {
    let segments: Vec<&str> = text.split(PIPE).collect();
    let last = segments.len() - 1;
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            Process::from_segment(segment).ok_or_else(|| {
                if i < last {
                    errors::syntax("empty pipeline")
                } else {
                    errors::syntax("empty command")
                }
            })
        })
        .collect()
}
