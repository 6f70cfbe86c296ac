use std::fmt;

use rustyline::{self, error::ReadlineError, Config};

use crate::errors::Result;

/// Line acquisition, backed by rustyline.
pub struct Editor {
    internal: rustyline::Editor<()>,
    history_capacity: usize,
}

impl Editor {
    pub fn with_capacity(history_capacity: usize) -> Result<Editor> {
        let config = Config::builder()
            .max_history_size(history_capacity)
            .history_ignore_space(true)
            .build();

        Ok(Editor {
            internal: rustyline::Editor::with_config(config)?,
            history_capacity,
        })
    }

    /// Reads one line without its terminator.
    /// Returns `None` when end of file is reached. An interrupted read
    /// returns an empty line.
    pub fn readline(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.internal.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(e) => Err(e.into()),
        }
    }

    pub fn add_history_entry(&mut self, line: &str) {
        if self.history_capacity > 0 {
            self.internal.add_history_entry(line);
        }
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Editor {{ history: {}/{} }}",
            self.internal.history().len(),
            self.history_capacity
        )
    }
}
