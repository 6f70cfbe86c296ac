//! Tsh builtins
//!
//! Builtins are recognized by the first characters of the raw line, before
//! the line is parsed as a pipeline.

use self::prelude::*;

use self::dirs::Cd;
use self::exit::Quit;

pub mod prelude {
    pub use crate::errors::{ErrorKind, Result, ResultExt};
    pub use crate::shell::Shell;
}

mod dirs;
mod exit;

const CD_NAME: &str = "cd";
const QUIT_NAME: &str = "q";

/// Represents a Tsh builtin command.
pub trait BuiltinCommand {
    /// The NAME of the command.
    const NAME: &'static str;
    /// Runs the command with the raw text following its name.
    fn run(shell: &mut Shell, arg: &str) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Builtin {
    /// Change the working directory. Holds the unparsed path.
    Cd(String),
    Quit,
}

impl Builtin {
    /// Recognizes `cd` and `q` when followed by whitespace or the end of
    /// the line.
    pub fn detect(line: &str) -> Option<Self> {
        if let Some(rest) = keyword_rest(line, CD_NAME) {
            let path = rest.trim_end_matches(|c: char| c == '\n' || c == '\r');
            return Some(Builtin::Cd(path.to_owned()));
        }

        keyword_rest(line, QUIT_NAME).map(|_| Builtin::Quit)
    }

    pub fn run(&self, shell: &mut Shell) -> Result<()> {
        match self {
            Builtin::Cd(path) => Cd::run(shell, path),
            Builtin::Quit => Quit::run(shell, ""),
        }
    }
}

/// The text after `name` and the single whitespace character separating
/// them, if `line` starts with `name` as a whole word.
fn keyword_rest<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_ascii_whitespace() => Some(&rest[1..]),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_cd() {
        assert_eq!(Builtin::detect("cd /tmp"), Some(Builtin::Cd("/tmp".into())));
        assert_eq!(Builtin::detect("cd /tmp\n"), Some(Builtin::Cd("/tmp".into())));
        assert_eq!(Builtin::detect("cd\tdir\r\n"), Some(Builtin::Cd("dir".into())));
        assert_eq!(Builtin::detect("cd"), Some(Builtin::Cd("".into())));
        assert_eq!(Builtin::detect("cd\n"), Some(Builtin::Cd("".into())));
        assert_eq!(Builtin::detect("cdrom"), None);
        assert_eq!(Builtin::detect(" cd /tmp"), None);
    }

    #[test]
    fn test_detect_quit() {
        assert_eq!(Builtin::detect("q"), Some(Builtin::Quit));
        assert_eq!(Builtin::detect("q\n"), Some(Builtin::Quit));
        assert_eq!(Builtin::detect("q now"), Some(Builtin::Quit));
        assert_eq!(Builtin::detect("quit"), None);
        assert_eq!(Builtin::detect("echo q"), None);
    }
}
