use std::env;
use std::path::PathBuf;

use log::debug;

use crate::builtins::{self, prelude::*};

pub struct Cd;

impl builtins::BuiltinCommand for Cd {
    const NAME: &'static str = builtins::CD_NAME;

    /// An empty path means the home directory.
    fn run(_shell: &mut Shell, arg: &str) -> Result<()> {
        let dir = if arg.is_empty() {
            ::dirs::home_dir().ok_or_else(|| ErrorKind::ChangeDirectory("HOME not set".into()))?
        } else {
            PathBuf::from(arg)
        };

        env::set_current_dir(&dir)
            .chain_err(|| ErrorKind::ChangeDirectory(dir.display().to_string()))?;
        debug!("{}: working directory is now {}", Self::NAME, dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use tempdir::TempDir;

    use super::*;
    use crate::builtins::BuiltinCommand;
    use crate::shell::ShellConfig;

    // The working directory is process-wide, so both cases live in one test.
    #[test]
    fn test_cd() {
        let original = env::current_dir().unwrap();
        let dir = TempDir::new("tsh_cd").unwrap();
        let mut shell = Shell::new(ShellConfig::noninteractive()).unwrap();

        Cd::run(&mut shell, dir.path().to_str().unwrap()).unwrap();
        assert_eq!(
            env::current_dir().unwrap().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );

        let missing = dir.path().join("missing");
        let e = Cd::run(&mut shell, missing.to_str().unwrap()).unwrap_err();
        match *e.kind() {
            ErrorKind::ChangeDirectory(ref path) => assert!(path.ends_with("missing")),
            ref kind => panic!("expected cd error, got {:?}", kind),
        }
        assert!(e.is_recoverable());

        env::set_current_dir(original).unwrap();
    }
}
