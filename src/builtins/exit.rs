use crate::builtins::{self, prelude::*};

pub struct Quit;

impl builtins::BuiltinCommand for Quit {
    const NAME: &'static str = builtins::QUIT_NAME;

    fn run(shell: &mut Shell, _arg: &str) -> Result<()> {
        shell.request_exit();
        Ok(())
    }
}
