//! Error module. See the [error-chain](https://crates.io/crates/error-chain) crate for details.

error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Nix(::nix::Error);
        Readline(::rustyline::error::ReadlineError);
    }

    errors {
        /// The line does not describe a runnable pipeline
        Syntax(message: String) {
            description("syntax error")
            display("{}", message)
        }

        /// A redirection file could not be opened
        Redirect(filename: String) {
            description("redirection failed")
            display("{}: cannot open file", filename)
        }

        /// The working directory could not be changed
        ChangeDirectory(path: String) {
            description("cd failed")
            display("cd: {}", path)
        }

        /// An argument cannot be passed to a program
        InvalidArgument(arg: String) {
            description("invalid argument")
            display("{}: argument contains a nul byte", arg)
        }
    }
}

impl Error {
    /// Returns `true` if the shell should report the error and read the next
    /// line instead of exiting.
    pub fn is_recoverable(&self) -> bool {
        match *self.kind() {
            ErrorKind::Syntax(_)
            | ErrorKind::Redirect(_)
            | ErrorKind::ChangeDirectory(_)
            | ErrorKind::InvalidArgument(_) => true,
            _ => false,
        }
    }
}

pub(crate) fn syntax<T: AsRef<str>>(message: T) -> Error {
    ErrorKind::Syntax(message.as_ref().to_string()).into()
}

/// Renders `error` and its causes on one line, e.g. "cd: /nope: No such file or directory".
pub fn display_chain(error: &Error) -> String {
    error
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
