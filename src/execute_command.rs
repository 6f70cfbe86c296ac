//! Process launching: turns a parsed [`Job`] into a chain of child processes
//! connected by pipes.
//!
//! Every stage is forked before any of them is waited on, so a stage blocked
//! on a full pipe always has its reader running.

use std::ffi::CString;
use std::fs::File;
use std::mem;
use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
use std::process::ExitStatus;

use log::{debug, warn};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::libc;
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::wait::{self, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};

use crate::core::job::{Job, Output, Stdin};
use crate::errors::{ErrorKind, Result, ResultExt};
use crate::util::TshExitStatusExt;

pub const COMMAND_NOT_FOUND_EXIT_STATUS: i32 = 127;
pub const COMMAND_NOT_EXECUTABLE_EXIT_STATUS: i32 = 126;
const CHILD_SETUP_FAILED_EXIT_STATUS: i32 = 1;

/// The children of a launched job, in pipeline order.
#[derive(Debug)]
pub struct Children {
    pub pids: Vec<Pid>,
}

/// Runs `job` and waits for every stage to exit. Returns the exit status of
/// the last stage.
///
/// `background` is accepted for interface compatibility only; job control
/// is not supported and the pipeline always runs in the foreground.
pub fn launch_job(job: &mut Job, background: bool) -> Result<ExitStatus> {
    if background {
        warn!(
            "background execution is not supported, running '{}' in the foreground",
            job.input().trim_end()
        );
    }

    let children = spawn_processes(job)?;
    wait_for_processes(&children)
}

/// Forks one child per stage, wiring each stage's stdout to the next stage's
/// stdin. The job's redirection files are moved out of `job` and closed in
/// the parent once the stage using them has been forked.
pub fn spawn_processes(job: &mut Job) -> Result<Children> {
    // Build every argv up front so that nothing can fail between forks
    // except the system calls themselves.
    let argvs = job
        .processes()
        .iter()
        .map(|process| to_exec_args(process.argv()))
        .collect::<Result<Vec<_>>>()?;
    // The child must not allocate, so its diagnostics are prepared here.
    let prefixes = job
        .processes()
        .iter()
        .map(|process| format!("tsh: {}: ", process.program()))
        .collect::<Vec<_>>();

    let mut stdin = mem::take(&mut job.stdin);
    let mut job_stdout = mem::take(&mut job.stdout);
    let last = argvs.len() - 1;
    let mut pids = Vec::with_capacity(argvs.len());

    for (i, argv) in argvs.iter().enumerate() {
        let (stdout, next_stdin) = if i < last {
            let (read_end_pipe, write_end_pipe) = create_pipe()?;
            (Output::Pipe(write_end_pipe), Stdin::Pipe(read_end_pipe))
        } else {
            (mem::take(&mut job_stdout), Stdin::Inherit)
        };

        let pid = fork_exec(argv, &prefixes[i], &stdin, &stdout)?;
        debug!(
            "spawned {} for {:?} (stdin: {}, stdout: {})",
            pid,
            job.processes()[i].argv(),
            stdin.as_raw_fd(),
            stdout.as_raw_fd()
        );
        pids.push(pid);

        // The child owns its copies now; close ours.
        drop(stdout);
        stdin = next_stdin;
    }

    Ok(Children { pids })
}

/// Waits for every process in `children`, in order.
pub fn wait_for_processes(children: &Children) -> Result<ExitStatus> {
    let mut last_status = ExitStatus::from_success();
    for &pid in &children.pids {
        last_status = wait_for_process(pid)?;
        debug!("{} exited with {}", pid, last_status);
    }

    Ok(last_status)
}

fn to_exec_args(argv: &[String]) -> Result<Vec<CString>> {
    argv.iter()
        .map(|arg| {
            CString::new(arg.as_bytes()).chain_err(|| ErrorKind::InvalidArgument(arg.clone()))
        })
        .collect()
}

/// Wraps `unistd::pipe2()` to return RAII structs instead of raw, owning file descriptors
/// Returns (`read_end_pipe`, `write_end_pipe`)
///
/// Both ends are created close-on-exec: a child only keeps the ends it
/// duplicates onto its standard streams.
fn create_pipe() -> Result<(File, File)> {
    let (read_end_pipe, write_end_pipe) = unistd::pipe2(OFlag::O_CLOEXEC)?;
    let (read_end_pipe, write_end_pipe) = unsafe {
        (
            File::from_raw_fd(read_end_pipe),
            File::from_raw_fd(write_end_pipe),
        )
    };

    Ok((read_end_pipe, write_end_pipe))
}

/// `prefix` is the `tsh: <program>: ` lead of the child's diagnostics.
fn fork_exec(argv: &[CString], prefix: &str, stdin: &Stdin, stdout: &Output) -> Result<Pid> {
    match unsafe { unistd::fork() }? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => exec_child(argv, prefix, stdin.as_raw_fd(), stdout.as_raw_fd()),
    }
}

/// Runs in the forked child and never returns to the shell.
///
/// Only async-signal-safe calls are made here: no allocation, no locks.
fn exec_child(argv: &[CString], prefix: &str, stdin: RawFd, stdout: RawFd) -> ! {
    if let Err(e) = redirect(stdin, libc::STDIN_FILENO)
        .and_then(|_| redirect(stdout, libc::STDOUT_FILENO))
    {
        write_stderr(&["tsh: dup2: ", e.desc(), "\n"]);
        exit_child(CHILD_SETUP_FAILED_EXIT_STATUS);
    }

    // The shell ignores SIGINT; the programs it runs should not.
    if let Err(e) = unsafe { signal::signal(Signal::SIGINT, SigHandler::SigDfl) } {
        write_stderr(&["tsh: signal: ", e.desc(), "\n"]);
        exit_child(CHILD_SETUP_FAILED_EXIT_STATUS);
    }

    let e = match unistd::execvp(&argv[0], argv) {
        Ok(never) => match never {},
        Err(e) => e,
    };
    if e == Errno::ENOENT {
        write_stderr(&[prefix, "command not found\n"]);
        exit_child(COMMAND_NOT_FOUND_EXIT_STATUS);
    }

    write_stderr(&[prefix, e.desc(), "\n"]);
    exit_child(COMMAND_NOT_EXECUTABLE_EXIT_STATUS);
}

/// Writes `parts` to fd 2 with raw `write` calls. Errors are ignored; there
/// is nowhere left to report them.
fn write_stderr(parts: &[&str]) {
    for part in parts {
        let _ = unistd::write(libc::STDERR_FILENO, part.as_bytes());
    }
}

/// Makes `target` refer to `fd`, then closes `fd`. Does nothing if they are
/// already the same descriptor.
fn redirect(fd: RawFd, target: RawFd) -> nix::Result<()> {
    if fd != target {
        unistd::dup2(fd, target)?;
        unistd::close(fd)?;
    }

    Ok(())
}

/// Terminates the child without running the shell's exit handlers or
/// flushing buffers it shares with the shell.
fn exit_child(code: i32) -> ! {
    unsafe { libc::_exit(code) }
}

fn wait_for_process(pid: Pid) -> Result<ExitStatus> {
    loop {
        match wait::waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, status)) => return Ok(ExitStatus::from_status(status)),
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                return Ok(ExitStatus::from_status(128 + signal as i32))
            }
            Ok(status) => debug!("{}: ignoring wait status {:?}", pid, status),
            Err(Errno::EINTR) => {}
            Err(e) => return Err(e).chain_err(|| format!("waitpid {}", pid)),
        }
    }
}
