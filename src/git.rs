//! Thin wrappers around the system `git` binary
//!
//! Using the system git command means SSH keys, credential helpers and any
//! configuration in `~/.gitconfig` apply automatically. Network operations
//! (clone, fetch, pull) run under a wall-clock budget and are killed when it
//! expires, so one unreachable remote cannot stall a whole sync pass.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::error::{Error, Result};

/// Refspec that fetches every branch of `origin`.
pub const WIDE_FETCH_REFSPEC: &str = "+refs/heads/*:refs/remotes/origin/*";

/// Exit code git uses for fatal errors such as "not a git repository".
const GIT_FATAL_EXIT: i32 = 128;

const WAIT_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of probing an existing clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneHealth {
    /// `git status` succeeded.
    Healthy,
    /// The probe failed for a reason that may go away (timeout, spawn error).
    Unreachable,
    /// git reported a fatal repository error. The clone must be rebuilt.
    Corrupt,
}

fn git() -> Command {
    let mut cmd = Command::new("git");
    cmd.env("GIT_TERMINAL_PROMPT", "0").stdin(Stdio::null());
    cmd
}

fn git_in(path: &Path) -> Command {
    let mut cmd = git();
    cmd.arg("-C").arg(path);
    cmd
}

fn describe(cmd: &Command) -> String {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run to completion and return trimmed stdout.
fn run(mut cmd: Command) -> Result<String> {
    let command = describe(&cmd);
    debug!("git {}", command);

    let output = cmd.output().map_err(|e| Error::GitCommand {
        command: command.clone(),
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run under `timeout`. Returns the exit code, or `GitTimeout` after killing
/// the child.
fn run_bounded(mut cmd: Command, timeout: Duration) -> Result<(Option<i32>, String)> {
    let command = describe(&cmd);
    debug!("git {} (timeout {}s)", command, timeout.as_secs());

    let mut child = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::GitCommand {
            command: command.clone(),
            stderr: e.to_string(),
        })?;

    let stderr_reader = child.stderr.take().map(|mut stderr| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                kill(&mut child);
                return Err(Error::GitTimeout {
                    command,
                    seconds: timeout.as_secs(),
                });
            }
            None => thread::sleep(WAIT_INTERVAL),
        }
    };

    let stderr = stderr_reader
        .and_then(|reader| reader.join().ok())
        .unwrap_or_default();
    Ok((status.code(), stderr.trim().to_string()))
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn run_bounded_ok(cmd: Command, timeout: Duration) -> Result<()> {
    let command = describe(&cmd);
    match run_bounded(cmd, timeout)? {
        (Some(0), _) => Ok(()),
        (_, stderr) => Err(Error::GitCommand { command, stderr }),
    }
}

/// Map the exit code of `git status` to a clone health verdict.
pub fn classify_probe(exit_code: Option<i32>) -> CloneHealth {
    match exit_code {
        Some(0) => CloneHealth::Healthy,
        Some(GIT_FATAL_EXIT) => CloneHealth::Corrupt,
        _ => CloneHealth::Unreachable,
    }
}

/// Probe an existing clone with `git status`.
///
/// The git directory is pinned to `<path>/.git` so an enclosing repository
/// can never answer for a broken clone.
pub fn probe(path: &Path, timeout: Duration) -> CloneHealth {
    let mut cmd = git();
    cmd.arg(format!("--git-dir={}", path.join(".git").display()))
        .arg(format!("--work-tree={}", path.display()))
        .args(["status", "--porcelain"]);

    match run_bounded(cmd, timeout) {
        Ok((code, stderr)) => {
            let health = classify_probe(code);
            if health != CloneHealth::Healthy {
                debug!("Probe of {} reported {:?}: {}", path.display(), health, stderr);
            }
            health
        }
        Err(e) => {
            debug!("Probe of {} failed: {}", path.display(), e);
            CloneHealth::Unreachable
        }
    }
}

/// Clone `url` into `target_dir`.
pub fn clone(url: &str, target_dir: &Path, timeout: Duration) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cmd = git();
    cmd.arg("clone").arg(url).arg(target_dir);
    run_bounded_ok(cmd, timeout)
}

/// Name of the checked out branch, or `HEAD` when detached.
pub fn current_branch(path: &Path) -> Result<String> {
    let mut cmd = git_in(path);
    cmd.args(["rev-parse", "--abbrev-ref", "HEAD"]);
    run(cmd)
}

/// Fast-forward `branch` from `origin`.
pub fn pull(path: &Path, branch: &str, timeout: Duration) -> Result<()> {
    let mut cmd = git_in(path);
    cmd.args(["pull", "--ff-only", "origin", branch]);
    run_bounded_ok(cmd, timeout)
}

pub fn fetch(path: &Path, remote: &str, timeout: Duration) -> Result<()> {
    let mut cmd = git_in(path);
    cmd.args(["fetch", remote]);
    run_bounded_ok(cmd, timeout)
}

/// Check out `target`, surfacing git's own diagnostic on failure.
pub fn checkout(path: &Path, target: &str) -> Result<()> {
    let mut cmd = git_in(path);
    cmd.args(["checkout", target]);
    run(cmd).map(|_| ()).map_err(|e| checkout_failed(path, target, e))
}

/// Point local `branch` at `start_point` and check it out.
pub fn checkout_reset(path: &Path, branch: &str, start_point: &str) -> Result<()> {
    let mut cmd = git_in(path);
    cmd.args(["checkout", "-B", branch, start_point]);
    run(cmd)
        .map(|_| ())
        .map_err(|e| checkout_failed(path, start_point, e))
}

fn checkout_failed(path: &Path, target: &str, e: Error) -> Error {
    let stderr = match e {
        Error::GitCommand { stderr, .. } => stderr,
        other => other.to_string(),
    };
    Error::CheckoutFailed {
        path: path.to_path_buf(),
        target: target.to_string(),
        stderr,
    }
}

/// All values of a repository config key. Missing keys yield an empty list.
pub fn config_get_all(path: &Path, key: &str) -> Result<Vec<String>> {
    let mut cmd = git_in(path);
    cmd.args(["config", "--get-all", key]);
    let output = cmd.output().map_err(|e| Error::GitCommand {
        command: format!("config --get-all {}", key),
        stderr: e.to_string(),
    })?;

    // `git config --get` exits 1 when the key is unset
    match output.status.code() {
        Some(0) => Ok(parse_lines(&String::from_utf8_lossy(&output.stdout))),
        Some(1) => Ok(Vec::new()),
        _ => Err(Error::GitCommand {
            command: format!("config --get-all {}", key),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
    }
}

/// Replace every value of `key` with `value`.
pub fn config_replace_all(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut cmd = git_in(path);
    cmd.args(["config", "--replace-all", key, value]);
    run(cmd).map(|_| ())
}

/// Directories trusted through the global `safe.directory` setting.
pub fn safe_directories() -> Result<Vec<String>> {
    let mut cmd = git();
    cmd.args(["config", "--global", "--get-all", "safe.directory"]);
    let output = cmd.output().map_err(|e| Error::GitCommand {
        command: "config --global --get-all safe.directory".to_string(),
        stderr: e.to_string(),
    })?;
    if output.status.success() {
        Ok(parse_lines(&String::from_utf8_lossy(&output.stdout)))
    } else {
        Ok(Vec::new())
    }
}

pub fn add_safe_directory(path: &Path) -> Result<()> {
    let mut cmd = git();
    cmd.args(["config", "--global", "--add", "safe.directory"])
        .arg(path);
    run(cmd).map(|_| ())
}

pub fn remote_url(path: &Path, name: &str) -> Result<Option<String>> {
    Ok(config_get_all(path, &format!("remote.{}.url", name))?
        .into_iter()
        .next())
}

pub fn add_remote(path: &Path, name: &str, url: &str) -> Result<()> {
    let mut cmd = git_in(path);
    cmd.args(["remote", "add", name, url]);
    run(cmd).map(|_| ())
}

pub fn set_remote_url(path: &Path, name: &str, url: &str) -> Result<()> {
    let mut cmd = git_in(path);
    cmd.args(["remote", "set-url", name, url]);
    run(cmd).map(|_| ())
}

fn parse_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
