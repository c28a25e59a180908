use crate::env::Environment;
use crate::error::{ResolveError, Result};
use crate::path::{dir_exists, path_exists, search_path_env};
use crate::workspace::{OS_ENV, Workspace};
use anyhow::Context;
use log::{debug, info, trace};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Fallback shell path.
pub const SHELL_DEFAULT: &str = "/bin/sh";
/// Environment variable naming the user's shell.
pub const SHELL_ENV: &str = "SHELL";

/// Conventional process exit code, 0 for success.
pub type ExitCode = i32;

/// A resolved shell binary and the arguments passed to it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    pub path: PathBuf,
    pub args: Vec<String>,
}

/// One place a shell binary can come from.
enum Candidate<'a> {
    /// Looked up through `PATH` unless already absolute.
    Search(&'a str),
    /// Taken as-is.
    Fixed(&'a Path),
}

impl Candidate<'_> {
    fn resolve(&self, env: &Environment) -> Option<PathBuf> {
        let found = match *self {
            Candidate::Search(path) if path.is_empty() => {
                debug!("no shell path provided for lookup");
                return None;
            }
            Candidate::Search(path) => {
                trace!("attempting to resolve shell {}", path);
                let found = search_path_env(env, OS_ENV, Path::new(path));
                if found.is_none() {
                    debug!("shell lookup via {} failed for {}", OS_ENV, path);
                }
                found?
            }
            Candidate::Fixed(path) => {
                trace!("attempting fallback shell {}", path.display());
                if !path_exists(path) {
                    debug!("fallback shell {} does not exist", path.display());
                    return None;
                }
                path.to_path_buf()
            }
        };

        if dir_exists(&found) {
            info!("shell path {} is a directory", found.display());
            return None;
        }
        Some(found)
    }
}

impl Shell {
    /// Resolve the shell binary. The first usable candidate wins:
    ///
    /// 1. `path` (from the command line), looked up through `PATH` unless absolute,
    /// 2. the `SHELL` environment variable, looked up the same way,
    /// 3. the fallback [`SHELL_DEFAULT`].
    ///
    /// Candidates resolving to a directory are skipped.
    pub fn resolve(env: &Environment, path: Option<&str>, args: Vec<String>) -> Result<Self> {
        Self::resolve_with_fallback(env, path, args, Path::new(SHELL_DEFAULT))
    }

    pub(crate) fn resolve_with_fallback(
        env: &Environment,
        path: Option<&str>,
        args: Vec<String>,
        fallback: &Path,
    ) -> Result<Self> {
        let os_shell = env.get_var(SHELL_ENV).unwrap_or_default();
        let candidates = [
            Candidate::Search(path.unwrap_or_default()),
            Candidate::Search(&os_shell),
            Candidate::Fixed(fallback),
        ];

        let binary = candidates
            .iter()
            .find_map(|candidate| candidate.resolve(env))
            .ok_or(ResolveError::NoSuitableShell)?;

        debug!("using shell {}", binary.display());
        Ok(Self { path: binary, args })
    }

    /// Build the process for this shell inside the workspace.
    ///
    /// The child starts in the workspace root, inherits the snapshot's variables with
    /// `GOPATH`, `GOBIN` and `PATH` overridden, and shares the standard streams.
    pub fn command(&self, workspace: &Workspace, env: &Environment) -> anyhow::Result<Command> {
        let overrides = workspace
            .vars()
            .context("workspace directories cannot be joined into a path list")?;

        let mut cmd = Command::new(&self.path);
        cmd.args(&self.args)
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .envs(overrides)
            .current_dir(&workspace.root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        Ok(cmd)
    }

    /// Spawn the shell and wait for it to finish.
    pub fn launch(&self, workspace: &Workspace, env: &Environment) -> anyhow::Result<ExitCode> {
        info!("launching {} in {}", self, workspace);
        let mut child = self
            .command(workspace, env)?
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.path.display()))?;
        let exit_status = child.wait()?;
        match exit_status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(exit_status)),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shell({}", self.path.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        write!(f, ")")
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}
