use crate::cli::Invocation;
use crate::env::Environment;
use crate::error::Result;
use crate::shell::Shell;
use crate::spaces::resolve_location;
use crate::workspace::Workspace;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Resolve the shell and the workspace for one invocation.
///
/// The shell is resolved first, then every directory fragment in command line order.
/// The first failure aborts without a partial result.
pub fn prepare(invocation: &Invocation, env: &Environment) -> Result<(Shell, Workspace)> {
    let shell = Shell::resolve(env, invocation.shell.as_deref(), invocation.shell_args.clone())?;

    let paths = invocation
        .paths
        .iter()
        .map(|fragment| resolve_location(env, fragment))
        .collect::<Result<Vec<PathBuf>>>()?;

    let toolchain = invocation.toolchain(env);
    let workspace = Workspace::build(env, &paths, toolchain.as_deref(), !invocation.blank);

    Ok((shell, workspace))
}

/// Describe what a launch would do, for `--dry`.
pub fn dry_run_report(shell: &Shell, workspace: &Workspace) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "{}", shell)?;
    writeln!(out, "{}", workspace)?;
    for (key, value) in workspace.vars()? {
        writeln!(out, "{}={}", key, value.to_string_lossy())?;
    }
    Ok(out)
}
