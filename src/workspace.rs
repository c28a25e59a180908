use crate::env::{Environment, PathList};
use log::{debug, trace};
use std::env::{self as stdenv, JoinPathsError};
use std::ffi::OsString;
use std::fmt;
use std::iter;
use std::path::{Path, PathBuf};

/// Sub-directory holding compiled binaries, both in a workspace and a go installation.
pub const BIN_DIR: &str = "bin";
/// Environment variable pointing to a go installation.
pub const SDK_ENV: &str = "GOHOME";
/// Workspace environment variable for binaries.
pub const PKG_ENV: &str = "GOBIN";
/// Environment variable with executable lookup directories.
pub const OS_ENV: &str = "PATH";
/// Environment variable with workspace include directories.
pub const WS_ENV: &str = "GOPATH";

/// Directories handed to the spawned shell.
///
/// `root` is the working directory and the first `GOPATH` entry, `include_dirs`
/// follow it in `GOPATH`, and `search_dirs` follow `root/bin` in `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
    pub include_dirs: PathList,
    pub search_dirs: PathList,
}

impl Workspace {
    /// Compose a workspace from already resolved, absolute directories in command line order.
    ///
    /// - No directories: the working directory becomes the root.
    /// - Otherwise the first directory is the root and the rest are include directories.
    ///
    /// With `keep_env`, the inherited `GOPATH` entries are appended after the explicit
    /// ones. With a toolchain directory, its `bin` sub-directory is put in front of the
    /// inherited `PATH` entries.
    pub fn build(env: &Environment, paths: &[PathBuf], sdk: Option<&Path>, keep_env: bool) -> Self {
        let (root, mut include_dirs) = match paths.split_first() {
            None => {
                trace!("using {} as the workspace root", env.current_dir.display());
                (env.current_dir.clone(), PathList::new())
            }
            Some((root, rest)) => {
                trace!("workspace root: {} + {} includes", root.display(), rest.len());
                (root.clone(), rest.to_vec())
            }
        };

        if keep_env {
            debug!("appending {} to workspace path", WS_ENV);
            include_dirs.extend(env.path_list(WS_ENV));
        }

        let mut search_dirs = PathList::new();
        if let Some(sdk) = sdk {
            debug!("using custom go installation {}", sdk.display());
            search_dirs.push(sdk.join(BIN_DIR));
        }
        search_dirs.extend(env.path_list(OS_ENV));

        Self {
            root,
            include_dirs,
            search_dirs,
        }
    }

    /// Value for `GOPATH`: the root followed by the include directories.
    pub fn gopath(&self) -> Result<OsString, JoinPathsError> {
        concat_path(&self.root, &self.include_dirs)
    }

    /// Value for `GOBIN`.
    pub fn gobin(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// Value for `PATH`: the workspace binaries followed by the search directories.
    pub fn path(&self) -> Result<OsString, JoinPathsError> {
        concat_path(&self.gobin(), &self.search_dirs)
    }

    /// The three variable assignments for the spawned shell.
    pub fn vars(&self) -> Result<[(&'static str, OsString); 3], JoinPathsError> {
        Ok([
            (WS_ENV, self.gopath()?),
            (PKG_ENV, self.gobin().into_os_string()),
            (OS_ENV, self.path()?),
        ])
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Workspace({})", self.root.display())
    }
}

fn concat_path(head: &Path, tail: &[PathBuf]) -> Result<OsString, JoinPathsError> {
    stdenv::join_paths(iter::once(head).chain(tail.iter().map(PathBuf::as_path)))
}
