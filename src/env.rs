use crate::shell::SHELL_ENV;
use crate::spaces::{CDPATH_ENV, SPACES_ENV};
use crate::workspace::{OS_ENV, WS_ENV};
use log::{debug, warn};
use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// Variables read by the resolvers; losing one changes the composed workspace.
const RESOLVER_VARS: [&str; 5] = [OS_ENV, WS_ENV, CDPATH_ENV, SPACES_ENV, SHELL_ENV];

/// Ordered list of directories. Order defines lookup precedence, duplicates are kept.
pub type PathList = Vec<PathBuf>;

/// Read-only snapshot of the process environment used by the resolvers.
///
/// The snapshot contains:
/// - `vars`: environment variables visible to the resolvers and the spawned shell.
/// - `current_dir`: the directory relative fragments are resolved against.
///
/// Resolvers never touch `std::env` directly, so tests can hand in a fabricated
/// snapshot via [`Environment::with_vars`].
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, GOPATH).
    pub vars: HashMap<String, String>,
    /// The working directory at startup.
    pub current_dir: PathBuf,
    /// Names of variables left out because they are not valid unicode.
    pub skipped: Vec<String>,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// Variables whose name or value is not valid unicode are skipped; the spawned
    /// shell still inherits them from the process itself.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_os_vars(stdenv::vars_os(), current_dir)
    }

    /// Build a snapshot from raw variables, recording the ones that are not unicode.
    pub fn from_os_vars(
        vars: impl IntoIterator<Item = (OsString, OsString)>,
        current_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut env = Self::with_vars(Vec::<(String, String)>::new(), current_dir);
        for (key, value) in vars {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    env.vars.insert(key, value);
                }
                (Ok(key), Err(_)) => env.skipped.push(key),
                (Err(key), _) => env.skipped.push(key.to_string_lossy().into_owned()),
            }
        }
        env
    }

    /// Log the skipped variables, loudly for the ones the resolvers depend on.
    pub fn report_skipped(&self) {
        for name in &self.skipped {
            if RESOLVER_VARS.contains(&name.as_str()) {
                warn!("ignoring {}: value is not valid unicode", name);
            } else {
                debug!("ignoring non-unicode variable {}", name);
            }
        }
    }

    /// Build a snapshot from explicit values.
    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>, current_dir: impl Into<PathBuf>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            current_dir: current_dir.into(),
            skipped: Vec::new(),
        }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    /// Set or override an environment variable.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Split a path-list variable on the platform separator.
    ///
    /// Left-to-right order is kept. Empty segments are dropped, so an unset or empty
    /// variable yields an empty list.
    pub fn path_list(&self, key: &str) -> PathList {
        match self.vars.get(key) {
            Some(value) => stdenv::split_paths(OsStr::new(value))
                .filter(|dir| !dir.as_os_str().is_empty())
                .collect(),
            None => PathList::new(),
        }
    }

    /// Make `path` absolute against the snapshot's working directory.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        clean(&self.current_dir.join(path))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Lexically normalize a path: `.` is dropped and `..` removes the previous component.
///
/// Symlinks are not consulted, `a/link/..` yields `a`.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::with_vars(Vec::<(String, String)>::new(), "/");

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");

        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
        assert!(env.current_dir.is_absolute());
    }

    #[test]
    #[cfg(unix)]
    fn non_unicode_variables_are_recorded() {
        use std::os::unix::ffi::OsStringExt;

        let env = Environment::from_os_vars(
            [
                (OsString::from("GOPATH"), OsString::from_vec(vec![b'/', 0xff])),
                (OsString::from("PATH"), OsString::from("/bin")),
            ],
            "/",
        );
        assert_eq!(env.get_var("GOPATH"), None);
        assert_eq!(env.get_var("PATH"), Some("/bin".to_string()));
        assert_eq!(env.skipped, vec!["GOPATH".to_string()]);
        env.report_skipped();
    }

    #[test]
    #[cfg(unix)]
    fn path_list_keeps_order_and_duplicates() {
        let env = Environment::with_vars([("GOPATH", "/x:/y:/x")], "/");
        assert_eq!(
            env.path_list("GOPATH"),
            vec![PathBuf::from("/x"), PathBuf::from("/y"), PathBuf::from("/x")]
        );
    }

    #[test]
    #[cfg(unix)]
    fn path_list_drops_empty_segments() {
        let env = Environment::with_vars([("EMPTY", ""), ("GAPS", ":/a::/b:")], "/");
        assert!(env.path_list("EMPTY").is_empty());
        assert!(env.path_list("UNSET").is_empty());
        assert_eq!(
            env.path_list("GAPS"),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    #[cfg(unix)]
    fn absolute_joins_and_cleans() {
        let env = Environment::with_vars(Vec::<(String, String)>::new(), "/home/user/work");
        assert_eq!(env.absolute(Path::new("src")), PathBuf::from("/home/user/work/src"));
        assert_eq!(env.absolute(Path::new("../other/./x")), PathBuf::from("/home/user/other/x"));
        assert_eq!(env.absolute(Path::new("/etc")), PathBuf::from("/etc"));
        assert_eq!(env.absolute(Path::new("/../..")), PathBuf::from("/"));
    }
}
