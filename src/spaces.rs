use crate::env::Environment;
use crate::error::{ResolveError, Result};
use crate::path::{dir_exists, search_dir_env};
use log::debug;
use std::path::{Path, PathBuf};

/// Environment variable with the regular change-directory lookup list.
pub const CDPATH_ENV: &str = "CDPATH";
/// Environment variable with gospace specific lookup directories.
pub const SPACES_ENV: &str = "GOSPACES";

/// Resolve a workspace directory given on the command line.
///
/// The fragment is tried relative to the working directory first (an absolute
/// fragment is taken as-is), then against each entry of `CDPATH`, then against
/// `GOSPACES`. Only directories are accepted.
pub fn resolve_location(env: &Environment, fragment: &str) -> Result<PathBuf> {
    let rel = Path::new(fragment);
    let abs = env.absolute(rel);

    if dir_exists(&abs) {
        debug!("gospace {} resolves relative to the working directory", fragment);
        return Ok(abs);
    }

    for var in [CDPATH_ENV, SPACES_ENV] {
        if let Some(found) = search_dir_env(env, var, rel) {
            debug!("gospace {} was found in {}", fragment, var);
            return Ok(found);
        }
    }

    Err(ResolveError::NoSuchDirectory(fragment.to_string()))
}
