use crate::env::Environment;
use log::trace;
use std::fs;
use std::path::{Path, PathBuf};

/// Check if the path refers to an existing filesystem node.
///
/// Any stat failure (missing node, permission denied, dangling symlink) counts as
/// "does not exist". Callers only need a yes/no answer.
pub fn path_exists(path: &Path) -> bool {
    fs::metadata(path).is_ok()
}

/// Like [`path_exists`], but the node must also be a directory.
pub fn dir_exists(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_dir()).unwrap_or(false)
}

/// Search for an existing node named by `fragment` in the directories listed by the
/// path-list variable `var`.
///
/// Behavior:
/// - Absolute fragment that exists: returned as-is, the list is not consulted.
/// - Otherwise every list entry is joined with the fragment and made absolute; the
///   first one that exists wins.
/// - Empty list entries are skipped, they never stand for the working directory.
pub fn search_path_env(env: &Environment, var: &str, fragment: &Path) -> Option<PathBuf> {
    search_env_by(env, var, fragment, path_exists)
}

/// Like [`search_path_env`], but only directories match. A non-directory node in an
/// earlier entry does not hide a directory in a later one.
pub fn search_dir_env(env: &Environment, var: &str, fragment: &Path) -> Option<PathBuf> {
    search_env_by(env, var, fragment, dir_exists)
}

fn search_env_by(
    env: &Environment,
    var: &str,
    fragment: &Path,
    accept: fn(&Path) -> bool,
) -> Option<PathBuf> {
    if fragment.is_absolute() && accept(fragment) {
        return Some(fragment.to_path_buf());
    }

    trace!("searching for {} in {}", fragment.display(), var);

    env.path_list(var)
        .iter()
        .map(|dir| env.absolute(&dir.join(fragment)))
        .find(|candidate| accept(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::path::Path;
    use tempfile::TempDir;

    fn env_with(var: &str, dirs: &[&Path], cwd: &Path) -> Environment {
        let joined = std::env::join_paths(dirs).expect("join paths");
        Environment::with_vars([(var, joined.to_string_lossy().into_owned())], cwd)
    }

    #[test]
    fn oracle_distinguishes_files_and_dirs() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file");
        File::create(&file).unwrap();

        assert!(path_exists(tmp.path()));
        assert!(dir_exists(tmp.path()));
        assert!(path_exists(&file));
        assert!(!dir_exists(&file));
        assert!(!path_exists(&tmp.path().join("missing")));
        assert!(!dir_exists(&tmp.path().join("missing")));
    }

    #[test]
    #[cfg(unix)]
    fn dangling_symlink_does_not_exist() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), &link).unwrap();
        assert!(!path_exists(&link));
    }

    #[test]
    fn absolute_existing_fragment_short_circuits() {
        let tmp = TempDir::new().unwrap();
        let env = Environment::with_vars(Vec::<(String, String)>::new(), tmp.path());
        // variable is unset, so only the short-circuit can find it
        let found = search_path_env(&env, "LOOKUP", tmp.path());
        assert_eq!(found.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn absolute_missing_fragment_is_none() {
        let tmp = TempDir::new().unwrap();
        let env = env_with("LOOKUP", &[tmp.path()], tmp.path());
        assert!(search_path_env(&env, "LOOKUP", &tmp.path().join("missing")).is_none());
    }

    #[test]
    fn first_matching_entry_wins() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        fs::create_dir_all(first.join("pkg")).unwrap();
        fs::create_dir_all(second.join("pkg")).unwrap();

        let env = env_with("LOOKUP", &[first.as_path(), second.as_path()], tmp.path());
        let found = search_path_env(&env, "LOOKUP", Path::new("pkg")).expect("found");
        assert_eq!(found, first.join("pkg"));

        let env = env_with("LOOKUP", &[second.as_path(), first.as_path()], tmp.path());
        let found = search_path_env(&env, "LOOKUP", Path::new("pkg")).expect("found");
        assert_eq!(found, second.join("pkg"));
    }

    #[test]
    fn later_entry_used_when_earlier_lacks_fragment() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        let full = tmp.path().join("full");
        fs::create_dir_all(&empty).unwrap();
        fs::create_dir_all(&full).unwrap();
        File::create(full.join("tool")).unwrap();

        let env = env_with("LOOKUP", &[empty.as_path(), full.as_path()], tmp.path());
        let found = search_path_env(&env, "LOOKUP", Path::new("tool")).expect("found");
        assert_eq!(found, full.join("tool"));
    }

    #[test]
    fn directory_search_skips_files_in_earlier_entries() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(b.join("proj")).unwrap();
        File::create(a.join("proj")).unwrap();

        let env = env_with("LOOKUP", &[a.as_path(), b.as_path()], tmp.path());
        assert_eq!(search_path_env(&env, "LOOKUP", Path::new("proj")), Some(a.join("proj")));
        assert_eq!(search_dir_env(&env, "LOOKUP", Path::new("proj")), Some(b.join("proj")));
        assert!(search_dir_env(&env, "LOOKUP", &a.join("proj")).is_none());
    }

    #[test]
    fn relative_entries_resolve_against_working_directory() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("lib").join("pkg")).unwrap();

        let env = Environment::with_vars([("LOOKUP", "lib")], tmp.path());
        let found = search_path_env(&env, "LOOKUP", Path::new("pkg")).expect("found");
        assert_eq!(found, tmp.path().join("lib").join("pkg"));
    }

    #[test]
    fn empty_variable_falls_through() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pkg")).unwrap();

        // "pkg" exists relative to the working directory, but an empty list must not find it
        let env = Environment::with_vars([("LOOKUP", "")], tmp.path());
        assert!(search_path_env(&env, "LOOKUP", Path::new("pkg")).is_none());
        assert!(search_path_env(&env, "UNSET", Path::new("pkg")).is_none());
    }
}
